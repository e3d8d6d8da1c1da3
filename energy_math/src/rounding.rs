//! Display rounding
//!
//! Halves round toward positive infinity: `2.25 -> 2.3`, `-2.25 -> -2.2`.

/// Round `value` to `decimals` places, halves toward positive infinity
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(10487.4567), 10487.5);
        assert_eq!(round_to_tenth(0.0), 0.0);
        assert_eq!(round_to_tenth(-2.25), -2.2);
    }

    #[test]
    fn test_other_precisions() {
        assert_eq!(round_half_up(3.31536, 2), 3.32);
        assert_eq!(round_half_up(-3.9454, 3), -3.945);
        assert!(round_half_up(f64::NAN, 1).is_nan());
    }
}
