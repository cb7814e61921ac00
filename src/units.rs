//! Rounding and unit conversion helpers.
//!
//! All day values leaving the engine are rounded to two decimals.

/// Rounds to two decimals.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts working hours to working days for a given shift length.
///
/// A non-positive shift yields 0.
#[inline]
pub fn hours_to_days(hours: f64, shift_hours: f64) -> f64 {
    if shift_hours <= 0.0 {
        0.0
    } else {
        hours / shift_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(1.234) - 1.23).abs() < 1e-12);
        assert!((round2(1.235_000_1) - 1.24).abs() < 1e-12);
        assert!((round2(-0.004) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_hours_to_days() {
        assert!((hours_to_days(20.0, 10.0) - 2.0).abs() < 1e-12);
        assert_eq!(hours_to_days(5.0, 0.0), 0.0);
    }
}
