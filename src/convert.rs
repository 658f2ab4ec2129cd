//! Conversions between pitch percentages, semitones, and frequency ratios.

use crate::error::{PitchError, Result};

/// Semitones per octave.
pub const SEMITONES_PER_OCTAVE: f64 = 12.0;

/// Lower bound of the percentage range the engine handles without audible artifacts.
pub const SAFE_PERCENTAGE_MIN: f64 = -50.0;
/// Upper bound of the percentage range the engine handles without audible artifacts.
pub const SAFE_PERCENTAGE_MAX: f64 = 100.0;

/// Converts a pitch change percentage into a semitone offset.
///
/// `semitones = 12 * log2(1 + percentage / 100)`. A percentage of `0` maps to
/// exactly `0.0`; `100` maps to one octave up and `-50` to one octave down.
///
/// # Errors
///
/// Returns [`PitchError::Domain`] when `percentage <= -100` (the frequency ratio
/// would be zero or negative) or when the percentage is not finite.
///
/// # Example
///
/// ```
/// let semitones = wavpitch::percentage_to_semitones(10.0).unwrap();
/// assert!((semitones - 1.650042).abs() < 1e-6);
/// assert!(wavpitch::percentage_to_semitones(-100.0).is_err());
/// ```
pub fn percentage_to_semitones(percentage: f64) -> Result<f64> {
    let ratio = percentage_to_ratio(percentage)?;
    Ok(SEMITONES_PER_OCTAVE * ratio.log2())
}

/// Converts a percentage into a frequency ratio (`1 + percentage / 100`).
///
/// # Errors
///
/// Same domain as [`percentage_to_semitones`].
pub fn percentage_to_ratio(percentage: f64) -> Result<f64> {
    if !percentage.is_finite() {
        return Err(PitchError::Domain { percentage });
    }
    let ratio = 1.0 + percentage / 100.0;
    if ratio <= 0.0 {
        return Err(PitchError::Domain { percentage });
    }
    Ok(ratio)
}

/// Converts a semitone offset into a frequency ratio (`2^(semitones / 12)`).
#[inline]
pub fn semitones_to_ratio(semitones: f64) -> f64 {
    (semitones / SEMITONES_PER_OCTAVE).exp2()
}

/// Returns true if the percentage lies in the range the engine handles cleanly.
///
/// Values outside it still process, with increasing artifacts.
#[inline]
pub fn is_within_safe_range(percentage: f64) -> bool {
    (SAFE_PERCENTAGE_MIN..=SAFE_PERCENTAGE_MAX).contains(&percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_percent_is_exactly_zero() {
        assert_eq!(percentage_to_semitones(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_matches_formula() {
        for p in [-99.0, -75.0, -50.0, -15.0, -1.0, 1.0, 10.0, 25.0, 100.0, 300.0] {
            let expected = 12.0 * (1.0 + p / 100.0f64).log2();
            assert_relative_eq!(percentage_to_semitones(p).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ten_percent() {
        assert_relative_eq!(
            percentage_to_semitones(10.0).unwrap(),
            12.0 * 1.1f64.log2(),
            epsilon = 1e-12
        );
        assert_relative_eq!(percentage_to_semitones(10.0).unwrap(), 1.650_042_3, epsilon = 1e-6);
    }

    #[test]
    fn test_octaves() {
        assert_relative_eq!(percentage_to_semitones(100.0).unwrap(), 12.0, epsilon = 1e-12);
        assert_relative_eq!(percentage_to_semitones(-50.0).unwrap(), -12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_boundary_rejected() {
        for p in [-100.0, -100.000_001, -150.0, -1e9] {
            match percentage_to_semitones(p) {
                Err(PitchError::Domain { percentage }) => assert_eq!(percentage, p),
                other => panic!("Expected Domain error for {}, got {:?}", p, other),
            }
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(percentage_to_semitones(f64::NAN).is_err());
        assert!(percentage_to_semitones(f64::INFINITY).is_err());
        assert!(percentage_to_semitones(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_semitones_to_ratio_inverts_conversion() {
        for p in [-40.0, -15.0, 0.0, 10.0, 25.0, 80.0] {
            let s = percentage_to_semitones(p).unwrap();
            assert_relative_eq!(semitones_to_ratio(s), 1.0 + p / 100.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_safe_range() {
        assert!(is_within_safe_range(-50.0));
        assert!(is_within_safe_range(0.0));
        assert!(is_within_safe_range(100.0));
        assert!(!is_within_safe_range(-50.5));
        assert!(!is_within_safe_range(150.0));
    }
}
