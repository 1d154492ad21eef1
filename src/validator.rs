//! Encoding validation
//!
//! A series is only comparable day-to-day when it uses exactly two state
//! codes. Missing epochs are ignored; every other distinct value counts.

use crate::error::SriError;
use crate::types::{is_scored, StateCodes};

/// Validator for the binary sleep/wake encoding
pub struct EncodingValidator;

impl EncodingValidator {
    /// Check that `values` uses exactly two distinct state codes.
    ///
    /// On failure a `warn` diagnostic is emitted and the returned error
    /// carries the number of distinct codes found.
    pub fn validate(values: &[f64]) -> Result<StateCodes, SriError> {
        let codes = distinct_codes(values);

        match codes.as_slice() {
            [low, high] => Ok(StateCodes {
                low: *low,
                high: *high,
            }),
            _ => {
                let err = SriError::InvalidEncoding {
                    distinct_codes: codes.len(),
                };
                tracing::warn!(
                    distinct_codes = codes.len(),
                    "input does not contain exactly two sleep/wake state codes"
                );
                Err(err)
            }
        }
    }
}

/// Distinct scored values in ascending order.
///
/// `-0.0` and `0.0` compare equal and are folded into one code.
fn distinct_codes(values: &[f64]) -> Vec<f64> {
    let mut codes: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| is_scored(*v))
        .map(|v| if v == 0.0 { 0.0 } else { v })
        .collect();
    codes.sort_by(f64::total_cmp);
    codes.dedup();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MISSING;

    #[test]
    fn test_two_codes_pass() {
        let codes = EncodingValidator::validate(&[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(codes.low, 0.0);
        assert_eq!(codes.high, 1.0);
    }

    #[test]
    fn test_signed_codes_pass() {
        let codes = EncodingValidator::validate(&[1.0, -1.0, MISSING, 1.0]).unwrap();
        assert_eq!(codes.low, -1.0);
        assert_eq!(codes.high, 1.0);
    }

    #[test]
    fn test_missing_values_are_not_codes() {
        let values = [0.0, MISSING, 1.0, f64::INFINITY, f64::NEG_INFINITY];
        assert!(EncodingValidator::validate(&values).is_ok());
    }

    #[test]
    fn test_three_codes_fail() {
        let err = EncodingValidator::validate(&[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SriError::InvalidEncoding { distinct_codes: 3 }));
    }

    #[test]
    fn test_single_code_fails() {
        let err = EncodingValidator::validate(&[1.0, 1.0, MISSING, 1.0]).unwrap_err();
        assert!(matches!(err, SriError::InvalidEncoding { distinct_codes: 1 }));
    }

    #[test]
    fn test_empty_and_all_missing_fail() {
        assert!(matches!(
            EncodingValidator::validate(&[]),
            Err(SriError::InvalidEncoding { distinct_codes: 0 })
        ));
        assert!(matches!(
            EncodingValidator::validate(&[MISSING, MISSING]),
            Err(SriError::InvalidEncoding { distinct_codes: 0 })
        ));
    }

    #[test]
    fn test_negative_zero_folds_into_zero() {
        let codes = EncodingValidator::validate(&[0.0, -0.0, 1.0]).unwrap();
        assert_eq!(codes.low, 0.0);
        assert_eq!(codes.high, 1.0);
    }
}
