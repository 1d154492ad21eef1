//! SRI engine
//!
//! This module provides the public API of the crate. It runs the full
//! computation: encoding validation → day-shift alignment → concordance
//! counting → index normalization.

use crate::aligner::DayShiftAligner;
use crate::concordance::ConcordanceCounter;
use crate::error::SriError;
use crate::normalizer::IndexNormalizer;
use crate::types::{EpochSeries, EpochsPerDay, SriAnalysis, SriConfig, SriOutcome};
use crate::validator::EncodingValidator;

/// Compute the Sleep Regularity Index of an epoch series.
///
/// # Arguments
/// * `series` - One state code per epoch, NaN for missing epochs
/// * `epochs_per_day` - Number of epochs in 24 hours
///
/// # Returns
/// SRI and valid comparison-days. Both are NaN together when the series is
/// not a two-code encoding, when `epochs_per_day` is zero, or when no epoch
/// pair one day apart is scored on both sides; `diagnostic` says which.
/// A series no longer than one day has zero comparison-days and an NaN SRI.
///
/// # Example
/// ```
/// use sleep_regularity::sleep_regularity_index;
///
/// let outcome = sleep_regularity_index(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0], 4);
/// assert_eq!(outcome.sri, 100.0);
/// assert_eq!(outcome.days, 1.0);
/// ```
pub fn sleep_regularity_index(series: &[f64], epochs_per_day: usize) -> SriOutcome {
    let engine = SriEngine::new();
    let result = EpochsPerDay::new(epochs_per_day)
        .and_then(|n| engine.compute_slice(series, n));
    SriEngine::to_outcome(result)
}

/// Configurable SRI engine.
///
/// Stateless apart from its configuration; one engine can serve any number
/// of independent series.
#[derive(Debug, Clone, Default)]
pub struct SriEngine {
    config: SriConfig,
}

impl SriEngine {
    /// Create an engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a specific configuration
    pub fn with_config(config: SriConfig) -> Self {
        Self { config }
    }

    /// Compute the full SRI breakdown for one series
    pub fn compute(
        &self,
        series: &EpochSeries,
        epochs_per_day: EpochsPerDay,
    ) -> Result<SriAnalysis, SriError> {
        self.compute_slice(series.as_slice(), epochs_per_day)
    }

    /// Compute the SRI for independent series, one result per input
    pub fn compute_many<'a, I>(&self, batch: I) -> Vec<Result<SriAnalysis, SriError>>
    where
        I: IntoIterator<Item = (&'a EpochSeries, EpochsPerDay)>,
    {
        batch
            .into_iter()
            .map(|(series, n)| self.compute(series, n))
            .collect()
    }

    pub(crate) fn compute_slice(
        &self,
        values: &[f64],
        epochs_per_day: EpochsPerDay,
    ) -> Result<SriAnalysis, SriError> {
        // Stage 1: Validate encoding
        let state_codes = EncodingValidator::validate(values)?;

        // Stage 2: Align each epoch with the same clock time one day later
        let views = DayShiftAligner::align(values, epochs_per_day);

        // Stage 3: Count comparable and agreeing pairs
        let counts = ConcordanceCounter::count(&views);

        // Stage 4: Normalize onto the SRI scale
        let score = IndexNormalizer::normalize(
            &counts,
            epochs_per_day,
            values.len(),
            self.config.insufficient_data,
        )?;

        tracing::debug!(
            series_len = values.len(),
            epochs_per_day = epochs_per_day.get(),
            valid_pairs = counts.valid_pairs,
            matches = counts.matches,
            sri = score.sri,
            days = score.days,
            "computed sleep regularity index"
        );

        Ok(SriAnalysis {
            state_codes,
            epochs_per_day: epochs_per_day.get(),
            series_len: values.len(),
            counts,
            sri: score.sri,
            days: score.days,
        })
    }

    /// Collapse a computation result into the sentinel-based outcome
    pub fn to_outcome(result: Result<SriAnalysis, SriError>) -> SriOutcome {
        match result {
            Ok(analysis) => {
                let diagnostic = analysis.sri.is_nan().then(|| {
                    format!(
                        "no epoch pair {} epochs apart is scored on both sides \
                         (series length {})",
                        analysis.epochs_per_day, analysis.series_len
                    )
                });
                SriOutcome {
                    sri: analysis.sri,
                    days: analysis.days,
                    diagnostic,
                }
            }
            Err(e) => SriOutcome::undefined(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InsufficientDataPolicy, StateCodes, MISSING};
    use pretty_assertions::assert_eq;

    const NAN: f64 = MISSING;

    fn epochs(n: usize) -> EpochsPerDay {
        EpochsPerDay::new(n).unwrap()
    }

    #[test]
    fn test_periodic_series_is_perfectly_regular() {
        let outcome = sleep_regularity_index(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0], 4);
        assert_eq!(outcome.sri, 100.0);
        assert_eq!(outcome.days, 1.0);
        assert_eq!(outcome.diagnostic, None);
    }

    #[test]
    fn test_inverted_day_is_minus_one_hundred() {
        let outcome = sleep_regularity_index(&[0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0], 4);
        assert_eq!(outcome.sri, -100.0);
        assert_eq!(outcome.days, 1.0);
    }

    #[test]
    fn test_missing_epoch_reduces_days() {
        let outcome = sleep_regularity_index(&[0.0, 0.0, 1.0, NAN, 0.0, 0.0, 1.0, 1.0], 4);
        assert_eq!(outcome.sri, 100.0);
        assert_eq!(outcome.days, 0.75);
    }

    #[test]
    fn test_half_agreement_is_zero() {
        let outcome = sleep_regularity_index(&[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0], 4);
        assert_eq!(outcome.sri, 0.0);
        assert_eq!(outcome.days, 1.0);
    }

    #[test]
    fn test_three_codes_yield_undefined_with_diagnostic() {
        let outcome = sleep_regularity_index(&[0.0, 1.0, 2.0, 0.0, 1.0, 2.0], 3);
        assert!(outcome.sri.is_nan());
        assert!(outcome.days.is_nan());
        assert!(!outcome.is_defined());

        let diagnostic = outcome.diagnostic.unwrap();
        assert!(diagnostic.contains("exactly 2 distinct state codes"));
    }

    #[test]
    fn test_zero_epochs_per_day_is_undefined() {
        let outcome = sleep_regularity_index(&[0.0, 1.0, 0.0, 1.0], 0);
        assert!(outcome.sri.is_nan());
        assert!(outcome.days.is_nan());
        assert!(outcome.diagnostic.is_some());
    }

    #[test]
    fn test_single_day_series_has_zero_days() {
        let engine = SriEngine::new();
        let series = EpochSeries::new(vec![0.0, 1.0, 1.0, 0.0]);

        let analysis = engine.compute(&series, epochs(4)).unwrap();
        assert!(analysis.sri.is_nan());
        assert_eq!(analysis.days, 0.0);
        assert_eq!(analysis.counts.aligned_len, 0);

        let outcome = sleep_regularity_index(series.as_slice(), 4);
        assert!(outcome.sri.is_nan());
        assert_eq!(outcome.days, 0.0);
        assert!(outcome.diagnostic.unwrap().contains("no epoch pair"));

        let outcome = sleep_regularity_index(series.as_slice(), 10);
        assert_eq!(outcome.days, 0.0);
    }

    #[test]
    fn test_all_pairs_missing_is_insufficient_data() {
        let engine = SriEngine::new();
        let series = EpochSeries::new(vec![0.0, 1.0, NAN, NAN, 1.0, 0.0]);

        let err = engine.compute(&series, epochs(2)).unwrap_err();
        assert!(matches!(err, SriError::InsufficientData { .. }));

        let outcome = sleep_regularity_index(series.as_slice(), 2);
        assert!(outcome.sri.is_nan());
        assert!(outcome.days.is_nan());
        assert!(outcome.diagnostic.unwrap().contains("Insufficient data"));
    }

    #[test]
    fn test_propagate_policy_reports_zero_days() {
        let engine = SriEngine::with_config(SriConfig {
            insufficient_data: InsufficientDataPolicy::Propagate,
        });
        let series = EpochSeries::new(vec![0.0, 1.0, NAN, NAN, 1.0, 0.0]);

        let analysis = engine.compute(&series, epochs(2)).unwrap();
        assert!(analysis.sri.is_nan());
        assert_eq!(analysis.days, 0.0);
        assert_eq!(analysis.counts.aligned_len, 4);
        assert_eq!(analysis.counts.valid_pairs, 0);
    }

    #[test]
    fn test_analysis_breakdown() {
        let engine = SriEngine::new();
        let series = EpochSeries::new(vec![1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0]);

        let analysis = engine.compute(&series, epochs(3)).unwrap();
        assert_eq!(
            analysis.state_codes,
            StateCodes {
                low: -1.0,
                high: 1.0
            }
        );
        assert_eq!(analysis.series_len, 8);
        assert_eq!(analysis.epochs_per_day, 3);
        assert_eq!(analysis.counts.aligned_len, 5);
        assert_eq!(analysis.counts.valid_pairs, 5);
        // pairs: (1,1) (-1,-1) (-1,-1) (1,1) (-1,1)
        assert_eq!(analysis.counts.matches, 4);
        assert!((analysis.sri - 60.0).abs() < 1e-12);
        assert!((analysis.days - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_many_is_independent_per_series() {
        let engine = SriEngine::new();
        let regular = EpochSeries::new(vec![0.0, 1.0, 0.0, 1.0]);
        let bad = EpochSeries::new(vec![0.0, 1.0, 2.0, 1.0]);

        let results = engine.compute_many([(&regular, epochs(2)), (&bad, epochs(2))]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().sri, 100.0);
        assert!(matches!(
            results[1],
            Err(SriError::InvalidEncoding { distinct_codes: 3 })
        ));
    }

    #[test]
    fn test_idempotent() {
        let values = [0.0, 1.0, 1.0, NAN, 0.0, 1.0, 0.0, 0.0, 1.0];
        let first = sleep_regularity_index(&values, 3);
        let second = sleep_regularity_index(&values, 3);
        assert_eq!(first.sri, second.sri);
        assert_eq!(first.days, second.days);
    }
}
