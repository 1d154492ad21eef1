//! Index normalization
//!
//! Maps the agreement fraction onto the [-100, 100] SRI scale:
//! `SRI = 200 * matches / valid_pairs - 100`, and reports comparison-days as
//! `valid_pairs / epochs_per_day`.
//!
//! A series no longer than one day has nothing to compare: it scores zero
//! comparison-days with an undefined SRI under every policy.

use crate::error::SriError;
use crate::types::{ConcordanceCounts, EpochsPerDay, InsufficientDataPolicy, SriScore, UNDEFINED};

/// Normalizer for concordance counts
pub struct IndexNormalizer;

impl IndexNormalizer {
    /// Normalize counts into an SRI score.
    ///
    /// `series_len` is only used to describe an insufficient-data failure.
    pub fn normalize(
        counts: &ConcordanceCounts,
        epochs_per_day: EpochsPerDay,
        series_len: usize,
        policy: InsufficientDataPolicy,
    ) -> Result<SriScore, SriError> {
        let n = epochs_per_day.get();

        if counts.aligned_len == 0 {
            return Ok(SriScore {
                sri: UNDEFINED,
                days: 0.0,
            });
        }

        if counts.valid_pairs == 0 && policy == InsufficientDataPolicy::Reject {
            return Err(SriError::InsufficientData {
                epochs_per_day: n,
                series_len,
            });
        }

        Ok(SriScore {
            sri: compute_sri(counts.matches, counts.valid_pairs),
            days: counts.valid_pairs as f64 / n as f64,
        })
    }
}

/// NaN when `valid_pairs` is zero
fn compute_sri(matches: usize, valid_pairs: usize) -> f64 {
    200.0 * matches as f64 / valid_pairs as f64 - 100.0
}
