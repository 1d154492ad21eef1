//! Overlap and concordance counting

use crate::aligner::DayShiftedViews;
use crate::types::{is_scored, ConcordanceCounts};

/// Counts comparable and agreeing epoch pairs
pub struct ConcordanceCounter;

impl ConcordanceCounter {
    /// Count valid pairs and matches across the aligned views.
    ///
    /// A pair is valid only when both epochs are scored; matches use exact
    /// equality and can only occur on valid pairs.
    pub fn count(views: &DayShiftedViews<'_>) -> ConcordanceCounts {
        let mut counts = ConcordanceCounts {
            aligned_len: views.len(),
            ..Default::default()
        };

        for (today, next_day) in views.pairs() {
            if !(is_scored(today) && is_scored(next_day)) {
                continue;
            }
            counts.valid_pairs += 1;
            if today == next_day {
                counts.matches += 1;
            }
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::DayShiftAligner;
    use crate::types::{EpochsPerDay, MISSING};
    use pretty_assertions::assert_eq;

    fn count(values: &[f64], n: usize) -> ConcordanceCounts {
        let views = DayShiftAligner::align(values, EpochsPerDay::new(n).unwrap());
        ConcordanceCounter::count(&views)
    }

    #[test]
    fn test_periodic_series_all_match() {
        let counts = count(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0], 4);
        assert_eq!(
            counts,
            ConcordanceCounts {
                aligned_len: 4,
                valid_pairs: 4,
                matches: 4,
            }
        );
    }

    #[test]
    fn test_inverted_day_never_matches() {
        let counts = count(&[0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0], 4);
        assert_eq!(counts.valid_pairs, 4);
        assert_eq!(counts.matches, 0);
    }

    #[test]
    fn test_missing_on_either_side_excluded() {
        // today side missing
        let counts = count(&[0.0, 0.0, 1.0, MISSING, 0.0, 0.0, 1.0, 1.0], 4);
        assert_eq!(counts.valid_pairs, 3);
        assert_eq!(counts.matches, 3);

        // next-day side missing
        let counts = count(&[0.0, 0.0, 1.0, 1.0, MISSING, 0.0, 1.0, 1.0], 4);
        assert_eq!(counts.valid_pairs, 3);
        assert_eq!(counts.matches, 3);
    }

    #[test]
    fn test_missing_pairs_never_match() {
        let counts = count(&[MISSING, f64::INFINITY, MISSING, f64::INFINITY], 2);
        assert_eq!(counts.aligned_len, 2);
        assert_eq!(counts.valid_pairs, 0);
        assert_eq!(counts.matches, 0);
    }

    #[test]
    fn test_large_codes_do_not_overflow_definedness() {
        let counts = count(&[1e200, -1e200, 1e200, -1e200], 2);
        assert_eq!(counts.valid_pairs, 2);
        assert_eq!(counts.matches, 2);
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(count(&[0.0, 1.0], 2), ConcordanceCounts::default());
    }
}
