//! Day-shift alignment
//!
//! Pairs every epoch with the epoch at the same clock time one day later.

use crate::types::EpochsPerDay;

/// Two equal-length views of a series, one day apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayShiftedViews<'a> {
    /// Positions `0 .. L - n`
    pub today: &'a [f64],
    /// Positions `n .. L`
    pub next_day: &'a [f64],
}

impl DayShiftedViews<'_> {
    pub fn len(&self) -> usize {
        self.today.len()
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty()
    }

    /// Iterate `(today, next_day)` epoch pairs
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.today.iter().copied().zip(self.next_day.iter().copied())
    }
}

/// Builds day-shifted views without copying or imputing
pub struct DayShiftAligner;

impl DayShiftAligner {
    /// Split `values` into views offset by one day.
    ///
    /// A series no longer than one day yields two empty views.
    pub fn align(values: &[f64], epochs_per_day: EpochsPerDay) -> DayShiftedViews<'_> {
        let n = epochs_per_day.get();
        if values.len() <= n {
            return DayShiftedViews {
                today: &[],
                next_day: &[],
            };
        }

        let overlap = values.len() - n;
        DayShiftedViews {
            today: &values[..overlap],
            next_day: &values[n..],
        }
    }
}
