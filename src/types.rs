//! Core types for the SRI engine
//!
//! This module defines the data that flows through each stage of the
//! computation: the scored epoch series, the day length in epochs, the
//! validated state codes, agreement counts and the final index.

use crate::error::SriError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Marker for an unscored epoch
pub const MISSING: f64 = f64::NAN;

/// Sentinel for an undefined SRI or day count
pub const UNDEFINED: f64 = f64::NAN;

/// Milliseconds in one 24-hour period
const DAY_MILLIS: i64 = 86_400_000;

/// Whether an epoch value carries a sleep/wake state.
///
/// NaN and the infinities are all treated as the missing marker.
#[inline]
pub fn is_scored(value: f64) -> bool {
    value.is_finite()
}

/// Ordered, gap-free sequence of per-epoch state codes.
///
/// Missing epochs are stored as NaN and serialize as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<f64>>", into = "Vec<Option<f64>>")]
pub struct EpochSeries {
    values: Vec<f64>,
}

impl EpochSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of epochs carrying a state code
    pub fn scored_len(&self) -> usize {
        self.values.iter().filter(|v| is_scored(**v)).count()
    }
}

impl From<Vec<f64>> for EpochSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for EpochSeries {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl From<Vec<Option<f64>>> for EpochSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values.into_iter().map(|v| v.unwrap_or(MISSING)).collect())
    }
}

impl From<EpochSeries> for Vec<Option<f64>> {
    fn from(series: EpochSeries) -> Self {
        series
            .values
            .into_iter()
            .map(|v| if is_scored(v) { Some(v) } else { None })
            .collect()
    }
}

/// Number of epochs making up one 24-hour period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct EpochsPerDay(usize);

impl EpochsPerDay {
    pub fn new(epochs: usize) -> Result<Self, SriError> {
        if epochs == 0 {
            return Err(SriError::InvalidEpochsPerDay(
                "must be a positive integer".to_string(),
            ));
        }
        Ok(Self(epochs))
    }

    /// Derive the day length from a fixed epoch length.
    ///
    /// The epoch length must divide 24 hours exactly.
    pub fn from_epoch_length(epoch: Duration) -> Result<Self, SriError> {
        let millis = epoch.num_milliseconds();
        if millis <= 0 {
            return Err(SriError::InvalidEpochsPerDay(format!(
                "epoch length must be positive, got {millis} ms"
            )));
        }
        if DAY_MILLIS % millis != 0 {
            return Err(SriError::InvalidEpochsPerDay(format!(
                "epoch length of {millis} ms does not divide 24 hours"
            )));
        }
        Self::new((DAY_MILLIS / millis) as usize)
    }

    /// Same as [`Self::from_epoch_length`] for an epoch length in whole seconds
    pub fn from_epoch_secs(secs: i64) -> Result<Self, SriError> {
        let epoch = Duration::try_seconds(secs).ok_or_else(|| {
            SriError::InvalidEpochsPerDay(format!("epoch length of {secs} s is out of range"))
        })?;
        Self::from_epoch_length(epoch)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for EpochsPerDay {
    type Error = SriError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EpochsPerDay> for usize {
    fn from(value: EpochsPerDay) -> Self {
        value.0
    }
}

/// The two state codes found in a validated series, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateCodes {
    pub low: f64,
    pub high: f64,
}

/// Agreement counts over the day-shifted views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceCounts {
    /// Length of each aligned view (L - n, or 0)
    pub aligned_len: usize,
    /// Positions scored in both views
    pub valid_pairs: usize,
    /// Positions where both views carry the same state
    pub matches: usize,
}

/// Normalized index and valid comparison-days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SriScore {
    pub sri: f64,
    pub days: f64,
}

/// Full breakdown of a successful computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SriAnalysis {
    pub state_codes: StateCodes,
    pub epochs_per_day: usize,
    pub series_len: usize,
    pub counts: ConcordanceCounts,
    /// Sleep Regularity Index (-100..=100); NaN when nothing was comparable
    pub sri: f64,
    /// Valid comparison-days (valid pairs / epochs per day)
    pub days: f64,
}

/// Result of the sentinel-based entry point.
///
/// `sri` and `days` are either both defined or both [`UNDEFINED`], except for
/// a series no longer than one day, which has zero `days` and an undefined
/// `sri`. `diagnostic` explains every undefined `sri`.
#[derive(Debug, Clone, PartialEq)]
pub struct SriOutcome {
    pub sri: f64,
    pub days: f64,
    pub diagnostic: Option<String>,
}

impl SriOutcome {
    pub fn undefined(diagnostic: String) -> Self {
        Self {
            sri: UNDEFINED,
            days: UNDEFINED,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.sri.is_nan()
    }
}

/// What to do when a series spans more than one day but no epoch pair is
/// scored on both sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientDataPolicy {
    /// Fail with [`SriError::InsufficientData`]
    #[default]
    Reject,
    /// Apply the formula as is: SRI is NaN and days is 0
    Propagate,
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SriConfig {
    pub insufficient_data: InsufficientDataPolicy,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SriProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Computation status carried in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SriStatus {
    Ok,
    InvalidEncoding,
    InsufficientData,
}

/// Serializable SRI report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SriReport {
    pub producer: SriProducer,
    pub computed_at_utc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    pub status: SriStatus,
    pub epochs_per_day: usize,
    pub series_len: usize,
    pub state_codes: Option<StateCodes>,
    pub valid_pairs: Option<usize>,
    pub matches: Option<usize>,
    /// `null` when undefined
    pub sri: Option<f64>,
    /// `null` when undefined
    pub days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}
