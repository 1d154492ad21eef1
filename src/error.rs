//! Error types for the SRI engine

use thiserror::Error;

/// Errors that can occur while computing the Sleep Regularity Index
#[derive(Debug, Error)]
pub enum SriError {
    #[error("Invalid encoding: expected exactly 2 distinct state codes, found {distinct_codes}")]
    InvalidEncoding { distinct_codes: usize },

    #[error(
        "Insufficient data: no epoch pair {epochs_per_day} epochs apart is scored on both sides \
         (series length {series_len})"
    )]
    InsufficientData {
        epochs_per_day: usize,
        series_len: usize,
    },

    #[error("Invalid epochs per day: {0}")]
    InvalidEpochsPerDay(String),

    #[error("Failed to parse epoch series: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
