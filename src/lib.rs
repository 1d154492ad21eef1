//! Sleep Regularity - Sleep Regularity Index (SRI) engine
//!
//! Computes how consistently sleep/wake timing repeats from one day to the
//! next, given an epoch-by-epoch series of two state codes with NaN marking
//! missing epochs. The computation is a deterministic pipeline:
//! encoding validation → day-shift alignment → concordance counting →
//! index normalization.
//!
//! ## Entry points
//!
//! - [`sleep_regularity_index`]: sentinel-based call returning SRI and
//!   comparison-days (NaN for both when undefined) with a diagnostic
//! - [`SriEngine`]: configurable engine returning a full [`SriAnalysis`]

pub mod aligner;
pub mod concordance;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod input;
pub mod normalizer;
pub mod types;
pub mod validator;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use encoder::SriReportEncoder;
pub use engine::{sleep_regularity_index, SriEngine};
pub use error::SriError;
pub use input::{SeriesReader, SeriesRecord};
pub use types::{
    EpochSeries, EpochsPerDay, InsufficientDataPolicy, SriAnalysis, SriConfig, SriOutcome,
    SriReport, MISSING, UNDEFINED,
};

/// Engine version embedded in all reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "sleep-regularity";
