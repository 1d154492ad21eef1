//! SRI report encoding
//!
//! This module wraps engine results into JSON reports with producer
//! metadata. Undefined values are encoded as `null` since JSON has no NaN.

use crate::error::SriError;
use crate::types::{SriAnalysis, SriProducer, SriReport, SriStatus};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Encoder for producing SRI report payloads
pub struct SriReportEncoder {
    instance_id: String,
}

impl Default for SriReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SriReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode a computation result into a report.
    ///
    /// Invalid encoding and insufficient data become reports with a
    /// matching status; any other error is returned unchanged.
    pub fn encode(
        &self,
        result: Result<SriAnalysis, SriError>,
        subject_id: Option<String>,
        epochs_per_day: usize,
        series_len: usize,
    ) -> Result<SriReport, SriError> {
        let mut report = SriReport {
            producer: self.producer(),
            computed_at_utc: Utc::now().to_rfc3339(),
            subject_id,
            status: SriStatus::Ok,
            epochs_per_day,
            series_len,
            state_codes: None,
            valid_pairs: None,
            matches: None,
            sri: None,
            days: None,
            diagnostic: None,
        };

        match result {
            Ok(analysis) => {
                report.state_codes = Some(analysis.state_codes);
                report.valid_pairs = Some(analysis.counts.valid_pairs);
                report.matches = Some(analysis.counts.matches);
                report.sri = finite(analysis.sri);
                report.days = finite(analysis.days);
                if report.sri.is_none() {
                    report.status = SriStatus::InsufficientData;
                    report.diagnostic = Some(format!(
                        "no epoch pair {} epochs apart is scored on both sides",
                        analysis.epochs_per_day
                    ));
                }
            }
            Err(e @ SriError::InvalidEncoding { .. }) => {
                report.status = SriStatus::InvalidEncoding;
                report.diagnostic = Some(e.to_string());
            }
            Err(e @ SriError::InsufficientData { .. }) => {
                report.status = SriStatus::InsufficientData;
                report.diagnostic = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }

        Ok(report)
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        result: Result<SriAnalysis, SriError>,
        subject_id: Option<String>,
        epochs_per_day: usize,
        series_len: usize,
    ) -> Result<String, SriError> {
        let report = self.encode(result, subject_id, epochs_per_day, series_len)?;
        serde_json::to_string_pretty(&report).map_err(SriError::JsonError)
    }

    fn producer(&self) -> SriProducer {
        SriProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
