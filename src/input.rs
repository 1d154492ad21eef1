//! Epoch series ingestion
//!
//! Readers for the formats accepted by the CLI and FFI surfaces. The engine
//! itself never touches I/O; these helpers only turn text into
//! [`SeriesRecord`]s.

use crate::error::SriError;
use crate::types::{EpochSeries, EpochsPerDay, MISSING};
use serde::{Deserialize, Serialize};

/// Tokens accepted as the missing marker in plain-text input
const MISSING_TOKENS: &[&str] = &["nan", "na", "null", ".", "-"];

/// One subject's epoch series with optional day-length metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs_per_day: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_length_secs: Option<i64>,
    pub values: EpochSeries,
}

impl SeriesRecord {
    pub fn from_values(values: EpochSeries) -> Self {
        Self {
            subject_id: None,
            epochs_per_day: None,
            epoch_length_secs: None,
            values,
        }
    }

    /// Day length for this record.
    ///
    /// Record metadata wins over `fallback`; `epochs_per_day` wins over
    /// `epoch_length_secs`.
    pub fn resolve_epochs_per_day(
        &self,
        fallback: Option<EpochsPerDay>,
    ) -> Result<EpochsPerDay, SriError> {
        if let Some(n) = self.epochs_per_day {
            return EpochsPerDay::new(n);
        }
        if let Some(secs) = self.epoch_length_secs {
            return EpochsPerDay::from_epoch_secs(secs);
        }
        fallback.ok_or_else(|| {
            SriError::InvalidEpochsPerDay(format!(
                "no day length given for subject {}",
                self.subject_id.as_deref().unwrap_or("unknown")
            ))
        })
    }
}

/// Reader for epoch series input
pub struct SeriesReader;

impl SeriesReader {
    /// Parse a JSON array of numbers, `null` marking missing epochs
    pub fn parse_array(json: &str) -> Result<SeriesRecord, SriError> {
        let values: EpochSeries = serde_json::from_str(json)?;
        Ok(SeriesRecord::from_values(values))
    }

    /// Parse NDJSON (newline-delimited JSON) containing one record per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<SeriesRecord>, SriError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<SeriesRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(SriError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Parse plain text: numbers separated by whitespace or commas.
    ///
    /// `#` starts a comment. `NaN`, `NA`, `null`, `.` and `-` mark missing
    /// epochs.
    pub fn parse_text(text: &str) -> Result<SeriesRecord, SriError> {
        let mut values = Vec::new();
        for (line_num, line) in text.lines().enumerate() {
            let content = line.split('#').next().unwrap_or_default();
            for token in content
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
            {
                values.push(parse_token(token).ok_or_else(|| {
                    SriError::ParseError(format!(
                        "Invalid value '{}' on line {}",
                        token,
                        line_num + 1
                    ))
                })?);
            }
        }
        Ok(SeriesRecord::from_values(EpochSeries::new(values)))
    }
}

fn parse_token(token: &str) -> Option<f64> {
    if MISSING_TOKENS
        .iter()
        .any(|m| token.eq_ignore_ascii_case(m))
    {
        return Some(MISSING);
    }
    token.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let record = SeriesReader::parse_array("[0, 1, null, 1]").unwrap();
        assert_eq!(record.values.len(), 4);
        assert_eq!(record.values.scored_len(), 3);
        assert!(record.subject_id.is_none());
    }

    #[test]
    fn test_parse_array_rejects_strings() {
        assert!(SeriesReader::parse_array(r#"[0, "sleep"]"#).is_err());
    }

    #[test]
    fn test_parse_ndjson() {
        let input = r#"
{"subject_id": "s1", "epochs_per_day": 4, "values": [0, 0, 1, 1, 0, 0, 1, 1]}

{"subject_id": "s2", "epoch_length_secs": 60, "values": [1, null, -1]}
"#;
        let records = SeriesReader::parse_ndjson(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject_id.as_deref(), Some("s1"));
        assert_eq!(records[0].resolve_epochs_per_day(None).unwrap().get(), 4);
        assert_eq!(records[1].resolve_epochs_per_day(None).unwrap().get(), 1440);
        assert!(records[1].values.as_slice()[1].is_nan());
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let input = "{\"values\": [0, 1]}\nnot json\n";
        let err = SeriesReader::parse_ndjson(input).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_text() {
        let input = "# subject 7\n0 0 1\n1, NaN, 0\nNA . -\n";
        let record = SeriesReader::parse_text(input).unwrap();
        assert_eq!(record.values.len(), 9);
        assert_eq!(record.values.scored_len(), 5);
    }

    #[test]
    fn test_parse_text_rejects_garbage() {
        let err = SeriesReader::parse_text("0 1\n1 wake\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("wake"));
        assert!(message.contains("line 2"));
    }

    #[test]
    fn test_out_of_range_epoch_length_is_an_error() {
        let input = r#"{"epoch_length_secs": 9223372036854775807, "values": [0, 1, 0, 1]}"#;
        let records = SeriesReader::parse_ndjson(input).unwrap();

        let err = records[0].resolve_epochs_per_day(None).unwrap_err();
        assert!(matches!(err, SriError::InvalidEpochsPerDay(_)));
    }

    #[test]
    fn test_resolve_epochs_per_day_fallback() {
        let record = SeriesRecord::from_values(EpochSeries::new(vec![0.0, 1.0]));
        assert!(record.resolve_epochs_per_day(None).is_err());

        let fallback = EpochsPerDay::new(96).unwrap();
        assert_eq!(record.resolve_epochs_per_day(Some(fallback)).unwrap(), fallback);
    }
}
