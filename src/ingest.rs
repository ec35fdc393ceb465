//! Reading ingestion
//!
//! Parses reading streams (JSON array or NDJSON) into [`Reading`] values
//! and validates their domain invariants before they enter the pipeline.

use crate::error::TrendsError;
use crate::types::{Reading, ValidationError};

/// Adapter for parsing and validating reading streams
pub struct ReadingAdapter;

impl ReadingAdapter {
    /// Parse a JSON string containing an array of readings
    pub fn parse_array(json: &str) -> Result<Vec<Reading>, TrendsError> {
        let readings: Vec<Reading> = serde_json::from_str(json)?;
        Ok(readings)
    }

    /// Parse NDJSON (newline-delimited JSON), one reading per line.
    ///
    /// Blank lines are skipped; parse failures carry the 1-based line
    /// number.
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Reading>, TrendsError> {
        let mut readings = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Reading>(trimmed) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    return Err(TrendsError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(readings)
    }

    /// Validate a batch of readings, returning the failures only
    pub fn validate_readings(readings: &[Reading]) -> Vec<ValidationResult> {
        readings
            .iter()
            .enumerate()
            .filter_map(|(index, reading)| {
                reading.validate().err().map(|error| ValidationResult {
                    index,
                    reading_id: reading.id.clone(),
                    error,
                })
            })
            .collect()
    }
}

/// A failed validation, tied back to its position in the input
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub reading_id: String,
    pub error: ValidationError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"id": "r1", "ms_per24": 1000, "value": 100.0},
            {"id": "r2", "ms_per24": 2000, "value": 120.0}
        ]"#;
        let readings = ReadingAdapter::parse_array(json).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].id, "r1");
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = r#"{"id":"r1","ms_per24":1000,"value":100.0}

{"id":"r2","ms_per24":2000,"value":120.0,"annotations":[{"code":"bg/out-of-range","value":"high","threshold":600.0}]}"#;
        let readings = ReadingAdapter::parse_ndjson(ndjson).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].annotations.len(), 1);
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let ndjson = "{\"id\":\"r1\",\"ms_per24\":1000,\"value\":100.0}\nnot json";
        let err = ReadingAdapter::parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_validate_readings_flags_failures_only() {
        let readings = vec![
            Reading {
                id: "good".to_string(),
                ms_per24: 1000,
                value: 100.0,
                annotations: vec![],
            },
            Reading {
                id: "bad".to_string(),
                ms_per24: -5,
                value: 100.0,
                annotations: vec![],
            },
        ];
        let failures = ReadingAdapter::validate_readings(&readings);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].reading_id, "bad");
    }
}
