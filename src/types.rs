//! Core types for the glucotrend pipeline
//!
//! This module defines the data structures that flow through the trends
//! pipeline: raw readings with their device annotations, the collected
//! out-of-range clamp pairs, and the per-bin statistics records the
//! aggregators produce.

use serde::{Deserialize, Serialize};

use crate::datetime::TWENTY_FOUR_HRS;

/// Annotation code a device attaches when a reading was clamped at the edge
/// of its reportable range
pub const OUT_OF_RANGE_ANNOTATION_CODE: &str = "bg/out-of-range";

/// Which edge of the reportable range a clamped reading sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangeValue {
    Low,
    High,
}

impl OutOfRangeValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutOfRangeValue::Low => "low",
            OutOfRangeValue::High => "high",
        }
    }
}

/// Device annotation attached to a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation code, e.g. `bg/out-of-range`
    pub code: String,
    /// Clamp side, present on out-of-range annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<OutOfRangeValue>,
    /// Clamp threshold, present on out-of-range annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// A single glucose measurement positioned within the 24-hour cycle.
///
/// Readings are immutable inputs; the pipeline never mutates or stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Unique identifier
    pub id: String,
    /// Milliseconds since local midnight, in `[0, 86_400_000)`
    pub ms_per24: i64,
    /// Glucose value in the caller's unit system
    pub value: f64,
    /// Device annotations (empty for most readings)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Reading {
    /// Validate the reading's domain invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0..TWENTY_FOUR_HRS).contains(&self.ms_per24) {
            return Err(ValidationError::MsPer24OutOfRange {
                ms_per24: self.ms_per24,
            });
        }
        if !self.value.is_finite() {
            return Err(ValidationError::NonFiniteValue { value: self.value });
        }
        for annotation in &self.annotations {
            if annotation.code == OUT_OF_RANGE_ANNOTATION_CODE
                && (annotation.value.is_none() || annotation.threshold.is_none())
            {
                return Err(ValidationError::IncompleteOutOfRangeAnnotation {
                    id: self.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Validation errors for readings
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("ms_per24 out of range: {ms_per24} (must be in [0, 86400000))")]
    MsPer24OutOfRange { ms_per24: i64 },

    #[error("Reading value is not finite: {value}")]
    NonFiniteValue { value: f64 },

    #[error("Out-of-range annotation on reading {id} is missing its value or threshold")]
    IncompleteOutOfRangeAnnotation { id: String },
}

/// A collected `(value, threshold)` clamp pair from a reading's annotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutOfRangeAnnotation {
    /// Clamp side
    pub value: OutOfRangeValue,
    /// Clamp threshold
    pub threshold: f64,
}

/// Worst-case clamp thresholds observed in one bin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBoundaries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

impl RangeBoundaries {
    pub fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

/// Order-statistics record for one continuous-glucose-monitor bin.
///
/// Every statistic is `None` when the bin holds zero readings; the framing
/// fields (`id`, `ms_x`, `ms_from`, `ms_to`) are always populated so that
/// consumers keep a stable key set across bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbgBinStats {
    /// Bin key (stringified bin-center milliseconds)
    pub id: String,
    /// Bin center, ms since local midnight
    pub ms_x: i64,
    /// Lower bin boundary
    pub ms_from: i64,
    /// Upper bin boundary
    pub ms_to: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_quantile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_quartile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_quartile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ninetieth_quantile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Present only when at least one out-of-range annotation fell into
    /// this bin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_range_thresholds: Option<RangeBoundaries>,
}

/// Mean/min/max record for one fingerstick-meter bin.
///
/// Meter data is too sparse per bin for quantiles to be meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmbgBinStats {
    /// Bin key (stringified bin-center milliseconds)
    pub id: String,
    /// Bin center, ms since local midnight
    pub ms_x: i64,
    /// Lower bin boundary
    pub ms_from: i64,
    /// Upper bin boundary
    pub ms_to: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Present only when at least one out-of-range annotation fell into
    /// this bin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_range_thresholds: Option<RangeBoundaries>,
}

/// Per-bin statistics, tagged by the kind of data that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type", rename_all = "lowercase")]
pub enum BinStats {
    Cbg(CbgBinStats),
    Smbg(SmbgBinStats),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn out_of_range_reading(value: Option<OutOfRangeValue>, threshold: Option<f64>) -> Reading {
        Reading {
            id: "r1".to_string(),
            ms_per24: 1000,
            value: 40.0,
            annotations: vec![Annotation {
                code: OUT_OF_RANGE_ANNOTATION_CODE.to_string(),
                value,
                threshold,
            }],
        }
    }

    #[test]
    fn test_reading_roundtrip() {
        let reading = out_of_range_reading(Some(OutOfRangeValue::Low), Some(40.0));
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reading);
    }

    #[test]
    fn test_reading_deserialize_without_annotations() {
        let json = r#"{"id":"abc","ms_per24":5400000,"value":120.5}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.id, "abc");
        assert_eq!(reading.ms_per24, 5_400_000);
        assert!(reading.annotations.is_empty());
    }

    #[test]
    fn test_out_of_range_value_serde() {
        let json = serde_json::to_string(&OutOfRangeValue::Low).unwrap();
        assert_eq!(json, r#""low""#);
        let parsed: OutOfRangeValue = serde_json::from_str(r#""high""#).unwrap();
        assert_eq!(parsed, OutOfRangeValue::High);
    }

    #[test]
    fn test_validate_ok() {
        let reading = out_of_range_reading(Some(OutOfRangeValue::Low), Some(40.0));
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_validate_ms_per24_domain() {
        let mut reading = out_of_range_reading(Some(OutOfRangeValue::Low), Some(40.0));
        reading.ms_per24 = -1;
        assert!(matches!(
            reading.validate(),
            Err(ValidationError::MsPer24OutOfRange { ms_per24: -1 })
        ));

        reading.ms_per24 = TWENTY_FOUR_HRS;
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_validate_non_finite_value() {
        let mut reading = out_of_range_reading(None, None);
        reading.annotations.clear();
        reading.value = f64::NAN;
        assert!(matches!(
            reading.validate(),
            Err(ValidationError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_validate_incomplete_out_of_range_annotation() {
        let reading = out_of_range_reading(Some(OutOfRangeValue::Low), None);
        assert!(matches!(
            reading.validate(),
            Err(ValidationError::IncompleteOutOfRangeAnnotation { .. })
        ));
    }

    #[test]
    fn test_empty_stats_serialization_omits_none_fields() {
        let stats = SmbgBinStats {
            id: "5400000".to_string(),
            ms_x: 5_400_000,
            ms_from: 0,
            ms_to: 10_800_000,
            min: None,
            mean: None,
            max: None,
            out_of_range_thresholds: None,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(
            json,
            r#"{"id":"5400000","ms_x":5400000,"ms_from":0,"ms_to":10800000}"#
        );
    }

    #[test]
    fn test_bin_stats_tagged_serialization() {
        let stats = BinStats::Smbg(SmbgBinStats {
            id: "5400000".to_string(),
            ms_x: 5_400_000,
            ms_from: 0,
            ms_to: 10_800_000,
            min: Some(70.0),
            mean: Some(100.0),
            max: Some(130.0),
            out_of_range_thresholds: None,
        });
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(r#""data_type":"smbg""#));
        let parsed: BinStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
