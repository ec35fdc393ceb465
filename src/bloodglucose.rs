//! Blood glucose classification and unit conversion
//!
//! Clinical range classification against configurable bounds, plus the
//! mg/dL ↔ mmol/L conversions. Bounds and values share whatever unit
//! system the caller works in.

use serde::{Deserialize, Serialize};

use crate::error::TrendsError;

/// mg/dL per mmol/L
pub const MGDL_PER_MMOLL: f64 = 18.015_59;

/// Coefficient-of-variation ceiling for on-target glycemic variability
pub const CV_TARGET_MAX: f64 = 0.36;

/// Clinical classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgBounds {
    pub very_high_threshold: f64,
    pub target_upper_bound: f64,
    pub target_lower_bound: f64,
    pub very_low_threshold: f64,
}

/// Classification bucket for a glucose value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BgClass {
    VeryLow,
    Low,
    Target,
    High,
    VeryHigh,
}

impl BgClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BgClass::VeryLow => "very_low",
            BgClass::Low => "low",
            BgClass::Target => "target",
            BgClass::High => "high",
            BgClass::VeryHigh => "very_high",
        }
    }
}

/// How many buckets classification produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassificationType {
    /// Low, target, and high only
    #[default]
    ThreeWay,
    /// Adds the very-low and very-high buckets
    FiveWay,
}

/// Classify a glucose value against clinical bounds.
///
/// Boundary values resolve inward: a value equal to either target bound is
/// `Target`, a value equal to `very_low_threshold` is `Low`, and a value
/// equal to `very_high_threshold` is `High`.
///
/// # Errors
/// Returns [`TrendsError::InvalidBgValue`] for non-positive or non-finite
/// values.
pub fn classify_bg_value(
    bounds: &BgBounds,
    value: f64,
    classification: ClassificationType,
) -> Result<BgClass, TrendsError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrendsError::InvalidBgValue(value));
    }
    let class = match classification {
        ClassificationType::FiveWay => {
            if value < bounds.very_low_threshold {
                BgClass::VeryLow
            } else if value < bounds.target_lower_bound {
                BgClass::Low
            } else if value <= bounds.target_upper_bound {
                BgClass::Target
            } else if value <= bounds.very_high_threshold {
                BgClass::High
            } else {
                BgClass::VeryHigh
            }
        }
        ClassificationType::ThreeWay => {
            if value < bounds.target_lower_bound {
                BgClass::Low
            } else if value <= bounds.target_upper_bound {
                BgClass::Target
            } else {
                BgClass::High
            }
        }
    };
    Ok(class)
}

/// Classify a coefficient of variation: at or under 36% is on target.
pub fn classify_cv_value(cv: f64) -> BgClass {
    if cv <= CV_TARGET_MAX {
        BgClass::Target
    } else {
        BgClass::High
    }
}

/// Convert mg/dL to mmol/L
pub fn convert_to_mmoll(mgdl: f64) -> f64 {
    mgdl / MGDL_PER_MMOLL
}

/// Convert mmol/L to mg/dL
pub fn convert_to_mgdl(mmoll: f64) -> f64 {
    mmoll * MGDL_PER_MMOLL
}
