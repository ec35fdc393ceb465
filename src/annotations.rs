//! Out-of-range annotation reduction
//!
//! Sensors clamp readings that fall outside their reportable range and tag
//! them with an annotation carrying the clamp side and threshold. Collapsing
//! those per-reading annotations into a single worst-case threshold pair
//! lets a chart label a bin "Below 40" instead of plotting a fabricated
//! value.

use crate::types::{
    OutOfRangeAnnotation, OutOfRangeValue, RangeBoundaries, Reading, OUT_OF_RANGE_ANNOTATION_CODE,
};

/// Collect the unique `(value, threshold)` clamp pairs across a reading set.
///
/// Pairs are returned in first-seen order. Readings without a matching
/// annotation code contribute nothing; annotations missing either field are
/// skipped.
pub fn find_out_of_range_annotations(readings: &[Reading]) -> Vec<OutOfRangeAnnotation> {
    let mut found: Vec<OutOfRangeAnnotation> = Vec::new();
    for reading in readings {
        for annotation in &reading.annotations {
            if annotation.code != OUT_OF_RANGE_ANNOTATION_CODE {
                continue;
            }
            if let (Some(value), Some(threshold)) = (annotation.value, annotation.threshold) {
                let pair = OutOfRangeAnnotation { value, threshold };
                if !found.contains(&pair) {
                    found.push(pair);
                }
            }
        }
    }
    found
}

/// Reduce clamp pairs to the most informative boundary on each side.
///
/// A higher low threshold means more values were clamped at the bottom, so
/// lows reduce to their maximum; highs reduce to their minimum by the
/// symmetric argument. Each side is omitted when no annotation mentions it.
pub fn determine_range_boundaries(annotations: &[OutOfRangeAnnotation]) -> RangeBoundaries {
    let mut boundaries = RangeBoundaries::default();
    for annotation in annotations {
        match annotation.value {
            OutOfRangeValue::Low => {
                boundaries.low = Some(match boundaries.low {
                    Some(low) => low.max(annotation.threshold),
                    None => annotation.threshold,
                });
            }
            OutOfRangeValue::High => {
                boundaries.high = Some(match boundaries.high {
                    Some(high) => high.min(annotation.threshold),
                    None => annotation.threshold,
                });
            }
        }
    }
    boundaries
}

/// Clamp thresholds for a single reading, or `None` when it is in range.
pub fn get_out_of_range_threshold(reading: &Reading) -> Option<RangeBoundaries> {
    let annotations = find_out_of_range_annotations(std::slice::from_ref(reading));
    let boundaries = determine_range_boundaries(&annotations);
    if boundaries.is_empty() {
        None
    } else {
        Some(boundaries)
    }
}
