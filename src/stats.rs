//! Bin statistics aggregation
//!
//! Reduces the readings assigned to one time-of-day bin into a descriptive
//! statistics record: order statistics (quantile bands) for
//! continuous-glucose-monitor data, and mean/min/max for the much sparser
//! fingerstick meter data.

use crate::annotations::determine_range_boundaries;
use crate::types::{CbgBinStats, OutOfRangeAnnotation, RangeBoundaries, SmbgBinStats};

/// Interpolated quantile of an ascending-sorted slice.
///
/// Uses linear interpolation between the two nearest order statistics
/// (the R-7 convention). Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Reduce one bin's CGM values into an order-statistics record.
///
/// `bin_key` is the bin-center timestamp produced by
/// [`find_bin_for_time_of_day`]; the record's boundaries are derived from it
/// and `bin_size`, never recomputed from the values. An empty `values` slice
/// yields `None` for every statistic, keeping empty bins distinguishable
/// from zero-valued ones without special-casing at the call site.
///
/// [`find_bin_for_time_of_day`]: crate::binner::find_bin_for_time_of_day
pub fn calculate_cbg_stats_for_bin(
    bin_key: i64,
    bin_size: i64,
    values: &[f64],
    out_of_range: &[OutOfRangeAnnotation],
) -> CbgBinStats {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    CbgBinStats {
        id: bin_key.to_string(),
        ms_x: bin_key,
        ms_from: bin_key - bin_size / 2,
        ms_to: bin_key + bin_size / 2,
        min: sorted.first().copied(),
        tenth_quantile: quantile(&sorted, 0.1),
        first_quartile: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        third_quartile: quantile(&sorted, 0.75),
        ninetieth_quantile: quantile(&sorted, 0.9),
        max: sorted.last().copied(),
        out_of_range_thresholds: merge_out_of_range(out_of_range),
    }
}

/// Reduce one bin's meter values into a mean/min/max record.
///
/// Same framing, emptiness, and threshold-merge behavior as
/// [`calculate_cbg_stats_for_bin`].
pub fn calculate_smbg_stats_for_bin(
    bin_key: i64,
    bin_size: i64,
    values: &[f64],
    out_of_range: &[OutOfRangeAnnotation],
) -> SmbgBinStats {
    let (min, mean, max) = if values.is_empty() {
        (None, None, None)
    } else {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        (Some(min), Some(mean), Some(max))
    };

    SmbgBinStats {
        id: bin_key.to_string(),
        ms_x: bin_key,
        ms_from: bin_key - bin_size / 2,
        ms_to: bin_key + bin_size / 2,
        min,
        mean,
        max,
        out_of_range_thresholds: merge_out_of_range(out_of_range),
    }
}

fn merge_out_of_range(annotations: &[OutOfRangeAnnotation]) -> Option<RangeBoundaries> {
    let boundaries = determine_range_boundaries(annotations);
    if boundaries.is_empty() {
        None
    } else {
        Some(boundaries)
    }
}
