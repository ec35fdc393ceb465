//! Pipeline composition
//!
//! Drives the full trends transformation: group a reading set by
//! time-of-day bin, reduce each bin through the matching aggregator, and
//! emit one record per fixed bin across the 24-hour cycle. Empty bins are
//! emitted too, with `None` statistics, so downstream consumers always see
//! the same key set for a given bin size.

use std::collections::HashMap;

use crate::annotations::find_out_of_range_annotations;
use crate::binner::{bin_centers, find_bin_for_time_of_day};
use crate::datetime::TWENTY_FOUR_HRS;
use crate::error::TrendsError;
use crate::stats::{calculate_cbg_stats_for_bin, calculate_smbg_stats_for_bin};
use crate::types::{CbgBinStats, Reading, SmbgBinStats};

/// Aggregate CGM readings into one order-statistics record per bin.
///
/// Records are returned in ascending bin-center order, one for every bin in
/// the 24-hour cycle. Out-of-range annotations are collected per bin, from
/// the readings that fell into it, and reduced onto that bin's record.
///
/// # Errors
/// [`TrendsError::InvalidBinSize`] when `bin_size` is non-positive or does
/// not divide the day evenly; [`TrendsError::MsPer24OutOfRange`] when any
/// reading carries an out-of-domain offset.
pub fn cbg_stats_by_bin(
    readings: &[Reading],
    bin_size: i64,
) -> Result<Vec<CbgBinStats>, TrendsError> {
    check_bin_size(bin_size)?;
    let groups = group_by_bin(readings, bin_size)?;

    let records = bin_centers(bin_size)
        .into_iter()
        .map(|center| {
            let in_bin = groups.get(&center).map(Vec::as_slice).unwrap_or(&[]);
            let values: Vec<f64> = in_bin.iter().map(|r| r.value).collect();
            let out_of_range = find_out_of_range_annotations(in_bin);
            calculate_cbg_stats_for_bin(center, bin_size, &values, &out_of_range)
        })
        .collect();

    Ok(records)
}

/// Aggregate meter readings into one mean/min/max record per bin.
///
/// Same contract as [`cbg_stats_by_bin`].
pub fn smbg_stats_by_bin(
    readings: &[Reading],
    bin_size: i64,
) -> Result<Vec<SmbgBinStats>, TrendsError> {
    check_bin_size(bin_size)?;
    let groups = group_by_bin(readings, bin_size)?;

    let records = bin_centers(bin_size)
        .into_iter()
        .map(|center| {
            let in_bin = groups.get(&center).map(Vec::as_slice).unwrap_or(&[]);
            let values: Vec<f64> = in_bin.iter().map(|r| r.value).collect();
            let out_of_range = find_out_of_range_annotations(in_bin);
            calculate_smbg_stats_for_bin(center, bin_size, &values, &out_of_range)
        })
        .collect();

    Ok(records)
}

fn check_bin_size(bin_size: i64) -> Result<(), TrendsError> {
    if bin_size <= 0 || TWENTY_FOUR_HRS % bin_size != 0 {
        return Err(TrendsError::InvalidBinSize(bin_size));
    }
    Ok(())
}

fn group_by_bin(
    readings: &[Reading],
    bin_size: i64,
) -> Result<HashMap<i64, Vec<Reading>>, TrendsError> {
    let mut groups: HashMap<i64, Vec<Reading>> = HashMap::new();
    for reading in readings {
        let bin = find_bin_for_time_of_day(bin_size, reading.ms_per24)?;
        groups.entry(bin).or_default().push(reading.clone());
    }
    Ok(groups)
}
