//! Time-of-day binning
//!
//! Maps an intra-day offset (milliseconds since local midnight) onto the
//! center of the fixed-width bin that offset falls into. Bins are
//! right-closed and left-open, except the first bin, which starts at
//! offset 0.

use crate::datetime::TWENTY_FOUR_HRS;
use crate::error::TrendsError;

/// Find the bin center for a time-of-day offset.
///
/// An offset sitting exactly on a bin boundary maps to the bin that
/// boundary closes: `find_bin_for_time_of_day(bin_size, bin_size)` is the
/// first bin center, `bin_size / 2`. The zero offset is special-cased to
/// the first bin; the general ceiling formula would put it at a negative
/// center, and bin centers must never be negative.
///
/// # Errors
/// Returns [`TrendsError::MsPer24OutOfRange`] when `ms_per24` is outside
/// `[0, 86_400_000)`.
pub fn find_bin_for_time_of_day(bin_size: i64, ms_per24: i64) -> Result<i64, TrendsError> {
    if !(0..TWENTY_FOUR_HRS).contains(&ms_per24) {
        return Err(TrendsError::MsPer24OutOfRange(ms_per24));
    }
    if ms_per24 == 0 {
        return Ok(bin_size / 2);
    }
    // ceil(ms_per24 / bin_size) * bin_size, in integer math
    let upper_edge = ((ms_per24 + bin_size - 1) / bin_size) * bin_size;
    Ok(upper_edge - bin_size / 2)
}

/// All bin centers for one 24-hour cycle, in ascending order.
///
/// This is the stable key set aggregation iterates over: every valid offset
/// maps onto exactly one of these centers, and the pipeline emits one record
/// per center whether or not any reading landed in it. Non-positive widths
/// produce no bins.
pub fn bin_centers(bin_size: i64) -> Vec<i64> {
    if bin_size <= 0 {
        return Vec::new();
    }
    let mut centers = Vec::with_capacity((TWENTY_FOUR_HRS / bin_size) as usize);
    let mut center = bin_size / 2;
    while center < TWENTY_FOUR_HRS {
        centers.push(center);
        center += bin_size;
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::{ONE_HR, THREE_HRS};

    #[test]
    fn test_zero_offset_maps_to_first_bin() {
        assert_eq!(find_bin_for_time_of_day(THREE_HRS, 0).unwrap(), THREE_HRS / 2);
        assert_eq!(find_bin_for_time_of_day(ONE_HR, 0).unwrap(), ONE_HR / 2);
    }

    #[test]
    fn test_first_bin_covers_entire_width() {
        for ms in [1, THREE_HRS / 2, THREE_HRS - 1] {
            assert_eq!(
                find_bin_for_time_of_day(THREE_HRS, ms).unwrap(),
                THREE_HRS / 2,
                "ms_per24 = {ms}"
            );
        }
    }

    #[test]
    fn test_boundary_belongs_to_the_bin_it_closes() {
        assert_eq!(
            find_bin_for_time_of_day(THREE_HRS, THREE_HRS).unwrap(),
            THREE_HRS / 2
        );
        assert_eq!(
            find_bin_for_time_of_day(THREE_HRS, THREE_HRS + 1).unwrap(),
            THREE_HRS + THREE_HRS / 2
        );
    }

    #[test]
    fn test_adjacent_bins_step_by_bin_size() {
        let mut previous = find_bin_for_time_of_day(ONE_HR, 1).unwrap();
        for hour in 1..24 {
            let center = find_bin_for_time_of_day(ONE_HR, hour * ONE_HR + 1).unwrap();
            assert_eq!(center - previous, ONE_HR);
            previous = center;
        }
    }

    #[test]
    fn test_every_offset_maps_to_a_listed_center() {
        let centers = bin_centers(THREE_HRS);
        // step across the day at an awkward stride so bin interiors and
        // boundaries both get hit
        let mut ms = 0;
        while ms < TWENTY_FOUR_HRS {
            let center = find_bin_for_time_of_day(THREE_HRS, ms).unwrap();
            assert!(centers.contains(&center), "ms_per24 = {ms}");
            ms += 37 * 60_000 + 13;
        }
    }

    #[test]
    fn test_domain_bounds_are_strict() {
        assert!(find_bin_for_time_of_day(THREE_HRS, -1).is_err());
        assert!(find_bin_for_time_of_day(THREE_HRS, TWENTY_FOUR_HRS).is_err());
        // last valid millisecond of the day
        assert_eq!(
            find_bin_for_time_of_day(THREE_HRS, TWENTY_FOUR_HRS - 1).unwrap(),
            TWENTY_FOUR_HRS - THREE_HRS / 2
        );
    }

    #[test]
    fn test_bin_centers_cover_the_day() {
        let centers = bin_centers(THREE_HRS);
        assert_eq!(centers.len(), 8);
        assert_eq!(centers[0], THREE_HRS / 2);
        assert_eq!(centers[7], TWENTY_FOUR_HRS - THREE_HRS / 2);

        let hourly = bin_centers(ONE_HR);
        assert_eq!(hourly.len(), 24);
    }

    #[test]
    fn test_bin_centers_non_positive_width() {
        assert!(bin_centers(0).is_empty());
        assert!(bin_centers(-THREE_HRS).is_empty());
    }
}
