//! Clock-time helpers
//!
//! Readings are positioned within the 24-hour cycle by their millisecond
//! offset from local midnight (`ms_per24`). This module holds the shared
//! time constants and the conversions between UTC instants and intra-day
//! offsets.

use crate::error::TrendsError;
use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};

/// Milliseconds in one hour
pub const ONE_HR: i64 = 3_600_000;

/// Milliseconds in three hours (the default trends bin width)
pub const THREE_HRS: i64 = 10_800_000;

/// Milliseconds in one 24-hour day
pub const TWENTY_FOUR_HRS: i64 = 86_400_000;

/// Milliseconds since local midnight for a UTC instant viewed at a fixed
/// UTC offset.
pub fn ms_per24(timestamp: DateTime<Utc>, tz_offset: FixedOffset) -> i64 {
    let local = timestamp.with_timezone(&tz_offset);
    i64::from(local.num_seconds_from_midnight()) * 1000
        + i64::from(local.timestamp_subsec_millis())
}

/// Format an intra-day offset as a clock time, e.g. `1:30 am`.
///
/// Accepts `[0, 86_400_000]` inclusive; the full-day value wraps to
/// midnight.
///
/// # Errors
/// Returns [`TrendsError::MsPer24OutOfRange`] for negative offsets or
/// offsets beyond one full day.
pub fn format_clocktime_from_ms_per24(ms: i64) -> Result<String, TrendsError> {
    if !(0..=TWENTY_FOUR_HRS).contains(&ms) {
        return Err(TrendsError::MsPer24OutOfRange(ms));
    }
    let ms = ms % TWENTY_FOUR_HRS;
    let secs = (ms / 1000) as u32;
    let nanos = ((ms % 1000) * 1_000_000) as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
        .ok_or(TrendsError::MsPer24OutOfRange(ms))?;
    Ok(time.format("%-I:%M %P").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ms_per24_utc_midnight() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(ms_per24(ts, utc), 0);
    }

    #[test]
    fn test_ms_per24_with_offset() {
        // 00:00 UTC is 02:00 at UTC+2
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(ms_per24(ts, plus_two), 2 * ONE_HR);

        // 23:30 UTC is 18:30 at UTC-5
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(ms_per24(ts, minus_five), 18 * ONE_HR + 30 * 60_000);
    }

    #[test]
    fn test_ms_per24_subsecond() {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 15, 6, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(250))
            .unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(ms_per24(ts, utc), 6 * ONE_HR + 250);
    }

    #[test]
    fn test_format_clocktime() {
        assert_eq!(format_clocktime_from_ms_per24(0).unwrap(), "12:00 am");
        assert_eq!(
            format_clocktime_from_ms_per24(THREE_HRS / 2).unwrap(),
            "1:30 am"
        );
        assert_eq!(
            format_clocktime_from_ms_per24(12 * ONE_HR).unwrap(),
            "12:00 pm"
        );
        assert_eq!(
            format_clocktime_from_ms_per24(16 * ONE_HR + 5 * 60_000).unwrap(),
            "4:05 pm"
        );
    }

    #[test]
    fn test_format_clocktime_full_day_wraps() {
        assert_eq!(
            format_clocktime_from_ms_per24(TWENTY_FOUR_HRS).unwrap(),
            "12:00 am"
        );
    }

    #[test]
    fn test_format_clocktime_out_of_range() {
        assert!(format_clocktime_from_ms_per24(-1).is_err());
        assert!(format_clocktime_from_ms_per24(TWENTY_FOUR_HRS + 1).is_err());
    }
}
