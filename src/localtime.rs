/*
 *  localtime.rs
 *
 *  wxpaper - weather on paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
//! Eastern time helpers: DST window, UTC to local conversion and the
//! `"... at HH:MM EDT"` sunrise/sunset summaries.
//!
//! The feed only covers a single region so the zone rules are fixed
//! (UTC-5 standard, UTC-4 daylight, US/Canada changeover Sundays).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ParseError;

/// Offset from UTC outside daylight saving time.
pub const STANDARD_OFFSET_HOURS: i64 = -5;
/// Offset from UTC during daylight saving time.
pub const DAYLIGHT_OFFSET_HOURS: i64 = -4;
/// Wall clock hour (standard time) at which the clocks change.
const CHANGEOVER_HOUR: i64 = 2;

/// Compact UTC stamp used by the hourly forecast, e.g. `202503100600`.
const COMPACT_UTC_FORMAT: &str = "%Y%m%d%H%M";
/// Local display stamp, e.g. `03/10/2025 02:00 AM`.
pub const LOCAL_DISPLAY_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// First Sunday on or after `date`.
fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    let monday_based = date.weekday().num_days_from_monday() as i64;
    date + Duration::days((6 - monday_based + 7) % 7)
}

/// Start of daylight saving time: second Sunday of March, 00:00.
pub fn dst_start(year: i32) -> Option<NaiveDateTime> {
    let march_first = NaiveDate::from_ymd_opt(year, 3, 1)?;
    let second_sunday = sunday_on_or_after(march_first) + Duration::days(7);
    second_sunday.and_hms_opt(0, 0, 0)
}

/// End of daylight saving time: first Sunday of November, 00:00.
pub fn dst_end(year: i32) -> Option<NaiveDateTime> {
    let november_first = NaiveDate::from_ymd_opt(year, 11, 1)?;
    sunday_on_or_after(november_first).and_hms_opt(0, 0, 0)
}

/// True iff `date` falls in `[dst_start, dst_end)` of its own year.
pub fn is_daylight_saving_time(date: NaiveDateTime) -> bool {
    match (dst_start(date.year()), dst_end(date.year())) {
        (Some(start), Some(end)) => start <= date && date < end,
        _ => false,
    }
}

/// Parse a 12 digit `YYYYMMDDHHMM` UTC stamp.
pub fn parse_compact_utc(compact: &str) -> Result<NaiveDateTime, ParseError> {
    if compact.len() != 12 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::CompactTimestamp(compact.to_string()));
    }
    NaiveDateTime::parse_from_str(compact, COMPACT_UTC_FORMAT)
        .map_err(|_| ParseError::CompactTimestamp(compact.to_string()))
}

/// Shift a UTC instant to local wall clock time.
///
/// The DST window is evaluated on the local standard time less the
/// changeover hour, so the switch lands on 02:00 local instead of midnight.
pub fn utc_instant_to_local(utc: NaiveDateTime) -> NaiveDateTime {
    let probe = utc + Duration::hours(STANDARD_OFFSET_HOURS - CHANGEOVER_HOUR);
    let offset = if is_daylight_saving_time(probe) {
        DAYLIGHT_OFFSET_HOURS
    } else {
        STANDARD_OFFSET_HOURS
    };
    utc + Duration::hours(offset)
}

/// `202503100600` -> `03/10/2025 02:00 AM`
pub fn utc_to_local(compact: &str) -> Result<String, ParseError> {
    let utc = parse_compact_utc(compact)?;
    Ok(utc_instant_to_local(utc)
        .format(LOCAL_DISPLAY_FORMAT)
        .to_string())
}

/// Pull the clock time out of a rise/set summary such as
/// `"Sunrise Monday March 10, 2025 at 07:23 EDT"`.
///
/// Anything unparseable yields `None`.
pub fn parse_local_time_summary(text: &str) -> Option<NaiveTime> {
    let tail = match text.rfind(" at ") {
        Some(idx) => &text[idx + 4..],
        None => text,
    };
    // drop the zone token (EDT, EST, ...)
    let clock = tail
        .split_whitespace()
        .find(|tok| tok.contains(':'))?;
    NaiveTime::parse_from_str(clock, "%H:%M").ok()
}

/// `07:23` -> `07:23 am`
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string().to_lowercase()
}

/// `03/10/2025 02:00 AM` -> `02:00 AM`
pub fn hour_of_local_display(display: &str) -> Result<String, ParseError> {
    NaiveDateTime::parse_from_str(display, LOCAL_DISPLAY_FORMAT)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .map_err(|_| ParseError::LocalTimestamp(display.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_dst_window_2025() {
        assert_eq!(dst_start(2025), Some(at(2025, 3, 9, 0, 0)));
        assert_eq!(dst_end(2025), Some(at(2025, 11, 2, 0, 0)));
    }

    #[test]
    fn test_dst_window_when_month_starts_on_sunday() {
        // March 1st 2026 is a Sunday, the second Sunday is the 8th
        assert_eq!(dst_start(2026), Some(at(2026, 3, 8, 0, 0)));
        // November 1st 2026 is a Sunday
        assert_eq!(dst_end(2026), Some(at(2026, 11, 1, 0, 0)));
    }

    #[test]
    fn test_dst_half_open_boundaries() {
        assert!(!is_daylight_saving_time(at(2025, 3, 8, 23, 59)));
        assert!(is_daylight_saving_time(at(2025, 3, 9, 0, 0)));
        assert!(is_daylight_saving_time(at(2025, 7, 1, 12, 0)));
        assert!(is_daylight_saving_time(at(2025, 11, 1, 23, 59)));
        assert!(!is_daylight_saving_time(at(2025, 11, 2, 0, 0)));
        assert!(!is_daylight_saving_time(at(2025, 1, 15, 8, 0)));
        assert!(!is_daylight_saving_time(at(2025, 12, 31, 23, 59)));
    }

    #[test]
    fn test_first_sunday_of_march_is_not_dst() {
        assert!(!is_daylight_saving_time(at(2025, 3, 2, 12, 0)));
    }

    #[test]
    fn test_utc_to_local_before_and_after_spring_forward() {
        assert_eq!(utc_to_local("202503090600").unwrap(), "03/09/2025 01:00 AM");
        assert_eq!(utc_to_local("202503100600").unwrap(), "03/10/2025 02:00 AM");
    }

    #[test]
    fn test_utc_to_local_crosses_midnight() {
        assert_eq!(utc_to_local("202501010300").unwrap(), "12/31/2024 10:00 PM");
        assert_eq!(utc_to_local("202507011800").unwrap(), "07/01/2025 02:00 PM");
    }

    #[test]
    fn test_utc_to_local_rejects_bad_input() {
        assert!(utc_to_local("20250310060").is_err());
        assert!(utc_to_local("2025031006000").is_err());
        assert!(utc_to_local("2025-3-10 06").is_err());
        assert!(utc_to_local("202513100600").is_err());
        assert!(utc_to_local("202503102600").is_err());
        assert!(utc_to_local("").is_err());
    }

    #[test]
    fn test_parse_local_time_summary() {
        let t = parse_local_time_summary("Sunrise Monday March 10, 2025 at 07:23 EDT").unwrap();
        assert_eq!(format_time_of_day(t), "07:23 am");

        let t = parse_local_time_summary("Sunset at 19:05 EST").unwrap();
        assert_eq!(format_time_of_day(t), "07:05 pm");

        // noon and midnight edges of the 12 hour clock
        let t = parse_local_time_summary("at 12:00 EDT").unwrap();
        assert_eq!(format_time_of_day(t), "12:00 pm");
        let t = parse_local_time_summary("at 00:10 EDT").unwrap();
        assert_eq!(format_time_of_day(t), "12:10 am");
    }

    #[test]
    fn test_parse_local_time_summary_uses_last_at() {
        let t = parse_local_time_summary("Look at the sky at 06:45 EDT").unwrap();
        assert_eq!(format_time_of_day(t), "06:45 am");
    }

    #[test]
    fn test_parse_local_time_summary_tolerates_garbage() {
        assert_eq!(parse_local_time_summary(""), None);
        assert_eq!(parse_local_time_summary("Sunrise at dawn"), None);
        assert_eq!(parse_local_time_summary("Sunrise at 25:99 EDT"), None);
    }

    #[test]
    fn test_hour_of_local_display() {
        assert_eq!(hour_of_local_display("03/10/2025 02:00 AM").unwrap(), "02:00 AM");
        assert_eq!(hour_of_local_display("07/01/2025 02:00 PM").unwrap(), "02:00 PM");
        assert!(hour_of_local_display("not a time").is_err());
    }
}
