//! Normalization of extracted timestamp strings.
//!
//! Timestamps are naive wall-clock values; they are converted to epoch
//! milliseconds as if they were UTC so that they sort and compare, nothing
//! more. Layouts without a date borrow the most recent date seen earlier in
//! the same file.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use logsift_parser::TimestampKind;

/// sortable value plus presentation strings for one timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTime {
    pub millis: i64,
    /// the calendar date used, if one was known
    pub date: Option<NaiveDate>,
    pub display_date: Option<String>,
    pub display_time: String,
}

/// normalize `text` (as extracted with layout `kind`)
///
/// returns `None` for impossible calendar or clock values
pub fn derive_time(text: &str, kind: TimestampKind, anchor: Option<NaiveDate>) -> Option<DerivedTime> {
    let (date_part, clock_part) = match kind {
        TimestampKind::TimeColonMillis | TimestampKind::TimeDotMillis => (None, text),
        TimestampKind::IsoMillis | TimestampKind::IsoSeconds => {
            let (date, clock) = text.split_once('T')?;
            (Some(date), clock)
        }
        _ => {
            let (date, clock) = text.split_once(' ')?;
            (Some(date), clock)
        }
    };

    let date = match (kind, date_part) {
        (TimestampKind::SlashShortYear, Some(d)) => Some(parse_dmy(d)?),
        (TimestampKind::SlashLongYear, Some(d)) => Some(parse_dmy(d)?),
        (_, Some(d)) => Some(parse_ymd(d)?),
        (_, None) => None,
    };
    let time = parse_clock(clock_part)?;

    let resolved = date.or(anchor);
    // no date anywhere: fall back to 1970-01-01
    let day = resolved.unwrap_or_default();
    let millis = NaiveDateTime::new(day, time).and_utc().timestamp_millis();

    Some(DerivedTime {
        millis,
        date: resolved,
        display_date: resolved.map(|d| d.format("%Y-%m-%d").to_string()),
        display_time: time.format("%H:%M:%S%.3f").to_string(),
    })
}

/// `YYYY-MM-DD`
pub(crate) fn parse_ymd(text: &str) -> Option<NaiveDate> {
    let mut parts = text.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `DD/MM/YY` (20YY) or `DD/MM/YYYY`
fn parse_dmy(text: &str) -> Option<NaiveDate> {
    let mut parts = text.splitn(3, '/');
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let year_text = parts.next()?;
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `HH:MM:SS` optionally followed by `:mmm` or `.f{1,6}`; fractions truncate to millis
pub(crate) fn parse_clock(text: &str) -> Option<NaiveTime> {
    let hms = text.get(..8)?;
    let mut parts = hms.splitn(3, ':');
    let hour = parts.next()?.parse().ok()?;
    let minute = parts.next()?.parse().ok()?;
    let second = parts.next()?.parse().ok()?;

    let fraction = &text[8..];
    let millis = if fraction.is_empty() {
        0
    } else {
        let digits = fraction.strip_prefix([':', '.'])?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let mut ms = digits.chars().take(3).collect::<String>();
        while ms.len() < 3 {
            ms.push('0');
        }
        ms.parse().ok()?
    };

    NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
}

/// last millisecond of the second starting at `millis`
pub(crate) fn end_of_second(millis: i64) -> i64 {
    millis + 999
}

/// last millisecond of `date`
pub(crate) fn end_of_day(date: NaiveDate) -> Option<i64> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, milli: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, milli)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    #[test]
    fn test_colon_millis() {
        let derived = derive_time("2025-08-02 23:54:57:514", TimestampKind::DateColonMillis, None)
            .unwrap();
        assert_eq!(derived.millis, ms(2025, 8, 2, 23, 54, 57, 514));
        assert_eq!(derived.display_date.as_deref(), Some("2025-08-02"));
        assert_eq!(derived.display_time, "23:54:57.514");
    }

    #[test]
    fn test_microseconds_truncate() {
        let derived =
            derive_time("2024-01-01 10:00:00.123999", TimestampKind::DateFraction, None).unwrap();
        assert_eq!(derived.millis, ms(2024, 1, 1, 10, 0, 0, 123));
    }

    #[test]
    fn test_short_year_is_2000s() {
        let derived = derive_time("02/08/25 23:54:57.514", TimestampKind::SlashShortYear, None)
            .unwrap();
        assert_eq!(derived.date, NaiveDate::from_ymd_opt(2025, 8, 2));
    }

    #[test]
    fn test_long_year() {
        let derived = derive_time("02/08/1999 01:02:03.004", TimestampKind::SlashLongYear, None)
            .unwrap();
        assert_eq!(derived.millis, ms(1999, 8, 2, 1, 2, 3, 4));
    }

    #[test]
    fn test_iso() {
        let derived = derive_time("2024-03-04T05:06:07", TimestampKind::IsoSeconds, None).unwrap();
        assert_eq!(derived.millis, ms(2024, 3, 4, 5, 6, 7, 0));
        assert_eq!(derived.display_time, "05:06:07.000");
    }

    #[test]
    fn test_time_only_uses_anchor() {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 15);
        let derived = derive_time("10:30:00.123", TimestampKind::TimeDotMillis, anchor).unwrap();
        assert_eq!(derived.millis, ms(2025, 1, 15, 10, 30, 0, 123));
        assert_eq!(derived.display_date.as_deref(), Some("2025-01-15"));
    }

    #[test]
    fn test_time_only_without_anchor() {
        let derived = derive_time("00:00:01:500", TimestampKind::TimeColonMillis, None).unwrap();
        assert_eq!(derived.millis, 1500);
        assert_eq!(derived.display_date, None);
        assert_eq!(derived.date, None);
    }

    #[test]
    fn test_invalid_calendar_values() {
        assert_eq!(derive_time("2025-13-40 10:00:00", TimestampKind::DateSeconds, None), None);
        assert_eq!(derive_time("99:00:00.000", TimestampKind::TimeDotMillis, None), None);
    }

    #[test]
    fn test_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(end_of_day(date), Some(ms(2024, 1, 2, 23, 59, 59, 999)));
    }
}
