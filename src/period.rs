//! Calendar-period bucketing shared by every aggregation and insight path.
//!
//! Weeks start Monday 00:00:00 and end Sunday 23:59:59.999. Week 1 of a
//! year begins on that year's first Monday; days before it belong to the
//! previous year's numbering, counted from the previous year's first
//! Monday. Week numbers are purely arithmetic and never capped at 52/53.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Supported bucketing granularities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
    Year,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for PeriodKind {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "year" => Ok(PeriodKind::Year),
            other => Err(TrackerError::InvalidRef(format!(
                "unknown period `{}`",
                other
            ))),
        }
    }
}

/// First Monday of the given calendar year, the anchor for week numbering.
pub fn first_monday(year: i32) -> NaiveDate {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let monday_offset = jan1.weekday().num_days_from_monday();
    let days_to_add = if monday_offset == 0 {
        0
    } else {
        7 - monday_offset
    };
    jan1 + Duration::days(days_to_add as i64)
}

/// Week key (`YYYY-Wnn`) owning the given date.
pub fn week_key(date: NaiveDate) -> String {
    let offset = (date - first_monday(date.year())).num_days();
    if offset >= 0 {
        return format!("{}-W{:02}", date.year(), offset / 7 + 1);
    }
    // Before this year's first Monday: number against the previous year.
    let prev_year = date.year() - 1;
    let prev_offset = (date - first_monday(prev_year)).num_days();
    format!("{}-W{:02}", prev_year, prev_offset / 7 + 1)
}

/// Month key (`YYYY-MM`) owning the given date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

/// Year key (`YYYY`) owning the given date.
pub fn year_key(date: NaiveDate) -> String {
    date.year().to_string()
}

/// Derives the key of the requested granularity for a date.
pub fn key_for(kind: PeriodKind, date: NaiveDate) -> String {
    match kind {
        PeriodKind::Week => week_key(date),
        PeriodKind::Month => month_key(date),
        PeriodKind::Year => year_key(date),
    }
}

/// Inclusive `[start, end]` instant range covered by a week key.
pub fn week_range(key: &str) -> Result<(NaiveDateTime, NaiveDateTime), TrackerError> {
    let (year, week) = parse_week_key(key)?;
    let start = first_monday(year) + Duration::days((week - 1) * 7);
    let end = start + Duration::days(6);
    Ok((day_start(start), day_end(end)))
}

/// Inclusive `[start, end]` instant range covered by a month key.
pub fn month_range(key: &str) -> Result<(NaiveDateTime, NaiveDateTime), TrackerError> {
    let (year, month) = parse_month_key(key)?;
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| invalid_key(key))?;
    let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
        .ok_or_else(|| invalid_key(key))?;
    Ok((day_start(start), day_end(end)))
}

/// Inclusive `[start, end]` instant range covered by a year key.
pub fn year_range(key: &str) -> Result<(NaiveDateTime, NaiveDateTime), TrackerError> {
    let year = parse_year_key(key)?;
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| invalid_key(key))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| invalid_key(key))?;
    Ok((day_start(start), day_end(end)))
}

/// Dispatches to the range function matching the granularity.
pub fn range_for(kind: PeriodKind, key: &str) -> Result<(NaiveDateTime, NaiveDateTime), TrackerError> {
    match kind {
        PeriodKind::Week => week_range(key),
        PeriodKind::Month => month_range(key),
        PeriodKind::Year => year_range(key),
    }
}

/// Key of the week immediately before the given one.
///
/// Walks back through the week's Monday so year boundaries resolve through
/// the same derivation as forward bucketing.
pub fn previous_week_key(key: &str) -> Result<String, TrackerError> {
    let (year, week) = parse_week_key(key)?;
    let monday = first_monday(year) + Duration::days((week - 1) * 7);
    Ok(week_key(monday - Duration::days(7)))
}

/// Key of the month immediately before the given one.
pub fn previous_month_key(key: &str) -> Result<String, TrackerError> {
    let (year, month) = parse_month_key(key)?;
    if month == 1 {
        Ok(format!("{}-{:02}", year - 1, 12))
    } else {
        Ok(format!("{}-{:02}", year, month - 1))
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

fn parse_week_key(key: &str) -> Result<(i32, i64), TrackerError> {
    let (year_part, week_part) = key.split_once("-W").ok_or_else(|| invalid_key(key))?;
    let year: i32 = year_part.parse().map_err(|_| invalid_key(key))?;
    let week: i64 = week_part.parse().map_err(|_| invalid_key(key))?;
    if week < 1 {
        return Err(invalid_key(key));
    }
    Ok((year, week))
}

fn parse_month_key(key: &str) -> Result<(i32, u32), TrackerError> {
    let (year_part, month_part) = key.split_once('-').ok_or_else(|| invalid_key(key))?;
    let year: i32 = year_part.parse().map_err(|_| invalid_key(key))?;
    let month: u32 = month_part.parse().map_err(|_| invalid_key(key))?;
    if !(1..=12).contains(&month) {
        return Err(invalid_key(key));
    }
    Ok((year, month))
}

fn parse_year_key(key: &str) -> Result<i32, TrackerError> {
    key.parse().map_err(|_| invalid_key(key))
}

fn invalid_key(key: &str) -> TrackerError {
    TrackerError::InvalidPeriodKey(key.to_string())
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_monday_handles_monday_and_midweek_years() {
        // 2024-01-01 is itself a Monday.
        assert_eq!(first_monday(2024), date(2024, 1, 1));
        // 2025-01-01 is a Wednesday.
        assert_eq!(first_monday(2025), date(2025, 1, 6));
        assert_eq!(first_monday(2023), date(2023, 1, 2));
    }

    #[test]
    fn week_keys_count_from_first_monday() {
        assert_eq!(week_key(date(2024, 1, 1)), "2024-W01");
        assert_eq!(week_key(date(2024, 1, 7)), "2024-W01");
        assert_eq!(week_key(date(2024, 1, 8)), "2024-W02");
        assert_eq!(week_key(date(2024, 1, 15)), "2024-W03");
    }

    #[test]
    fn days_before_first_monday_use_previous_year_numbering() {
        // 2025-01-01..05 precede 2025's first Monday and stay in 2024's
        // arithmetic numbering (366 leap days / 7 -> week 53).
        assert_eq!(week_key(date(2025, 1, 1)), "2024-W53");
        assert_eq!(week_key(date(2025, 1, 5)), "2024-W53");
        assert_eq!(week_key(date(2025, 1, 6)), "2025-W01");
        // 2022's first Monday is Jan 3, so 2023-01-01 sits 363 days in.
        assert_eq!(week_key(date(2023, 1, 1)), "2022-W52");
    }

    #[test]
    fn month_and_year_keys_are_zero_padded() {
        assert_eq!(month_key(date(2024, 3, 9)), "2024-03");
        assert_eq!(month_key(date(2024, 12, 31)), "2024-12");
        assert_eq!(year_key(date(2024, 6, 1)), "2024");
    }

    #[test]
    fn week_range_spans_monday_through_sunday() {
        let (start, end) = week_range("2024-W02").unwrap();
        assert_eq!(start, date(2024, 1, 8).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            end,
            date(2024, 1, 14).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn month_range_covers_leap_february() {
        let (start, end) = month_range("2024-02").unwrap();
        assert_eq!(start.date(), date(2024, 2, 1));
        assert_eq!(end.date(), date(2024, 2, 29));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(
            week_range("2024-02"),
            Err(TrackerError::InvalidPeriodKey(_))
        ));
        assert!(matches!(
            week_range("2024-W00"),
            Err(TrackerError::InvalidPeriodKey(_))
        ));
        assert!(matches!(
            month_range("2024-13"),
            Err(TrackerError::InvalidPeriodKey(_))
        ));
        assert!(matches!(
            month_range("garbage"),
            Err(TrackerError::InvalidPeriodKey(_))
        ));
        assert!(matches!(
            year_range("20x4"),
            Err(TrackerError::InvalidPeriodKey(_))
        ));
    }

    #[test]
    fn previous_keys_walk_across_year_boundaries() {
        assert_eq!(previous_week_key("2024-W02").unwrap(), "2024-W01");
        assert_eq!(previous_week_key("2025-W01").unwrap(), "2024-W53");
        assert_eq!(previous_month_key("2024-03").unwrap(), "2024-02");
        assert_eq!(previous_month_key("2024-01").unwrap(), "2023-12");
    }

    #[test]
    fn period_kind_round_trips_through_strings() {
        for kind in [PeriodKind::Week, PeriodKind::Month, PeriodKind::Year] {
            assert_eq!(kind.to_string().parse::<PeriodKind>().unwrap(), kind);
        }
        assert!("quarter".parse::<PeriodKind>().is_err());
    }
}
