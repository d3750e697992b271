use chrono::{Datelike, Duration, NaiveDate, Weekday};
use fintrack_core::period::{
    self, month_key, month_range, week_key, week_range, year_key, year_range, PeriodKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    let start = date(year, 1, 1);
    let end = date(year, 12, 31);
    start.iter_days().take_while(move |day| *day <= end)
}

#[test]
fn every_date_falls_inside_its_own_key_ranges() {
    // Sweeps a leap year and its neighbors, including both year boundaries.
    for year in 2023..=2025 {
        for day in days_of_year(year) {
            let (week_start, week_end) = week_range(&week_key(day)).expect("valid derived key");
            assert!(
                week_start.date() <= day && day <= week_end.date(),
                "{day} outside {:?}..{:?}",
                week_start,
                week_end
            );

            let (month_start, month_end) =
                month_range(&month_key(day)).expect("valid derived key");
            assert!(month_start.date() <= day && day <= month_end.date());

            let (year_start, year_end) = year_range(&year_key(day)).expect("valid derived key");
            assert!(year_start.date() <= day && day <= year_end.date());
        }
    }
}

#[test]
fn any_day_inside_a_week_range_derives_the_same_key() {
    for key in ["2024-W01", "2024-W09", "2024-W53", "2025-W26", "2022-W52"] {
        let (start, end) = week_range(key).expect("parsable key");
        let mut day = start.date();
        while day <= end.date() {
            assert_eq!(week_key(day), key, "inconsistent derivation for {day}");
            day += Duration::days(1);
        }
    }
}

#[test]
fn week_keys_change_exactly_on_mondays() {
    for year in [2023, 2024, 2025] {
        let mut previous_key = None;
        for day in days_of_year(year) {
            let key = week_key(day);
            if let Some(prev) = previous_key {
                if day.weekday() == Weekday::Mon {
                    assert_ne!(key, prev, "no rollover on Monday {day}");
                } else {
                    assert_eq!(key, prev, "mid-week rollover on {day}");
                }
            }
            previous_key = Some(key);
        }
    }
}

#[test]
fn week_keys_over_a_year_are_contiguous_and_never_repeat() {
    let mut ordered: Vec<String> = Vec::new();
    for day in days_of_year(2024).chain(days_of_year(2025)) {
        let key = week_key(day);
        if ordered.last() != Some(&key) {
            ordered.push(key);
        }
    }
    let mut deduped = ordered.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(
        deduped.len(),
        ordered.len(),
        "a week key reappeared after a different key intervened"
    );
}

#[test]
fn jan_first_off_monday_belongs_to_previous_year_numbering() {
    // 2025-01-01 is a Wednesday; 2024 is a leap year anchored on Monday
    // Jan 1, so the trailing week is number 53.
    assert_eq!(week_key(date(2025, 1, 1)), "2024-W53");
    // 2023-01-01 is a Sunday; 2022 anchors on Monday Jan 3.
    assert_eq!(week_key(date(2023, 1, 1)), "2022-W52");
    // A Monday Jan 1 owns week 1 outright.
    assert_eq!(week_key(date(2024, 1, 1)), "2024-W01");
}

#[test]
fn known_scenario_keys_for_january_2024() {
    assert_eq!(week_key(date(2024, 1, 8)), "2024-W02");
    assert_eq!(week_key(date(2024, 1, 15)), "2024-W03");
    assert_eq!(month_key(date(2024, 1, 8)), "2024-01");
    assert_eq!(year_key(date(2024, 1, 8)), "2024");
}

#[test]
fn range_for_dispatches_by_granularity() {
    let (start, end) = period::range_for(PeriodKind::Year, "2024").unwrap();
    assert_eq!(start.date(), date(2024, 1, 1));
    assert_eq!(end.date(), date(2024, 12, 31));

    assert!(period::range_for(PeriodKind::Week, "2024-01").is_err());
    assert!(period::range_for(PeriodKind::Month, "2024-W01").is_err());
}

#[test]
fn previous_key_walks_match_forward_derivation() {
    // Walking back from each week's Monday lands on the key the previous
    // Monday derives to, across year boundaries.
    let mut monday = date(2024, 1, 1);
    for _ in 0..60 {
        let next_monday = monday + Duration::days(7);
        assert_eq!(
            period::previous_week_key(&week_key(next_monday)).unwrap(),
            week_key(monday)
        );
        monday = next_monday;
    }

    assert_eq!(period::previous_month_key("2025-01").unwrap(), "2024-12");
    assert_eq!(period::previous_month_key("2025-07").unwrap(), "2025-06");
}
