//! Cutoff times for date conditionals.
//!
//! `%<[3d?new&old>` is true when the field's timestamp is newer than three
//! days ago; `%<[d?today&older>` (count zero) when it is newer than local
//! midnight. The arithmetic happens on local calendar time and normalises
//! out-of-range dates by rolling forward, so one month before March 31st is
//! March 3rd (there is no February 31st).
//!
//! Every function has an `_at` variant taking "now" explicitly.

use chrono::{Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::node::Period;

/// Unix time of `count` periods before now.
pub fn cutoff_number(period: Period, count: u16) -> i64 {
    cutoff_number_at(Local::now().naive_local(), period, count)
}

/// Unix time of the start of the current period.
pub fn cutoff_this(period: Period) -> i64 {
    cutoff_this_at(Local::now().naive_local(), period)
}

/// True if `timestamp` is strictly newer than the cutoff for `(period, count)`.
pub fn is_newer(timestamp: i64, period: Period, count: u16) -> bool {
    let cutoff = if count == 0 {
        cutoff_this(period)
    } else {
        cutoff_number(period, count)
    };
    timestamp > cutoff
}

pub fn cutoff_number_at(now: NaiveDateTime, period: Period, count: u16) -> i64 {
    let count = i64::from(count);
    let then = match period {
        Period::Year => shift_months(now, count * 12),
        Period::Month => shift_months(now, count),
        Period::Week => now - Duration::days(7 * count),
        Period::Day => now - Duration::days(count),
        Period::Hour => now - Duration::hours(count),
        Period::Minute => now - Duration::minutes(count),
    };
    local_timestamp(then)
}

pub fn cutoff_this_at(now: NaiveDateTime, period: Period) -> i64 {
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);
    let date = now.date();

    let then = match period {
        Period::Year => date
            .with_day(1)
            .and_then(|d| d.with_month(1))
            .and_then(midnight),
        Period::Month => date.with_day(1).and_then(midnight),
        Period::Week => date.with_day(1).map(|d| d.and_time(now.time())),
        Period::Day => midnight(date),
        Period::Hour => now.with_minute(0).and_then(|t| t.with_second(0)),
        Period::Minute => now.with_second(0),
    };
    local_timestamp(then.unwrap_or(now))
}

/// Moves `months` months back, keeping day-of-month and time, letting an
/// overlong day spill into the following month.
fn shift_months(now: NaiveDateTime, months: i64) -> NaiveDateTime {
    let total = i64::from(now.year()) * 12 + i64::from(now.month0()) - months;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12);

    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month0 as u32 + 1, 1))
        .and_then(|first| first.checked_add_signed(Duration::days(i64::from(now.day0()))))
        .map(|date| date.and_time(now.time()))
        .unwrap_or(now)
}

/// Interprets a naive local time as Unix seconds.
///
/// Ambiguous times (clocks going back) take the earlier instant; times in a
/// gap (clocks going forward) are moved one hour later.
fn local_timestamp(naive: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(t) => t.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map_or_else(|| naive.and_utc().timestamp(), |t| t.timestamp()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, ss)
            .unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> i64 {
        local_timestamp(at(y, m, d, hh, mm, ss))
    }

    #[test]
    fn days_cross_month_boundary() {
        let now = at(2024, 3, 2, 10, 30, 15);
        assert_eq!(cutoff_number_at(now, Period::Day, 3), ts(2024, 2, 28, 10, 30, 15));
    }

    #[test]
    fn weeks_are_seven_days() {
        let now = at(2024, 1, 10, 8, 0, 0);
        assert_eq!(cutoff_number_at(now, Period::Week, 2), ts(2023, 12, 27, 8, 0, 0));
    }

    #[test]
    fn hours_and_minutes() {
        let now = at(2024, 6, 1, 0, 10, 0);
        assert_eq!(cutoff_number_at(now, Period::Hour, 1), ts(2024, 5, 31, 23, 10, 0));
        assert_eq!(cutoff_number_at(now, Period::Minute, 15), ts(2024, 5, 31, 23, 55, 0));
    }

    #[test]
    fn months_roll_the_year() {
        let now = at(2024, 2, 15, 12, 0, 0);
        assert_eq!(cutoff_number_at(now, Period::Month, 3), ts(2023, 11, 15, 12, 0, 0));
    }

    #[test]
    fn overlong_day_spills_forward() {
        let now = at(2024, 3, 31, 12, 0, 0);
        // 2024-02-31 normalises to 2024-03-02
        assert_eq!(cutoff_number_at(now, Period::Month, 1), ts(2024, 3, 2, 12, 0, 0));

        let leap = at(2024, 2, 29, 9, 0, 0);
        assert_eq!(cutoff_number_at(leap, Period::Year, 1), ts(2023, 3, 1, 9, 0, 0));
    }

    #[test]
    fn this_period_truncates() {
        let now = at(2024, 5, 17, 13, 45, 30);
        assert_eq!(cutoff_this_at(now, Period::Year), ts(2024, 1, 1, 0, 0, 0));
        assert_eq!(cutoff_this_at(now, Period::Month), ts(2024, 5, 1, 0, 0, 0));
        assert_eq!(cutoff_this_at(now, Period::Day), ts(2024, 5, 17, 0, 0, 0));
        assert_eq!(cutoff_this_at(now, Period::Hour), ts(2024, 5, 17, 13, 0, 0));
        assert_eq!(cutoff_this_at(now, Period::Minute), ts(2024, 5, 17, 13, 45, 0));
    }

    #[test]
    fn this_week_only_resets_day() {
        let now = at(2024, 5, 17, 13, 45, 30);
        assert_eq!(cutoff_this_at(now, Period::Week), ts(2024, 5, 1, 13, 45, 30));
    }

    #[test]
    fn today_is_local_midnight() {
        let now = Local::now().naive_local();
        let midnight = now.date().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(cutoff_this(Period::Day), local_timestamp(midnight));
    }

    #[test]
    fn newer_than_cutoff() {
        let now = Local::now().timestamp();
        assert!(is_newer(now, Period::Day, 3));
        assert!(!is_newer(now - 4 * 86_400, Period::Day, 3));
        assert!(is_newer(now, Period::Year, 0));
        assert!(!is_newer(0, Period::Minute, 0));
    }
}
