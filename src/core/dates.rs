//! Calendar helpers used to build historical rate requests.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};

/// Returns `base` moved by `delta_days` calendar days in either direction.
///
/// `None` only when the result falls outside chrono's representable range.
pub fn shift_date(base: NaiveDate, delta_days: i64) -> Option<NaiveDate> {
    let days = Days::new(delta_days.unsigned_abs());
    if delta_days >= 0 {
        base.checked_add_days(days)
    } else {
        base.checked_sub_days(days)
    }
}

/// Snaps a weekend date back to the preceding Friday.
///
/// The rate API publishes no weekend fixings, so Saturday moves back one day
/// and Sunday two. Holidays are not considered.
pub fn adjust_to_workday(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sun => 2,
        Weekday::Sat => 1,
        _ => 0,
    };
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// `YYYY-MM-DD`, the form the historical endpoint takes as its path.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
