//! Selectable fiscal years.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Europe::Paris;

/// How many years back, the current one included, a ledger may cover.
pub const YEAR_WINDOW: i32 = 3;

/// Current calendar year in metropolitan France.
///
/// Used so that a ledger opened just after midnight on 1 January, Paris time,
/// already sees the new year.
#[must_use]
pub fn current_year_at(now: DateTime<Utc>) -> i32 {
    now.with_timezone(&Paris).year()
}

/// Current calendar year in metropolitan France.
#[must_use]
pub fn current_year() -> i32 {
    current_year_at(Utc::now())
}

/// Years a new ledger may cover, newest first: `{Y, Y-1, Y-2}` minus years
/// the owner already has a ledger for.
#[must_use]
pub fn available_years(current_year: i32, used_years: &[i32]) -> Vec<i32> {
    (0..YEAR_WINDOW)
        .map(|offset| current_year - offset)
        .filter(|year| !used_years.contains(year))
        .collect()
}
