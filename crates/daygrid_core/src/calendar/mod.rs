//! Calendar-date arithmetic and month projections.
//!
//! # Responsibility
//! - Shift dates by whole calendar days across month and year boundaries.
//! - Describe months for navigation, grids and export scoping.
//!
//! # Invariants
//! - Arithmetic works on date components only; there is no time-of-day or
//!   offset involved, so daylight-saving transitions cannot skew results.

mod month;

pub use month::{month_grid, CalendarError, CalendarMonth, DaySlot};

use crate::model::event::EventValidationError;
use chrono::{Days, NaiveDate};

/// Returns `date` moved by `delta` calendar days.
///
/// # Errors
/// - `DateOutOfRange` when the result leaves chrono's supported range.
pub fn shift_days(date: NaiveDate, delta: i64) -> Result<NaiveDate, EventValidationError> {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.ok_or(EventValidationError::DateOutOfRange { date, delta })
}

/// Signed number of calendar days from `source` to `destination`.
pub fn day_delta(source: NaiveDate, destination: NaiveDate) -> i64 {
    destination.signed_duration_since(source).num_days()
}
