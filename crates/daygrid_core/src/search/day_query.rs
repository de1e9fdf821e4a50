//! Day and text filter over an event collection.
//!
//! # Invariants
//! - Results keep collection order.
//! - Blank search text matches every event on the day.
//! - Text matching is a case-insensitive substring test on name or description.

use crate::model::collection::EventCollection;
use crate::model::event::Event;
use chrono::NaiveDate;

/// Filter options for one day's event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayQuery {
    pub day: NaiveDate,
    pub text: String,
}

impl DayQuery {
    /// Creates a query listing every event on `day`.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Returns events on `query.day` whose name or description contains
/// `query.text`, ignoring case.
pub fn query_day<'a>(collection: &'a EventCollection, query: &DayQuery) -> Vec<&'a Event> {
    let needle = query.text.trim().to_lowercase();
    collection
        .on_day(query.day)
        .filter(|event| needle.is_empty() || matches_text(event, &needle))
        .collect()
}

fn matches_text(event: &Event, needle: &str) -> bool {
    event.name.to_lowercase().contains(needle)
        || event
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}
