//! Ordered event collection value.
//!
//! # Responsibility
//! - Hold the complete event set in insertion order.
//! - Offer lookup helpers and copy-on-write transitions for the scheduler.
//!
//! # Invariants
//! - Event ids are unique within one collection.
//! - Transitions return a new collection; `self` is never mutated.

use crate::model::event::{Event, EventId, EventValidationError};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Complete ordered set of events at one point in time.
///
/// Serializes as a plain JSON array of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from caller-assembled events.
    ///
    /// # Errors
    /// - Any record-level failure from `Event::validate`.
    /// - `DuplicateId` when two events share one id.
    pub fn from_events(events: Vec<Event>) -> Result<Self, EventValidationError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            event.validate()?;
            if !seen.insert(&event.id) {
                return Err(EventValidationError::DuplicateId(event.id.clone()));
            }
        }
        Ok(Self { events })
    }

    /// Caller guarantees ids are already unique.
    pub(crate) fn from_unique_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn contains_id(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    /// Events dated `day`, in collection order.
    pub fn on_day(&self, day: NaiveDate) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |event| event.date == day)
    }

    pub(crate) fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|event| &event.id == id)
    }

    pub(crate) fn appended(&self, event: Event) -> Self {
        let mut events = Vec::with_capacity(self.events.len() + 1);
        events.extend(self.events.iter().cloned());
        events.push(event);
        Self { events }
    }

    pub(crate) fn replaced(&self, index: usize, event: Event) -> Self {
        let events = self
            .events
            .iter()
            .enumerate()
            .map(|(i, existing)| {
                if i == index {
                    event.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Self { events }
    }

    pub(crate) fn removed(&self, index: usize) -> Self {
        let events = self
            .events
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, event)| event.clone())
            .collect();
        Self { events }
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
