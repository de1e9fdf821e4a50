//! Injectable id generators for newly created events.
//!
//! # Invariants
//! - Generators never return an empty id.
//! - Uniqueness against the current collection is enforced by the scheduler,
//!   not by generators.

use crate::model::event::EventId;
use chrono::Utc;
use uuid::Uuid;

/// Source of fresh event identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> EventId;
}

/// Random UUID v4 ids. Default for hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> EventId {
        EventId(Uuid::new_v4().to_string())
    }
}

/// Epoch-millisecond ids, compatible with snapshots written by older hosts.
///
/// Two calls within the same millisecond still yield distinct ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockIdGenerator {
    last_ms: i64,
}

impl IdGenerator for ClockIdGenerator {
    fn next_id(&mut self) -> EventId {
        let now_ms = Utc::now().timestamp_millis();
        self.last_ms = now_ms.max(self.last_ms + 1);
        EventId(self.last_ms.to_string())
    }
}

/// Deterministic `<prefix><n>` ids for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> EventId {
        let id = EventId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> EventId {
        (**self).next_id()
    }
}
