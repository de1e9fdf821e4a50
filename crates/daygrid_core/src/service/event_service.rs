//! Event scheduling use-cases.
//!
//! # Responsibility
//! - Apply create/update/remove/reschedule intents to a caller-owned
//!   collection and return the next collection or a structured rejection.
//! - Enforce the same-day no-overlap invariant on create and update.
//!
//! # Invariants
//! - Input collections are never mutated; rejections leave them untouched.
//! - Validation runs before any overlap check.
//! - Permissive reschedule does not re-check the destination day; strict
//!   reschedule does.
//!
//! # See also
//! - `crate::repo::snapshot_repo` for the host-side load/save cycle

use crate::calendar::{day_delta, shift_days};
use crate::config::{RescheduleMode, SchedulerConfig};
use crate::model::collection::EventCollection;
use crate::model::event::{EventDraft, EventId, EventValidationError};
use crate::model::overlap::find_conflict;
use crate::service::id_source::IdGenerator;
use chrono::NaiveDate;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: u32 = 8;

pub type ScheduleResult<T> = Result<T, Rejection>;

/// Non-fatal reason an intent was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Malformed input, reported before any overlap check.
    Validation(EventValidationError),
    /// The event would overlap `conflicting_id` on `date`.
    OverlapConflict {
        date: NaiveDate,
        conflicting_id: EventId,
    },
    /// Target id is not in the collection.
    NotFound(EventId),
    /// The id generator kept returning ids already in use.
    IdExhausted { attempts: u32 },
}

impl Rejection {
    /// Stable machine-readable code for logs and host envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::OverlapConflict { .. } => "overlap_conflict",
            Self::NotFound(_) => "not_found",
            Self::IdExhausted { .. } => "id_exhausted",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::OverlapConflict {
                date,
                conflicting_id,
            } => write!(
                f,
                "event overlaps existing event {conflicting_id} on {date}"
            ),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::IdExhausted { attempts } => {
                write!(f, "could not allocate a unique event id after {attempts} attempts")
            }
        }
    }
}

impl Error for Rejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for Rejection {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Scheduling core over caller-owned collections.
///
/// Holds only the id source and configuration; no collection state survives
/// between calls.
pub struct EventScheduler<G: IdGenerator> {
    ids: G,
    config: SchedulerConfig,
}

impl<G: IdGenerator> EventScheduler<G> {
    /// Creates a scheduler with default configuration.
    pub fn new(ids: G) -> Self {
        Self::with_config(ids, SchedulerConfig::default())
    }

    pub fn with_config(ids: G, config: SchedulerConfig) -> Self {
        Self { ids, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates `draft`, assigns a fresh id and appends the event.
    ///
    /// # Errors
    /// - `Validation` for malformed drafts.
    /// - `OverlapConflict` when the event overlaps one on the same date.
    /// - `IdExhausted` when no unused id could be drawn.
    pub fn create(
        &mut self,
        collection: &EventCollection,
        draft: EventDraft,
    ) -> ScheduleResult<EventCollection> {
        let result = self.try_create(collection, draft);
        log_outcome("event_create", &result);
        result
    }

    fn try_create(
        &mut self,
        collection: &EventCollection,
        draft: EventDraft,
    ) -> ScheduleResult<EventCollection> {
        let normalized = draft.normalize(&self.config.default_color)?;
        let event = normalized.with_id(self.allocate_id(collection)?);

        if let Some(existing) = find_conflict(collection, &event, None) {
            return Err(Rejection::OverlapConflict {
                date: event.date,
                conflicting_id: existing.id.clone(),
            });
        }

        Ok(collection.appended(event))
    }

    /// Replaces the event `id` wholesale with `draft`, keeping id and position.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Validation` for malformed drafts.
    /// - `OverlapConflict` against any other event on the draft's date.
    pub fn update(
        &self,
        collection: &EventCollection,
        id: &EventId,
        draft: EventDraft,
    ) -> ScheduleResult<EventCollection> {
        let result = self.try_update(collection, id, draft);
        log_outcome("event_update", &result);
        result
    }

    fn try_update(
        &self,
        collection: &EventCollection,
        id: &EventId,
        draft: EventDraft,
    ) -> ScheduleResult<EventCollection> {
        let index = collection
            .position(id)
            .ok_or_else(|| Rejection::NotFound(id.clone()))?;
        let event = draft.into_event(id.clone(), &self.config.default_color)?;

        if let Some(existing) = find_conflict(collection, &event, Some(id)) {
            return Err(Rejection::OverlapConflict {
                date: event.date,
                conflicting_id: existing.id.clone(),
            });
        }

        Ok(collection.replaced(index, event))
    }

    /// Removes the event `id`.
    ///
    /// Removing an id twice returns `NotFound` on the second call.
    pub fn remove(
        &self,
        collection: &EventCollection,
        id: &EventId,
    ) -> ScheduleResult<EventCollection> {
        let result = collection
            .position(id)
            .map(|index| collection.removed(index))
            .ok_or_else(|| Rejection::NotFound(id.clone()));
        log_outcome("event_remove", &result);
        result
    }

    /// Moves the event `id` by `day_delta` calendar days.
    ///
    /// An unknown id returns the collection unchanged. In strict mode a move
    /// onto an occupied slot is rejected with `OverlapConflict`.
    ///
    /// # Errors
    /// - `Validation(DateOutOfRange)` when the shifted date is unrepresentable.
    /// - `OverlapConflict` in strict mode only.
    pub fn reschedule(
        &self,
        collection: &EventCollection,
        id: &EventId,
        day_delta: i64,
    ) -> ScheduleResult<EventCollection> {
        let result = self.try_reschedule(collection, id, day_delta);
        log_outcome("event_reschedule", &result);
        result
    }

    fn try_reschedule(
        &self,
        collection: &EventCollection,
        id: &EventId,
        day_delta: i64,
    ) -> ScheduleResult<EventCollection> {
        let Some(index) = collection.position(id) else {
            debug!("event=event_reschedule module=scheduler status=skipped reason=unknown_id");
            return Ok(collection.clone());
        };
        if day_delta == 0 {
            return Ok(collection.clone());
        }

        let current = &collection.as_slice()[index];
        let moved = current.on_date(shift_days(current.date, day_delta)?);

        if self.config.reschedule_mode == RescheduleMode::Strict {
            if let Some(existing) = find_conflict(collection, &moved, Some(id)) {
                return Err(Rejection::OverlapConflict {
                    date: moved.date,
                    conflicting_id: existing.id.clone(),
                });
            }
        }

        Ok(collection.replaced(index, moved))
    }

    /// Drag-and-drop helper: moves `id` by the calendar distance between the
    /// day it was dragged from and the day it was dropped on.
    pub fn move_between_days(
        &self,
        collection: &EventCollection,
        id: &EventId,
        source_day: NaiveDate,
        destination_day: NaiveDate,
    ) -> ScheduleResult<EventCollection> {
        self.reschedule(collection, id, day_delta(source_day, destination_day))
    }

    fn allocate_id(&mut self, collection: &EventCollection) -> ScheduleResult<EventId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !collection.contains_id(&id) {
                return Ok(id);
            }
        }
        Err(Rejection::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

fn log_outcome(event_name: &str, result: &ScheduleResult<EventCollection>) {
    match result {
        Ok(collection) => debug!(
            "event={} module=scheduler status=ok events={}",
            event_name,
            collection.len()
        ),
        Err(rejection) => info!(
            "event={} module=scheduler status=rejected error_code={}",
            event_name,
            rejection.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{EventScheduler, Rejection};
    use crate::model::collection::EventCollection;
    use crate::model::event::{EventDraft, EventId};
    use crate::service::id_source::{IdGenerator, SequentialIdGenerator};
    use chrono::NaiveDate;

    struct ConstantIds;

    impl IdGenerator for ConstantIds {
        fn next_id(&mut self) -> EventId {
            EventId::new("fixed").unwrap()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn create_gives_up_when_generator_repeats_ids() {
        let mut scheduler = EventScheduler::new(ConstantIds);
        let first = scheduler
            .create(
                &EventCollection::new(),
                EventDraft::timed("A", day(), "09:00", "10:00"),
            )
            .unwrap();

        let err = scheduler
            .create(&first, EventDraft::timed("B", day(), "11:00", "12:00"))
            .unwrap_err();
        assert!(matches!(err, Rejection::IdExhausted { .. }));
        assert_eq!(err.code(), "id_exhausted");
    }

    #[test]
    fn validation_runs_before_overlap_check() {
        let mut scheduler = EventScheduler::new(SequentialIdGenerator::new("e"));
        let collection = scheduler
            .create(
                &EventCollection::new(),
                EventDraft::timed("A", day(), "09:00", "10:00"),
            )
            .unwrap();

        let err = scheduler
            .create(&collection, EventDraft::timed("  ", day(), "09:00", "10:00"))
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn invalid_draft_is_rejected_before_an_id_is_drawn() {
        let mut scheduler = EventScheduler::new(ConstantIds);
        let first = scheduler
            .create(
                &EventCollection::new(),
                EventDraft::timed("A", day(), "09:00", "10:00"),
            )
            .unwrap();

        let err = scheduler
            .create(&first, EventDraft::timed("B", day(), "11:00", "10:00"))
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn invalid_draft_does_not_consume_an_id() {
        let mut scheduler = EventScheduler::new(SequentialIdGenerator::new("e"));
        let collection = scheduler
            .create(
                &EventCollection::new(),
                EventDraft::timed("", day(), "09:00", "10:00"),
            )
            .unwrap_or_default();
        let collection = scheduler
            .create(&collection, EventDraft::timed("A", day(), "09:00", "10:00"))
            .unwrap();
        assert_eq!(collection.as_slice()[0].id.as_str(), "e1");
    }

    #[test]
    fn reschedule_by_zero_days_is_a_no_op() {
        let mut scheduler = EventScheduler::new(SequentialIdGenerator::new("e"));
        let collection = scheduler
            .create(
                &EventCollection::new(),
                EventDraft::timed("A", day(), "09:00", "10:00"),
            )
            .unwrap();
        let id = EventId::new("e1").unwrap();

        let moved = scheduler.reschedule(&collection, &id, 0).unwrap();
        assert_eq!(moved, collection);
    }
}
