//! Core scheduling logic for DayGrid.
//! This crate is the single source of truth for event invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use calendar::{day_delta, month_grid, shift_days, CalendarError, CalendarMonth, DaySlot};
pub use config::{RescheduleMode, SchedulerConfig};
pub use export::{
    events_in_month, export_file_name, export_projection, ExportError, ExportFormat, CSV_HEADER,
};
pub use logging::{
    default_log_level, init_console_logging, init_logging, logging_status, LogSink, LoggingError,
};
pub use model::collection::EventCollection;
pub use model::event::{
    parse_calendar_date, Event, EventDraft, EventId, EventValidationError, WallTime,
    DEFAULT_EVENT_COLOR,
};
pub use model::overlap::{find_conflict, intervals_overlap, overlaps};
pub use repo::snapshot_repo::{
    hydrate_events, Hydration, RepoError, RepoResult, SnapshotRepository,
    SqliteSnapshotRepository, EVENTS_SNAPSHOT_KEY,
};
pub use search::day_query::{query_day, DayQuery};
pub use service::event_service::{EventScheduler, Rejection, ScheduleResult};
pub use service::id_source::{
    ClockIdGenerator, IdGenerator, SequentialIdGenerator, UuidIdGenerator,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
