//! FFI use-case API for Flutter-facing calendar calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level calendar functions to Dart via FRB.
//! - Own the load -> apply -> save cycle around the pure scheduling core.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized by one process-wide lock, so a load and its save
//!   never interleave with another call.
//! - Dates cross the boundary as `YYYY-MM-DD`, months as `YYYY-MM`.
//! - The snapshot is saved only after a successful mutation.

use daygrid_core::db::open_db;
use daygrid_core::{
    core_version as core_version_inner, export_file_name, export_projection,
    init_logging as init_logging_inner, month_grid, parse_calendar_date, query_day,
    CalendarMonth, DayQuery, Event, EventCollection, EventDraft, EventId, EventScheduler,
    ExportFormat, Rejection, RescheduleMode, SchedulerConfig, SnapshotRepository,
    SqliteSnapshotRepository, UuidIdGenerator,
};
use log::{error, warn};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const CALENDAR_DB_FILE_NAME: &str = "daygrid_events.sqlite3";
const DB_PATH_ENV: &str = "DAYGRID_DB_PATH";
const STRICT_MOVES_ENV: &str = "DAYGRID_STRICT_MOVES";
const ERROR_CODE_INVALID_INPUT: &str = "invalid_input";
const ERROR_CODE_STORAGE: &str = "storage_error";

static CALENDAR_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CALENDAR_LOCK: Mutex<()> = Mutex::new(());

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Event projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventItem {
    pub id: String,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub is_all_day: bool,
    pub description: Option<String>,
    pub color: String,
}

/// Form input for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventInput {
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`; ignored for all-day events.
    pub start_time: String,
    /// `HH:MM`; ignored for all-day events.
    pub end_time: String,
    pub is_all_day: bool,
    pub description: Option<String>,
    /// `None` or blank applies the default color.
    pub color: Option<String>,
}

/// Result envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarActionResponse {
    pub ok: bool,
    /// `validation_error|overlap_conflict|not_found|id_exhausted|invalid_input|storage_error`.
    pub error_code: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Id of the created or touched event on success.
    pub event_id: Option<String>,
    /// Existing event blocking the slot on `overlap_conflict`.
    pub conflicting_event_id: Option<String>,
}

impl CalendarActionResponse {
    fn success(message: impl Into<String>, event_id: Option<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            message: message.into(),
            event_id,
            conflicting_event_id: None,
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            message: message.into(),
            event_id: None,
            conflicting_event_id: None,
        }
    }

    fn rejected(rejection: &Rejection) -> Self {
        let mut response = Self::failure(rejection.code(), rejection.to_string());
        if let Rejection::OverlapConflict { conflicting_id, .. } = rejection {
            response.conflicting_event_id = Some(conflicting_id.to_string());
        }
        response
    }
}

/// Day view envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayResponse {
    pub ok: bool,
    pub message: String,
    /// Echoed `YYYY-MM-DD`; empty when the input date was invalid.
    pub date: String,
    pub events: Vec<CalendarEventItem>,
}

/// One cell of the month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayCell {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub events: Vec<CalendarEventItem>,
}

/// Month view envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    pub message: String,
    /// Display title, e.g. `June 2024`.
    pub title: String,
    pub days: Vec<CalendarDayCell>,
}

/// Export envelope; `content` is the UTF-8 file body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExportResponse {
    pub ok: bool,
    pub message: String,
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl CalendarExportResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            file_name: String::new(),
            mime_type: String::new(),
            content: String::new(),
        }
    }
}

/// Creates an event from form input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the new event id on success; overlap rejections carry the
///   conflicting event id.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_create_event(input: CalendarEventInput) -> CalendarActionResponse {
    CalendarStore::from_env().create_event(input)
}

/// Replaces event `event_id` with form input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_update_event(event_id: String, input: CalendarEventInput) -> CalendarActionResponse {
    CalendarStore::from_env().update_event(&event_id, input)
}

/// Deletes event `event_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a repeated delete returns `not_found`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_delete_event(event_id: String) -> CalendarActionResponse {
    CalendarStore::from_env().delete_event(&event_id)
}

/// Moves event `event_id` from `source_date` to `destination_date`
/// (drag-and-drop between day cells).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Conflicts are only checked when `DAYGRID_STRICT_MOVES` is enabled.
/// - An unknown id returns `not_found` and leaves the snapshot untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_move_event(
    event_id: String,
    source_date: String,
    destination_date: String,
) -> CalendarActionResponse {
    CalendarStore::from_env().move_event(&event_id, &source_date, &destination_date)
}

/// Lists events dated `date`, optionally filtered by `search` text.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_day_events(date: String, search: Option<String>) -> CalendarDayResponse {
    CalendarStore::from_env().day_events(&date, search)
}

/// Projects the stored events onto every day of `month` (`YYYY-MM`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month_grid(month: String) -> CalendarMonthResponse {
    CalendarStore::from_env().month_grid(&month)
}

/// Renders the events of `month` (`YYYY-MM`) as `json` or `csv`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_export_month(month: String, format: String) -> CalendarExportResponse {
    CalendarStore::from_env().export_month(&month, &format)
}

/// Database location plus scheduler settings for one call.
struct CalendarStore {
    db_path: PathBuf,
    config: SchedulerConfig,
}

impl CalendarStore {
    fn new(db_path: PathBuf, config: SchedulerConfig) -> Self {
        Self { db_path, config }
    }

    fn from_env() -> Self {
        let strict_flag = std::env::var(STRICT_MOVES_ENV).unwrap_or_default();
        let config = SchedulerConfig {
            reschedule_mode: RescheduleMode::from_strict_flag(&strict_flag),
            ..SchedulerConfig::default()
        };
        Self::new(resolve_calendar_db_path(), config)
    }

    fn scheduler(&self) -> EventScheduler<UuidIdGenerator> {
        EventScheduler::with_config(UuidIdGenerator, self.config.clone())
    }

    fn create_event(&self, input: CalendarEventInput) -> CalendarActionResponse {
        let draft = match to_draft(input) {
            Ok(draft) => draft,
            Err(response) => return response,
        };
        let mut scheduler = self.scheduler();
        self.mutate("calendar_create_event", |events| {
            let next = scheduler.create(events, draft)?;
            let created_id = next.as_slice().last().map(|event| event.id.to_string());
            Ok((next, created_id))
        })
        .map_or_else(
            |response| response,
            |created_id| CalendarActionResponse::success("Event created.", created_id),
        )
    }

    fn update_event(&self, event_id: &str, input: CalendarEventInput) -> CalendarActionResponse {
        let id = match to_event_id(event_id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let draft = match to_draft(input) {
            Ok(draft) => draft,
            Err(response) => return response,
        };
        let scheduler = self.scheduler();
        self.mutate("calendar_update_event", |events| {
            Ok((scheduler.update(events, &id, draft)?, ()))
        })
        .map_or_else(
            |response| response,
            |()| CalendarActionResponse::success("Event updated.", Some(id.to_string())),
        )
    }

    fn delete_event(&self, event_id: &str) -> CalendarActionResponse {
        let id = match to_event_id(event_id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let scheduler = self.scheduler();
        self.mutate("calendar_delete_event", |events| {
            Ok((scheduler.remove(events, &id)?, ()))
        })
        .map_or_else(
            |response| response,
            |()| CalendarActionResponse::success("Event deleted.", Some(id.to_string())),
        )
    }

    fn move_event(
        &self,
        event_id: &str,
        source_date: &str,
        destination_date: &str,
    ) -> CalendarActionResponse {
        let id = match to_event_id(event_id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let (Some(source), Some(destination)) = (
            parse_calendar_date(source_date),
            parse_calendar_date(destination_date),
        ) else {
            return CalendarActionResponse::failure(
                ERROR_CODE_INVALID_INPUT,
                "move dates must be YYYY-MM-DD",
            );
        };
        let scheduler = self.scheduler();
        self.mutate("calendar_move_event", |events| {
            // Unknown ids are a silent no-op in the core.
            if !events.contains_id(&id) {
                return Err(Rejection::NotFound(id.clone()));
            }
            Ok((
                scheduler.move_between_days(events, &id, source, destination)?,
                (),
            ))
        })
        .map_or_else(
            |response| response,
            |()| CalendarActionResponse::success("Event moved.", Some(id.to_string())),
        )
    }

    fn day_events(&self, date: &str, search: Option<String>) -> CalendarDayResponse {
        let Some(day) = parse_calendar_date(date) else {
            return CalendarDayResponse {
                ok: false,
                message: format!("invalid date `{}`; expected YYYY-MM-DD", date.trim()),
                date: String::new(),
                events: Vec::new(),
            };
        };
        let query = match search {
            Some(text) => DayQuery::new(day).with_text(text),
            None => DayQuery::new(day),
        };

        match self.read(|events| {
            query_day(events, &query)
                .into_iter()
                .map(to_item)
                .collect::<Vec<_>>()
        }) {
            Ok(items) => CalendarDayResponse {
                ok: true,
                message: format!("Found {} event(s).", items.len()),
                date: format_date(day),
                events: items,
            },
            Err(message) => CalendarDayResponse {
                ok: false,
                message,
                date: format_date(day),
                events: Vec::new(),
            },
        }
    }

    fn month_grid(&self, month: &str) -> CalendarMonthResponse {
        let month = match CalendarMonth::parse(month) {
            Ok(month) => month,
            Err(err) => {
                return CalendarMonthResponse {
                    ok: false,
                    message: err.to_string(),
                    title: String::new(),
                    days: Vec::new(),
                }
            }
        };

        match self.read(|events| {
            month_grid(events, month)
                .into_iter()
                .map(|slot| CalendarDayCell {
                    date: format_date(slot.date),
                    events: slot.events.into_iter().map(to_item).collect(),
                })
                .collect::<Vec<_>>()
        }) {
            Ok(days) => CalendarMonthResponse {
                ok: true,
                message: String::new(),
                title: month.title(),
                days,
            },
            Err(message) => CalendarMonthResponse {
                ok: false,
                message,
                title: month.title(),
                days: Vec::new(),
            },
        }
    }

    fn export_month(&self, month: &str, format: &str) -> CalendarExportResponse {
        let month = match CalendarMonth::parse(month) {
            Ok(month) => month,
            Err(err) => return CalendarExportResponse::failure(err.to_string()),
        };
        let format = match format.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(err) => return CalendarExportResponse::failure(err.to_string()),
        };

        let rendered = match self.read(|events| export_projection(events, month, format)) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(err)) => return CalendarExportResponse::failure(err.to_string()),
            Err(message) => return CalendarExportResponse::failure(message),
        };
        match String::from_utf8(rendered) {
            Ok(content) => CalendarExportResponse {
                ok: true,
                message: "Export ready.".to_string(),
                file_name: export_file_name(month, format),
                mime_type: format.mime_type().to_string(),
                content,
            },
            Err(err) => CalendarExportResponse::failure(format!("export is not UTF-8: {err}")),
        }
    }

    /// Loads the snapshot and hands it to `f` while holding the call lock.
    fn read<T>(&self, f: impl FnOnce(&EventCollection) -> T) -> Result<T, String> {
        let _guard = lock_calendar();
        let conn = open_db(&self.db_path).map_err(|err| format!("calendar DB open failed: {err}"))?;
        let repo = SqliteSnapshotRepository::new(&conn);
        let events = repo
            .load_events()
            .map_err(|err| format!("calendar load failed: {err}"))?;
        Ok(f(&events))
    }

    /// Runs `apply` against the stored snapshot and saves the new collection
    /// only when `apply` succeeds.
    fn mutate<T>(
        &self,
        operation: &str,
        apply: impl FnOnce(&EventCollection) -> Result<(EventCollection, T), Rejection>,
    ) -> Result<T, CalendarActionResponse> {
        let _guard = lock_calendar();
        let conn = open_db(&self.db_path).map_err(|err| {
            storage_failure(operation, format!("calendar DB open failed: {err}"))
        })?;
        let repo = SqliteSnapshotRepository::new(&conn);
        let events = repo
            .load_events()
            .map_err(|err| storage_failure(operation, format!("calendar load failed: {err}")))?;

        let (next, value) =
            apply(&events).map_err(|rejection| CalendarActionResponse::rejected(&rejection))?;
        repo.save_events(&next)
            .map_err(|err| storage_failure(operation, format!("calendar save failed: {err}")))?;
        Ok(value)
    }
}

fn storage_failure(operation: &str, message: String) -> CalendarActionResponse {
    error!(
        "event={} module=ffi status=error error_code={}",
        operation, ERROR_CODE_STORAGE
    );
    CalendarActionResponse::failure(ERROR_CODE_STORAGE, message)
}

fn lock_calendar() -> std::sync::MutexGuard<'static, ()> {
    CALENDAR_LOCK.lock().unwrap_or_else(|poisoned| {
        warn!("event=calendar_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    })
}

fn resolve_calendar_db_path() -> PathBuf {
    CALENDAR_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(CALENDAR_DB_FILE_NAME)
        })
        .clone()
}

fn to_event_id(raw: &str) -> Result<EventId, CalendarActionResponse> {
    EventId::new(raw.trim())
        .map_err(|err| CalendarActionResponse::failure(ERROR_CODE_INVALID_INPUT, err.to_string()))
}

fn to_draft(input: CalendarEventInput) -> Result<EventDraft, CalendarActionResponse> {
    let date = parse_calendar_date(&input.date).ok_or_else(|| {
        CalendarActionResponse::failure(
            ERROR_CODE_INVALID_INPUT,
            format!("invalid date `{}`; expected YYYY-MM-DD", input.date.trim()),
        )
    })?;
    Ok(EventDraft {
        name: input.name,
        date,
        start_time: input.start_time,
        end_time: input.end_time,
        is_all_day: input.is_all_day,
        description: input.description,
        color: input.color.unwrap_or_default(),
    })
}

fn to_item(event: &Event) -> CalendarEventItem {
    CalendarEventItem {
        id: event.id.to_string(),
        name: event.name.clone(),
        date: format_date(event.date),
        start_time: event.start_time.to_string(),
        end_time: event.end_time.to_string(),
        is_all_day: event.is_all_day,
        description: event.description.clone(),
        color: event.color.clone(),
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
