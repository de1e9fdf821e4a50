//! Snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the whole event collection as one JSON array per save.
//! - Hydrate a collection from a stored snapshot at startup.
//!
//! # Invariants
//! - Saves replace the previous snapshot wholesale.
//! - Hydration never aborts: malformed entries and duplicate ids are skipped
//!   with a warning, and an unreadable payload yields an empty collection.

use crate::db::DbError;
use crate::model::collection::EventCollection;
use crate::model::event::Event;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot key holding the event collection.
pub const EVENTS_SNAPSHOT_KEY: &str = "events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "snapshot serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Load/persist contract the host uses around scheduler calls.
pub trait SnapshotRepository {
    /// Returns the stored collection, or an empty one when nothing is stored.
    fn load_events(&self) -> RepoResult<EventCollection>;
    /// Replaces the stored collection with `events`.
    fn save_events(&self, events: &EventCollection) -> RepoResult<()>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the raw stored payload for `EVENTS_SNAPSHOT_KEY`.
    pub fn raw_payload(&self) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1;",
                [EVENTS_SNAPSHOT_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_events(&self) -> RepoResult<EventCollection> {
        match self.raw_payload()? {
            Some(payload) => Ok(hydrate_events(&payload).events),
            None => Ok(EventCollection::new()),
        }
    }

    fn save_events(&self, events: &EventCollection) -> RepoResult<()> {
        let payload = serde_json::to_string(events)?;
        self.conn.execute(
            "INSERT INTO snapshots (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![EVENTS_SNAPSHOT_KEY, payload],
        )?;
        debug!(
            "event=snapshot_save module=repo status=ok events={}",
            events.len()
        );
        Ok(())
    }
}

/// Result of hydrating a snapshot payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    pub events: EventCollection,
    /// Entries dropped because they were malformed or reused an id.
    pub skipped: usize,
}

/// Decodes a JSON array snapshot, keeping every well-formed entry.
pub fn hydrate_events(payload: &str) -> Hydration {
    let values = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(values)) => values,
        Ok(_) => {
            warn!("event=snapshot_hydrate module=repo status=degraded reason=not_an_array");
            return Hydration {
                events: EventCollection::new(),
                skipped: 0,
            };
        }
        Err(err) => {
            warn!(
                "event=snapshot_hydrate module=repo status=degraded reason=invalid_json error={}",
                err
            );
            return Hydration {
                events: EventCollection::new(),
                skipped: 0,
            };
        }
    };

    let mut seen = HashSet::with_capacity(values.len());
    let mut events = Vec::with_capacity(values.len());
    let mut skipped = 0;

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Event>(value) {
            Ok(event) if seen.insert(event.id.clone()) => events.push(event),
            Ok(_) => {
                skipped += 1;
                warn!(
                    "event=snapshot_hydrate module=repo status=skipped index={} reason=duplicate_id",
                    index
                );
            }
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=snapshot_hydrate module=repo status=skipped index={} reason=malformed error={}",
                    index, err
                );
            }
        }
    }

    debug!(
        "event=snapshot_hydrate module=repo status=ok loaded={} skipped={}",
        events.len(),
        skipped
    );
    Hydration {
        events: EventCollection::from_unique_events(events),
        skipped,
    }
}
