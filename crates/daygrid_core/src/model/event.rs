//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical calendar event record and its draft input shape.
//! - Normalize all-day events and validate names and wall-clock times.
//!
//! # Invariants
//! - `id` is non-empty and never changes after creation.
//! - `name` is non-empty after trimming.
//! - Timed events satisfy `start_time < end_time`.
//! - All-day events always carry `00:00`..`23:59`.
//!
//! # See also
//! - `crate::model::overlap` for the same-day conflict rule

use chrono::{DateTime, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Color token applied when a draft leaves `color` blank.
pub const DEFAULT_EVENT_COLOR: &str = "#007bff";

static WALL_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid wall time regex"));

/// Validation failures for event input and persisted event records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyId,
    EmptyName,
    /// Time text is not a 24-hour `HH:MM` value.
    InvalidTime(String),
    /// Timed event whose start is not strictly before its end.
    InvalidTimeRange {
        start: WallTime,
        end: WallTime,
    },
    /// All-day event whose times are not `00:00`..`23:59`.
    AllDayNotNormalized {
        start: WallTime,
        end: WallTime,
    },
    /// Shifting `date` by `delta` days leaves the representable calendar.
    DateOutOfRange {
        date: NaiveDate,
        delta: i64,
    },
    DuplicateId(EventId),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "event id cannot be empty"),
            Self::EmptyName => write!(f, "event name cannot be empty"),
            Self::InvalidTime(value) => {
                write!(f, "invalid time `{value}`; expected 24-hour HH:MM")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "end_time ({end}) must be after start_time ({start})")
            }
            Self::AllDayNotNormalized { start, end } => {
                write!(f, "all-day event must span 00:00-23:59, got {start}-{end}")
            }
            Self::DateOutOfRange { date, delta } => {
                write!(f, "moving {date} by {delta} day(s) leaves the supported calendar range")
            }
            Self::DuplicateId(id) => write!(f, "duplicate event id: {id}"),
        }
    }
}

impl Error for EventValidationError {}

/// Opaque, stable event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(pub(crate) String);

impl EventId {
    /// Wraps an identifier string, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Result<Self, EventValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EventId {
    type Error = EventValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for String {
    fn from(value: EventId) -> Self {
        value.0
    }
}

/// Wall-clock time of day with minute precision.
///
/// Ordering matches chronological order and the lexicographic order of the
/// fixed-width `HH:MM` text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    minutes: u16,
}

impl WallTime {
    /// `00:00`, start of every all-day event.
    pub const START_OF_DAY: WallTime = WallTime { minutes: 0 };
    /// `23:59`, end of every all-day event.
    pub const END_OF_DAY: WallTime = WallTime {
        minutes: 23 * 60 + 59,
    };

    /// Builds a time from hour and minute, or `None` when out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
        })
    }

    /// Parses strict `HH:MM` text (two-digit hour and minute).
    pub fn parse(value: &str) -> Result<Self, EventValidationError> {
        let trimmed = value.trim();
        let captures = WALL_TIME_RE
            .captures(trimmed)
            .ok_or_else(|| EventValidationError::InvalidTime(value.to_string()))?;
        let hour = captures[1]
            .parse::<u8>()
            .map_err(|_| EventValidationError::InvalidTime(value.to_string()))?;
        let minute = captures[2]
            .parse::<u8>()
            .map_err(|_| EventValidationError::InvalidTime(value.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| EventValidationError::InvalidTime(value.to_string()))
    }

    pub fn hour(self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.minutes % 60) as u8
    }
}

impl Display for WallTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for WallTime {
    type Error = EventValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

/// Caller input for creating or replacing an event.
///
/// Times stay raw text so malformed input surfaces as a validation rejection
/// instead of a parse failure at the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_all_day: bool,
    pub description: Option<String>,
    /// Blank means "use the configured default color".
    pub color: String,
}

impl EventDraft {
    /// Creates a timed draft with no description and the default color.
    pub fn timed(
        name: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_all_day: false,
            description: None,
            color: String::new(),
        }
    }

    /// Creates an all-day draft; times are filled in during normalization.
    pub fn all_day(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            start_time: String::new(),
            end_time: String::new(),
            is_all_day: true,
            description: None,
            color: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Validates and normalizes this draft into an event carrying `id`.
    ///
    /// # Errors
    /// - `EmptyName` for blank names.
    /// - `InvalidTime` / `InvalidTimeRange` for timed drafts with bad times.
    pub fn into_event(
        self,
        id: EventId,
        default_color: &str,
    ) -> Result<Event, EventValidationError> {
        Ok(self.normalize(default_color)?.with_id(id))
    }

    /// Validation and normalization without an id, so callers can reject
    /// bad input before drawing one.
    pub(crate) fn normalize(
        self,
        default_color: &str,
    ) -> Result<NormalizedDraft, EventValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(EventValidationError::EmptyName);
        }

        let (start_time, end_time) = if self.is_all_day {
            (WallTime::START_OF_DAY, WallTime::END_OF_DAY)
        } else {
            let start = WallTime::parse(&self.start_time)?;
            let end = WallTime::parse(&self.end_time)?;
            if start >= end {
                return Err(EventValidationError::InvalidTimeRange { start, end });
            }
            (start, end)
        };

        let color = match self.color.trim() {
            "" => default_color.to_string(),
            value => value.to_string(),
        };

        Ok(NormalizedDraft {
            name,
            date: self.date,
            start_time,
            end_time,
            is_all_day: self.is_all_day,
            description: self.description.filter(|value| !value.is_empty()),
            color,
        })
    }
}

/// A draft that passed validation and only lacks an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NormalizedDraft {
    name: String,
    date: NaiveDate,
    start_time: WallTime,
    end_time: WallTime,
    is_all_day: bool,
    description: Option<String>,
    color: String,
}

impl NormalizedDraft {
    pub(crate) fn with_id(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_all_day: self.is_all_day,
            description: self.description,
            color: self.color,
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            date: event.date,
            start_time: event.start_time.to_string(),
            end_time: event.end_time.to_string(),
            is_all_day: event.is_all_day,
            description: event.description.clone(),
            color: event.color.clone(),
        }
    }
}

/// Canonical calendar event.
///
/// Serialized with camelCase field names and `date` as `YYYY-MM-DD`.
/// Deserialization validates the record, so a decoded event always upholds
/// the model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEvent")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub is_all_day: bool,
    pub description: Option<String>,
    pub color: String,
}

impl Event {
    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.name.trim().is_empty() {
            return Err(EventValidationError::EmptyName);
        }
        if self.is_all_day {
            if (self.start_time, self.end_time) != (WallTime::START_OF_DAY, WallTime::END_OF_DAY) {
                return Err(EventValidationError::AllDayNotNormalized {
                    start: self.start_time,
                    end: self.end_time,
                });
            }
        } else if self.start_time >= self.end_time {
            return Err(EventValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// Returns the occupied `[start, end)` interval on `date`.
    pub fn interval(&self) -> (WallTime, WallTime) {
        (self.start_time, self.end_time)
    }

    /// Returns a copy moved to `date`, every other field unchanged.
    pub fn on_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}

/// Wire shape accepted when decoding events from snapshots.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: EventId,
    name: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    date: NaiveDate,
    start_time: WallTime,
    end_time: WallTime,
    #[serde(default)]
    is_all_day: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventValidationError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let (start_time, end_time) = if raw.is_all_day {
            (WallTime::START_OF_DAY, WallTime::END_OF_DAY)
        } else {
            (raw.start_time, raw.end_time)
        };
        let event = Event {
            id: raw.id,
            name: raw.name,
            date: raw.date,
            start_time,
            end_time,
            is_all_day: raw.is_all_day,
            description: raw.description.filter(|value| !value.is_empty()),
            color: raw
                .color
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
        };
        event.validate()?;
        Ok(event)
    }
}

/// Parses a calendar date from `YYYY-MM-DD` or from an RFC 3339 timestamp.
///
/// Timestamps are read as the local calendar date of that instant: older
/// snapshots stored local midnight serialized in UTC.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Local).date_naive())
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_calendar_date(&text).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date `{text}`; expected YYYY-MM-DD or RFC 3339"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_calendar_date, EventDraft, EventId, EventValidationError, WallTime};
    use chrono::{Local, NaiveDate, SecondsFormat, Utc};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn wall_time_parses_and_formats_fixed_width() {
        let time = WallTime::parse("09:05").unwrap();
        assert_eq!(time.hour(), 9);
        assert_eq!(time.minute(), 5);
        assert_eq!(time.to_string(), "09:05");
    }

    #[test]
    fn wall_time_rejects_loose_formats() {
        for value in ["9:00", "24:00", "12:60", "1200", "", "ab:cd"] {
            assert_eq!(
                WallTime::parse(value).unwrap_err(),
                EventValidationError::InvalidTime(value.to_string()),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn all_day_draft_ignores_caller_times() {
        let mut draft = EventDraft::all_day("Holiday", day());
        draft.start_time = "13:00".to_string();
        draft.end_time = "garbage".to_string();

        let event = draft
            .into_event(EventId::new("a").unwrap(), "#fff")
            .unwrap();
        assert_eq!(event.start_time, WallTime::START_OF_DAY);
        assert_eq!(event.end_time, WallTime::END_OF_DAY);
        assert_eq!(event.color, "#fff");
    }

    #[test]
    fn timed_draft_requires_start_before_end() {
        let err = EventDraft::timed("Late", day(), "10:00", "10:00")
            .into_event(EventId::new("a").unwrap(), "#fff")
            .unwrap_err();
        assert!(matches!(err, EventValidationError::InvalidTimeRange { .. }));
    }

    #[test]
    fn calendar_date_accepts_plain_and_timestamp_forms() {
        assert_eq!(parse_calendar_date("2024-06-03"), Some(day()));
        assert_eq!(parse_calendar_date(&local_midnight_utc(day())), Some(day()));
        assert_eq!(parse_calendar_date("June 3rd"), None);
    }

    #[test]
    fn timestamp_dates_follow_the_instant_not_the_offset() {
        assert_eq!(
            parse_calendar_date("2024-06-03T00:00:00+02:00"),
            parse_calendar_date("2024-06-02T22:00:00.000Z")
        );
        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_calendar_date(&local_midnight_utc(leap_day)), Some(leap_day));
    }

    /// Local midnight of `date` written as a UTC `Z` timestamp.
    fn local_midnight_utc(date: NaiveDate) -> String {
        date.and_hms_opt(0, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
