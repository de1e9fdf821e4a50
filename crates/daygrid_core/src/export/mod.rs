//! Month-scoped export projections.
//!
//! # Responsibility
//! - Select the events of one month and render them as JSON or CSV bytes.
//! - Name export files consistently across hosts.
//!
//! # Invariants
//! - Exports are output-only; nothing here is read back.
//! - Event order follows collection order.

mod csv;
mod json;

use crate::calendar::CalendarMonth;
use crate::model::collection::EventCollection;
use crate::model::event::Event;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use self::csv::CSV_HEADER;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    UnsupportedFormat(String),
    Serialization(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(value) => {
                write!(f, "unsupported export format `{value}`; expected json|csv")
            }
            Self::Serialization(err) => write!(f, "export serialization failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedFormat(_) => None,
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Events of `month`, in collection order.
pub fn events_in_month(collection: &EventCollection, month: CalendarMonth) -> Vec<&Event> {
    collection
        .iter()
        .filter(|event| month.contains(event.date))
        .collect()
}

/// Renders the events of `month` in `format`.
pub fn export_projection(
    collection: &EventCollection,
    month: CalendarMonth,
    format: ExportFormat,
) -> Result<Vec<u8>, ExportError> {
    let events = events_in_month(collection, month);
    log::debug!(
        "event=export module=export status=ok format={} month={} events={}",
        format.extension(),
        month,
        events.len()
    );
    match format {
        ExportFormat::Json => json::render(&events),
        ExportFormat::Csv => Ok(csv::render(&events).into_bytes()),
    }
}

/// Download file name, e.g. `events-June-2024.csv`.
pub fn export_file_name(month: CalendarMonth, format: ExportFormat) -> String {
    format!(
        "events-{}-{}.{}",
        month.name(),
        month.year(),
        format.extension()
    )
}
