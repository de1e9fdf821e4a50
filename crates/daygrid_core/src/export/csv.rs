//! CSV rendering.
//!
//! Every field is double-quote-wrapped; embedded quotes are doubled so names
//! and descriptions containing quotes, commas or newlines stay one field.

use crate::model::event::Event;

/// Header row written before any event rows.
pub const CSV_HEADER: &str = "Name,Start Time,End Time,Description,Date,Color,All Day";

pub(super) fn render(events: &[&Event]) -> String {
    let rows = events
        .iter()
        .map(|event| render_row(event))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{CSV_HEADER}\n{rows}")
}

fn render_row(event: &Event) -> String {
    let start = event.start_time.to_string();
    let end = event.end_time.to_string();
    let date = event.date.format("%Y-%m-%d").to_string();
    let all_day = if event.is_all_day { "Yes" } else { "No" };
    [
        event.name.as_str(),
        start.as_str(),
        end.as_str(),
        event.description.as_deref().unwrap_or(""),
        date.as_str(),
        event.color.as_str(),
        all_day,
    ]
    .iter()
    .map(|field| quote(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
