use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use daygrid_core::{
    parse_calendar_date, Event, EventDraft, EventId, EventValidationError, WallTime,
    DEFAULT_EVENT_COLOR,
};

fn june_3() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

#[test]
fn draft_normalizes_into_event() {
    let event = EventDraft::timed("  Standup ", june_3(), "09:00", "09:30")
        .with_description("")
        .into_event(EventId::new("e1").unwrap(), DEFAULT_EVENT_COLOR)
        .unwrap();

    assert_eq!(event.id.as_str(), "e1");
    assert_eq!(event.name, "Standup");
    assert_eq!(event.start_time.to_string(), "09:00");
    assert_eq!(event.end_time.to_string(), "09:30");
    assert_eq!(event.description, None);
    assert_eq!(event.color, DEFAULT_EVENT_COLOR);
    assert!(!event.is_all_day);
}

#[test]
fn draft_keeps_explicit_color() {
    let event = EventDraft::all_day("Offsite", june_3())
        .with_color("#ff0000")
        .into_event(EventId::new("e1").unwrap(), DEFAULT_EVENT_COLOR)
        .unwrap();
    assert_eq!(event.color, "#ff0000");
}

#[test]
fn event_serialization_uses_expected_wire_fields() {
    let event = EventDraft::timed("Standup", june_3(), "09:00", "09:30")
        .with_description("daily sync")
        .with_color("#123456")
        .into_event(EventId::new("1717400000000").unwrap(), DEFAULT_EVENT_COLOR)
        .unwrap();

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], "1717400000000");
    assert_eq!(json["name"], "Standup");
    assert_eq!(json["date"], "2024-06-03");
    assert_eq!(json["startTime"], "09:00");
    assert_eq!(json["endTime"], "09:30");
    assert_eq!(json["isAllDay"], false);
    assert_eq!(json["description"], "daily sync");
    assert_eq!(json["color"], "#123456");

    let decoded: Event = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}

/// Local midnight of `date` as written by older hosts: a UTC `Z` timestamp.
fn stored_local_midnight(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(Local)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[test]
fn deserialize_accepts_timestamp_dates_and_fills_defaults() {
    let value = serde_json::json!({
        "id": "1717400000000",
        "name": "Legacy",
        "date": stored_local_midnight(june_3()),
        "startTime": "08:00",
        "endTime": "09:00"
    });

    let event: Event = serde_json::from_value(value).unwrap();
    assert_eq!(event.date, june_3());
    assert!(!event.is_all_day);
    assert_eq!(event.description, None);
    assert_eq!(event.color, DEFAULT_EVENT_COLOR);
}

#[test]
fn deserialize_normalizes_all_day_times() {
    let value = serde_json::json!({
        "id": "a",
        "name": "Holiday",
        "date": "2024-06-03",
        "startTime": "10:00",
        "endTime": "11:00",
        "isAllDay": true
    });

    let event: Event = serde_json::from_value(value).unwrap();
    assert_eq!(event.start_time, WallTime::START_OF_DAY);
    assert_eq!(event.end_time, WallTime::END_OF_DAY);
}

#[test]
fn deserialize_rejects_reversed_time_range() {
    let value = serde_json::json!({
        "id": "a",
        "name": "Backwards",
        "date": "2024-06-03",
        "startTime": "11:00",
        "endTime": "10:00"
    });

    let err = serde_json::from_value::<Event>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("end_time (10:00) must be after start_time (11:00)"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_blank_id() {
    let value = serde_json::json!({
        "id": " ",
        "name": "No id",
        "date": "2024-06-03",
        "startTime": "10:00",
        "endTime": "11:00"
    });
    assert!(serde_json::from_value::<Event>(value).is_err());
}

#[test]
fn draft_rejects_blank_name_and_bad_times() {
    let id = || EventId::new("e").unwrap();

    assert_eq!(
        EventDraft::timed("   ", june_3(), "09:00", "10:00")
            .into_event(id(), DEFAULT_EVENT_COLOR)
            .unwrap_err(),
        EventValidationError::EmptyName
    );
    assert_eq!(
        EventDraft::timed("Bad", june_3(), "9am", "10:00")
            .into_event(id(), DEFAULT_EVENT_COLOR)
            .unwrap_err(),
        EventValidationError::InvalidTime("9am".to_string())
    );
    assert!(matches!(
        EventDraft::timed("Bad", june_3(), "10:00", "09:00")
            .into_event(id(), DEFAULT_EVENT_COLOR)
            .unwrap_err(),
        EventValidationError::InvalidTimeRange { .. }
    ));
}

#[test]
fn draft_round_trips_from_event() {
    let event = EventDraft::timed("Review", june_3(), "14:00", "15:00")
        .with_description("notes")
        .into_event(EventId::new("e").unwrap(), DEFAULT_EVENT_COLOR)
        .unwrap();

    let draft = EventDraft::from(&event);
    let rebuilt = draft
        .into_event(event.id.clone(), DEFAULT_EVENT_COLOR)
        .unwrap();
    assert_eq!(rebuilt, event);
}

#[test]
fn timestamp_dates_east_of_utc_keep_their_local_day() {
    let east = parse_calendar_date("2024-06-03T00:00:00+02:00").unwrap();
    let same_instant_utc = parse_calendar_date("2024-06-02T22:00:00.000Z").unwrap();
    assert_eq!(east, same_instant_utc);

    let expected = "2024-06-02T22:00:00Z"
        .parse::<chrono::DateTime<Utc>>()
        .unwrap()
        .with_timezone(&Local)
        .date_naive();
    assert_eq!(east, expected);
}

#[test]
fn validate_rejects_all_day_event_with_partial_times() {
    let mut event = EventDraft::all_day("Holiday", june_3())
        .into_event(EventId::new("h").unwrap(), DEFAULT_EVENT_COLOR)
        .unwrap();
    assert!(event.validate().is_ok());

    event.start_time = WallTime::new(9, 0).unwrap();
    event.end_time = WallTime::new(10, 0).unwrap();
    assert_eq!(
        event.validate().unwrap_err(),
        EventValidationError::AllDayNotNormalized {
            start: WallTime::new(9, 0).unwrap(),
            end: WallTime::new(10, 0).unwrap(),
        }
    );
}
