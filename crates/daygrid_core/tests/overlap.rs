use chrono::NaiveDate;
use daygrid_core::{intervals_overlap, overlaps, Event, EventDraft, EventId, WallTime};
use proptest::prelude::*;

fn event(id: &str, day: u32, start: &str, end: &str) -> Event {
    EventDraft::timed(id, NaiveDate::from_ymd_opt(2024, 6, day).unwrap(), start, end)
        .into_event(EventId::new(id).unwrap(), "#000")
        .unwrap()
}

fn all_day(id: &str, day: u32) -> Event {
    EventDraft::all_day(id, NaiveDate::from_ymd_opt(2024, 6, day).unwrap())
        .into_event(EventId::new(id).unwrap(), "#000")
        .unwrap()
}

#[test]
fn back_to_back_events_do_not_overlap() {
    let a = event("a", 3, "09:00", "10:00");
    let b = event("b", 3, "10:00", "11:00");
    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
}

#[test]
fn partially_shared_hour_overlaps() {
    let a = event("a", 3, "09:00", "10:00");
    let b = event("b", 3, "09:30", "10:30");
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn identical_intervals_overlap() {
    let a = event("a", 3, "09:00", "10:00");
    let b = event("b", 3, "09:00", "10:00");
    assert!(overlaps(&a, &b));
}

#[test]
fn all_day_overlaps_every_event_that_day() {
    let holiday = all_day("h", 3);
    for (start, end) in [("00:00", "00:01"), ("12:00", "13:00"), ("23:58", "23:59")] {
        let other = event("o", 3, start, end);
        assert!(overlaps(&holiday, &other), "{start}-{end}");
        assert!(overlaps(&other, &holiday), "{start}-{end}");
    }
}

#[test]
fn different_days_never_overlap() {
    let a = all_day("a", 3);
    let b = all_day("b", 4);
    assert!(!overlaps(&a, &b));
}

fn wall_time() -> impl Strategy<Value = WallTime> {
    (0u8..24, 0u8..60).prop_map(|(hour, minute)| WallTime::new(hour, minute).unwrap())
}

fn interval() -> impl Strategy<Value = (WallTime, WallTime)> {
    (wall_time(), wall_time())
        .prop_filter("start must precede end", |(start, end)| start < end)
}

proptest! {
    #[test]
    fn overlap_is_symmetric((a_start, a_end) in interval(), (b_start, b_end) in interval()) {
        prop_assert_eq!(
            intervals_overlap(a_start, a_end, b_start, b_end),
            intervals_overlap(b_start, b_end, a_start, a_end)
        );
    }

    #[test]
    fn overlap_matches_half_open_test((a_start, a_end) in interval(), (b_start, b_end) in interval()) {
        prop_assert_eq!(
            intervals_overlap(a_start, a_end, b_start, b_end),
            a_start < b_end && b_start < a_end
        );
    }

    #[test]
    fn degenerate_interval_overlaps_nothing(point in wall_time(), (b_start, b_end) in interval()) {
        prop_assert!(!intervals_overlap(point, point, b_start, b_end));
        prop_assert!(!intervals_overlap(b_start, b_end, point, point));
    }
}
