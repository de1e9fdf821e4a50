//! Same-day overlap predicate.
//!
//! # Invariants
//! - Only events sharing one `date` can overlap.
//! - A degenerate interval (`start >= end`) overlaps nothing, itself included.
//! - Touching boundaries (`a.end == b.start`) do not overlap.

use crate::model::collection::EventCollection;
use crate::model::event::{Event, EventId, WallTime};

/// Returns whether `[a_start, a_end)` and `[b_start, b_end)` overlap.
pub fn intervals_overlap(
    a_start: WallTime,
    a_end: WallTime,
    b_start: WallTime,
    b_end: WallTime,
) -> bool {
    if a_start >= a_end || b_start >= b_end {
        return false;
    }
    (a_start >= b_start && a_start < b_end)
        || (a_end > b_start && a_end <= b_end)
        || (a_start <= b_start && a_end >= b_end)
}

/// Returns whether two events on the same date occupy overlapping times.
pub fn overlaps(a: &Event, b: &Event) -> bool {
    if a.date != b.date {
        return false;
    }
    let (a_start, a_end) = a.interval();
    let (b_start, b_end) = b.interval();
    intervals_overlap(a_start, a_end, b_start, b_end)
}

/// Finds the first event in `collection` that overlaps `candidate`.
///
/// `exclude` skips one id, used when `candidate` replaces that event.
pub fn find_conflict<'a>(
    collection: &'a EventCollection,
    candidate: &Event,
    exclude: Option<&EventId>,
) -> Option<&'a Event> {
    collection
        .on_day(candidate.date)
        .filter(|existing| Some(&existing.id) != exclude)
        .find(|existing| overlaps(candidate, existing))
}
