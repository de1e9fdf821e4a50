//! Calendar domain model.
//!
//! # Responsibility
//! - Define canonical event records, draft input and the ordered collection.
//! - Own the same-day overlap predicate shared by every scheduling path.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - Collections are values; transitions produce new collections.

pub mod collection;
pub mod event;
pub mod overlap;
