//! Day-scoped event search.
//!
//! # Responsibility
//! - Answer "events on this day matching this text" for list views.
//! - Keep filtering rules inside core so every host matches the same way.

pub mod day_query;
