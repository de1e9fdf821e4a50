//! Flutter bridge for the DayGrid calendar core.

pub mod api;
