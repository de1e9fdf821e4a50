//! Persistence adapters for the event collection.
//!
//! # Responsibility
//! - Define the load/persist contract hosts wrap around scheduler calls.
//! - Keep SQL and snapshot encoding out of the scheduling core.
//!
//! # Invariants
//! - The scheduling core never calls into this layer; hosts do.

pub mod snapshot_repo;
