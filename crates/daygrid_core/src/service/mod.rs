//! Core use-case services.
//!
//! # Responsibility
//! - Turn caller intents into collection transitions or rejections.
//! - Keep UI/FFI layers decoupled from id generation and conflict rules.

pub mod event_service;
pub mod id_source;
