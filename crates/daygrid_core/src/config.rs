//! Scheduler configuration.
//!
//! Hosts build a [`SchedulerConfig`] once (defaults, environment, CLI flags)
//! and hand it to [`crate::EventScheduler`].

use crate::model::event::DEFAULT_EVENT_COLOR;

/// Conflict policy for day-shift moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RescheduleMode {
    /// Moves are applied without re-checking the destination day.
    #[default]
    Permissive,
    /// Moves that would overlap an event on the destination day are rejected.
    Strict,
}

impl RescheduleMode {
    /// Parses a boolean-like "strict moves" flag (`1|true|yes|on`).
    pub fn from_strict_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Self::Strict,
            _ => Self::Permissive,
        }
    }
}

/// Tunables for [`crate::EventScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub reschedule_mode: RescheduleMode,
    /// Color applied to drafts submitted without one.
    pub default_color: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reschedule_mode: RescheduleMode::Permissive,
            default_color: DEFAULT_EVENT_COLOR.to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn strict() -> Self {
        Self {
            reschedule_mode: RescheduleMode::Strict,
            ..Self::default()
        }
    }
}
