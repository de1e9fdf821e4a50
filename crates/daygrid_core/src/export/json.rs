//! JSON array rendering.

use super::ExportError;
use crate::model::event::Event;

pub(super) fn render(events: &[&Event]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec(events)?)
}
