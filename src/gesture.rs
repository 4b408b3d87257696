//! One drag gesture from pick-up to release.
//!
//! Starting a gesture only remembers what is being carried; the engine is
//! touched exactly once, when the gesture is finished over a target. Dropping
//! the gesture (or finishing it with no target) therefore leaves the setlist
//! exactly as it was before the pick-up.

use crate::engine::{DropOutcome, SetlistEngine};
use crate::models::SongId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    active: SongId,
    hover: Option<String>,
}

impl DragGesture {
    /// `dragStart`: pick up `active`.
    pub fn start(active: SongId) -> Self {
        Self {
            active,
            hover: None,
        }
    }

    pub fn active(&self) -> &SongId {
        &self.active
    }

    /// Song id or container sentinel now under the carried item.
    pub fn set_hover(&mut self, over: Option<String>) {
        self.hover = over;
    }

    /// `dragEnd` over whatever is currently hovered.
    pub fn finish(self, engine: &mut SetlistEngine) -> DropOutcome {
        engine.handle_drop(self.active.as_str(), self.hover.as_deref())
    }

    /// `dragEnd` with no target: consumes the gesture and reports the
    /// cancellation without consulting the engine state.
    pub fn cancel(self, engine: &mut SetlistEngine) -> DropOutcome {
        engine.handle_drop(self.active.as_str(), None)
    }
}
