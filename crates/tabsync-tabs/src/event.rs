//! Page events routed to tab groups
//!
//! Group-scoped events carry the target group's id; page-wide events
//! (hash change, visibility) go to every group subscribed to their kind.

use serde::{Deserialize, Serialize};

use crate::autoplay::TimerId;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Activation of the trigger at `trigger` within the group's tab list
    Click { group: String, trigger: usize },
    /// The URL fragment changed through navigation. `hash` is the new
    /// fragment, with or without `#`, possibly percent-encoded.
    HashChange { hash: String },
    VisibilityChange { hidden: bool },
    /// Focus entered an element inside the group
    FocusIn { group: String },
    PointerDown { group: String },
    AutoplayTick { group: String, timer: TimerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    HashChange,
    VisibilityChange,
    FocusIn,
    PointerDown,
    AutoplayTick,
}

impl PageEvent {
    /// Parse an event forwarded by a host bridge, e.g.
    /// `{"type": "click", "group": "features", "trigger": 2}`
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::Click { .. } => EventKind::Click,
            PageEvent::HashChange { .. } => EventKind::HashChange,
            PageEvent::VisibilityChange { .. } => EventKind::VisibilityChange,
            PageEvent::FocusIn { .. } => EventKind::FocusIn,
            PageEvent::PointerDown { .. } => EventKind::PointerDown,
            PageEvent::AutoplayTick { .. } => EventKind::AutoplayTick,
        }
    }

    /// The group this event is scoped to; `None` for page-wide events
    pub fn target_group(&self) -> Option<&str> {
        match self {
            PageEvent::Click { group, .. }
            | PageEvent::FocusIn { group }
            | PageEvent::PointerDown { group }
            | PageEvent::AutoplayTick { group, .. } => Some(group.as_str()),
            PageEvent::HashChange { .. } | PageEvent::VisibilityChange { .. } => None,
        }
    }
}
