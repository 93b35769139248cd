//! TABSYNC Tab Groups
//!
//! One controller per `[data-tabs]` root. Each controller owns its
//! ActivePanelId, projects it onto trigger and panel attributes, and reacts to
//! clicks, hash changes and its own autoplay timer.
//!
//! Autoplay is a small state machine:
//! ```text
//! Idle
//!   ↓ start
//! Running ⇄ Paused      (page hidden / visible)
//!   ↓ focus-in, pointer-down, trigger click
//! Stopped               (terminal)
//! ```

mod autoplay;
mod controller;
mod error;
mod event;
mod markup;
mod state;
mod view;

pub use autoplay::{Autoplay, AutoplaySettings, Scheduler, TimerId};
pub use controller::{Context, TabController};
pub use error::TabsError;
pub use event::{EventKind, PageEvent};
pub use markup::{discover, PanelMarkup, TabGroupMarkup, TriggerMarkup};
pub use state::AutoplayState;
pub use view::{
    diff, AttributeMap, AttributePatch, ElementKey, PanelView, TabView, TriggerView, ARIA_HIDDEN,
    ARIA_SELECTED, TAB_INDEX,
};

pub type Result<T> = std::result::Result<T, TabsError>;
