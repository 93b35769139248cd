//! TABSYNC Navigation
//!
//! The page-global half of tab synchronization:
//! - `Location` owns the page URL and its hash fragment
//! - `SessionHistory` records pushed and navigated entries and supports
//!   back/forward traversal
//!
//! Tab groups read the fragment on init and on hash change, and push a new
//! fragment when a visitor activates a trigger.

mod error;
mod history;
mod location;

pub use error::NavigationError;
pub use history::{EntryKind, HistoryEntry, SessionHistory, Traversal};
pub use location::{fragment_matches, Location};

pub type Result<T> = std::result::Result<T, NavigationError>;
