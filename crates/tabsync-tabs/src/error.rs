//! Tab group error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabsError {
    #[error("Tab group {group} has no tab list")]
    MissingTabList { group: String },

    #[error("Invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid event payload: {0}")]
    Event(#[from] serde_json::Error),
}
