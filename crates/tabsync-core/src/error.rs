//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] tabsync_navigation::NavigationError),

    #[error("Tab error: {0}")]
    Tabs(#[from] tabsync_tabs::TabsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event loop has shut down")]
    LoopClosed,
}
