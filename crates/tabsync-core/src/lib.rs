//! TABSYNC Core
//!
//! Hosts the tab groups of one page. The page owns the shared URL history,
//! the timer scheduler and the produced attribute state; controllers own
//! their selection. Handlers run one at a time, either driven directly
//! (`Page::handle`, `Page::advance`) or from the tokio `EventLoop`.

mod config;
mod dom;
mod error;
mod event_loop;
mod page;
mod scheduler;

pub use config::{AutoplayConfig, Config};
pub use dom::AttributeStore;
pub use error::CoreError;
pub use event_loop::{EventLoop, EventSender};
pub use page::Page;
pub use scheduler::{ManualScheduler, TokioScheduler};

// Re-export the controller and navigation types hosts work with
pub use tabsync_navigation::{EntryKind, HistoryEntry, Location, NavigationError, SessionHistory};
pub use tabsync_tabs::{
    AttributePatch, AutoplayState, ElementKey, EventKind, PageEvent, TabController, TabView,
    TabsError, TimerId,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Install the global `tracing` subscriber. Filtering follows `RUST_LOG`,
/// defaulting to `info`.
///
/// Hosts call this once at startup, before building a `Page` or `EventLoop`.
/// Panics if a global subscriber is already set.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
