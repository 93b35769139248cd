//! Session history
//!
//! In-memory list of page entries with a cursor. Pushing discards any
//! forward entries; traversal moves the cursor and reports whether the
//! fragment changed, which is when the page must emit a hash change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// The location the page was loaded with
    Initial,
    /// Non-navigating update (no hash change, no anchor jump)
    Push,
    /// Navigation to a new fragment from outside the page's widgets
    Navigate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub location: Location,
    pub kind: EntryKind,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(location: Location, kind: EntryKind) -> Self {
        Self {
            location,
            kind,
            recorded_at: Utc::now(),
        }
    }
}

/// Result of moving back or forward through the history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    pub from: Location,
    pub to: Location,
}

impl Traversal {
    pub fn fragment_changed(&self) -> bool {
        self.from.hash() != self.to.hash()
    }
}

#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl SessionHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial, EntryKind::Initial)],
            index: 0,
        }
    }

    /// The location the page is currently showing
    pub fn current(&self) -> &Location {
        &self.entries[self.index].location
    }

    /// Record a non-navigating history update
    pub fn push_state(&mut self, location: Location) {
        tracing::debug!(url = %location, "History push");
        self.push(HistoryEntry::new(location, EntryKind::Push));
    }

    /// Record a navigation to a new location.
    ///
    /// Returns false, recording nothing, when the location is unchanged.
    pub fn navigate(&mut self, location: Location) -> bool {
        if &location == self.current() {
            return false;
        }

        tracing::debug!(url = %location, "History navigate");
        self.push(HistoryEntry::new(location, EntryKind::Navigate));
        true
    }

    pub fn back(&mut self) -> Option<Traversal> {
        if !self.can_go_back() {
            return None;
        }
        Some(self.move_to(self.index - 1))
    }

    pub fn forward(&mut self) -> Option<Traversal> {
        if !self.can_go_forward() {
            return None;
        }
        Some(self.move_to(self.index + 1))
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    fn move_to(&mut self, index: usize) -> Traversal {
        let from = self.current().clone();
        self.index = index;
        let to = self.current().clone();

        tracing::debug!(from = %from, to = %to, "History traversal");

        Traversal { from, to }
    }
}
