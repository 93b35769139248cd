//! Autoplay State Machine
//!
//! ```text
//! Idle
//!   ↓ start
//! Running
//!   ↓ page hidden        ↑ page visible
//! Paused
//!   ↓ focus-in / pointer-down / trigger click (from any live state)
//! Stopped
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoplayState {
    /// Constructed but no timer scheduled yet
    Idle,
    /// Repeating timer is live
    Running,
    /// Page hidden; timer cleared but resumable
    Paused,
    /// Visitor interacted with the group; never resumes
    Stopped,
}

impl AutoplayState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: AutoplayState) -> bool {
        match (self, target) {
            (AutoplayState::Idle, AutoplayState::Running) => true,
            (AutoplayState::Running, AutoplayState::Paused) => true,
            (AutoplayState::Paused, AutoplayState::Running) => true,
            // Any live state can be stopped
            (AutoplayState::Idle, AutoplayState::Stopped) => true,
            (AutoplayState::Running, AutoplayState::Stopped) => true,
            (AutoplayState::Paused, AutoplayState::Stopped) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Returns true if a repeating timer should exist in this state
    pub fn has_timer(&self) -> bool {
        matches!(self, AutoplayState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AutoplayState::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AutoplayState::Idle => "idle",
            AutoplayState::Running => "running",
            AutoplayState::Paused => "paused",
            AutoplayState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for AutoplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AutoplayState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(AutoplayState::Idle),
            "running" => Ok(AutoplayState::Running),
            "paused" => Ok(AutoplayState::Paused),
            "stopped" => Ok(AutoplayState::Stopped),
            _ => Err(format!("Unknown autoplay state: {}", s)),
        }
    }
}
