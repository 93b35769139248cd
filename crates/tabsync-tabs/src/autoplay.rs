//! Autoplay timer lifecycle
//!
//! A group's autoplay owns at most one repeating timer, created through the
//! host's `Scheduler`. Ticks carry the `TimerId` that produced them so a tick
//! queued before a cancellation is recognised as stale.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::state::AutoplayState;

/// Handle to a repeating timer created by a `Scheduler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Source of repeating timers.
///
/// Each timer delivers `PageEvent::AutoplayTick { group, timer }` every
/// `every`, first firing one full interval after it was scheduled.
/// Cancelling an unknown or already cancelled timer is a no-op.
pub trait Scheduler {
    fn schedule_repeating(&mut self, group: &str, every: Duration) -> TimerId;

    fn cancel(&mut self, timer: TimerId);
}

/// Interval bounds applied to `data-tabs-autoplay-interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplaySettings {
    pub default_interval: Duration,
    pub min_interval: Duration,
}

impl AutoplaySettings {
    /// Resolve a raw interval attribute in milliseconds.
    ///
    /// Accepts decimal numbers the way JS `Number()` reads them (surrounding
    /// whitespace, fractions, exponents). `0x`/`0o`/`0b` literals are not
    /// recognised and, like missing, unparsable, non-finite or below-minimum
    /// values, resolve to the default.
    pub fn resolve_interval(&self, raw: Option<&str>) -> Duration {
        let parsed = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|ms| ms.is_finite());

        match parsed {
            Some(ms) if ms >= self.min_interval.as_millis() as f64 => {
                Duration::from_millis(ms as u64)
            }
            Some(ms) => {
                tracing::debug!(interval_ms = ms, "Autoplay interval below minimum, using default");
                self.default_interval
            }
            None => self.default_interval,
        }
    }
}

impl Default for AutoplaySettings {
    fn default() -> Self {
        Self {
            default_interval: Duration::from_millis(4000),
            min_interval: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Autoplay {
    state: AutoplayState,
    interval: Duration,
    timer: Option<TimerId>,
}

impl Autoplay {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: AutoplayState::Idle,
            interval,
            timer: None,
        }
    }

    pub fn state(&self) -> AutoplayState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Schedule the repeating timer. No-op when already running or stopped.
    pub fn start(&mut self, group: &str, scheduler: &mut dyn Scheduler) -> bool {
        if self.state == AutoplayState::Running
            || !self.state.can_transition_to(AutoplayState::Running)
        {
            return false;
        }

        self.timer = Some(scheduler.schedule_repeating(group, self.interval));
        self.set_state(group, AutoplayState::Running);
        true
    }

    /// Clear the timer but stay resumable. No-op unless running.
    pub fn pause(&mut self, group: &str, scheduler: &mut dyn Scheduler) -> bool {
        if self.state != AutoplayState::Running {
            return false;
        }

        self.clear_timer(scheduler);
        self.set_state(group, AutoplayState::Paused);
        true
    }

    /// Stop for the rest of the page's lifetime. Safe to call repeatedly.
    pub fn stop_permanently(&mut self, group: &str, scheduler: &mut dyn Scheduler) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        self.clear_timer(scheduler);
        self.set_state(group, AutoplayState::Stopped);
        true
    }

    /// Whether a tick from `timer` should advance the group
    pub fn accepts_tick(&self, timer: TimerId) -> bool {
        self.state == AutoplayState::Running && self.timer == Some(timer)
    }

    fn clear_timer(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }

    fn set_state(&mut self, group: &str, next: AutoplayState) {
        tracing::debug!(
            group = %group,
            from = %self.state,
            to = %next,
            "Autoplay state transition"
        );
        self.state = next;
    }
}
