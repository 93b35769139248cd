//! Autoplay timer sources
//!
//! - `ManualScheduler`: virtual clock, advanced explicitly by the page
//! - `TokioScheduler`: one tokio task per timer, ticks delivered over a channel
//!   the scheduler does not keep open

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use tabsync_tabs::{PageEvent, Scheduler, TimerId};

#[derive(Debug, Clone)]
struct ManualTimer {
    group: String,
    every: Duration,
    next_due: Duration,
}

/// Deterministic scheduler driven by `Page::advance`
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, ManualTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest tick due at or before `until`, moving the clock to it.
    ///
    /// Ties fire in timer creation order.
    pub fn next_due(&mut self, until: Duration) -> Option<PageEvent> {
        let (id, timer) = self
            .timers
            .iter_mut()
            .filter(|(_, t)| t.next_due <= until)
            .min_by_key(|(id, t)| (t.next_due, **id))?;

        self.now = timer.next_due;
        timer.next_due += timer.every;

        Some(PageEvent::AutoplayTick {
            group: timer.group.clone(),
            timer: *id,
        })
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, group: &str, every: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(
            id,
            ManualTimer {
                group: group.to_string(),
                every,
                next_due: self.now + every,
            },
        );
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }
}

/// Scheduler backed by tokio timers.
///
/// Must be used from within a tokio runtime. Holds only a weak handle to the
/// event channel; timer tasks end once every strong sender is gone.
pub struct TokioScheduler {
    events: mpsc::WeakUnboundedSender<PageEvent>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: &mpsc::UnboundedSender<PageEvent>) -> Self {
        Self {
            events: events.downgrade(),
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    pub fn live_timers(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, group: &str, every: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let events = self.events.clone();
        let group = group.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(sender) = events.upgrade() else {
                    break;
                };
                let tick = PageEvent::AutoplayTick {
                    group: group.clone(),
                    timer: id,
                };
                if sender.send(tick).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(timer = %id, every_ms = every.as_millis() as u64, "Scheduled timer");
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(handle) = self.tasks.remove(&timer) {
            handle.abort();
            tracing::trace!(timer = %timer, "Cancelled timer");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
