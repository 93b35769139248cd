//! Tokio event loop
//!
//! Serializes host events and autoplay ticks onto one task so handlers never
//! run concurrently. Hosts feed events through a cloneable `EventSender`;
//! the loop ends once every sender is dropped.

use std::future::Future;

use tokio::sync::mpsc;

use tabsync_tabs::PageEvent;

use crate::config::Config;
use crate::dom::AttributeStore;
use crate::error::CoreError;
use crate::page::Page;
use crate::scheduler::TokioScheduler;
use crate::Result;

#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl EventSender {
    pub fn send(&self, event: PageEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| CoreError::LoopClosed)
    }

    /// Forward a JSON-encoded event from the host bridge
    pub fn send_json(&self, payload: &str) -> Result<()> {
        let event = PageEvent::from_json(payload)?;
        self.send(event)
    }
}

pub struct EventLoop {
    page: Page<TokioScheduler>,
    events: mpsc::UnboundedReceiver<PageEvent>,
}

impl EventLoop {
    /// Build the page and the first sender for it. Autoplay timers start
    /// immediately, so this must be called from within a tokio runtime.
    pub fn new(config: &Config, html: &str) -> Result<(Self, EventSender)> {
        let (tx, events) = mpsc::unbounded_channel();
        let page = Page::from_html(config, html, TokioScheduler::new(&tx))?;

        Ok((Self { page, events }, EventSender { tx }))
    }

    pub fn page(&self) -> &Page<TokioScheduler> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page<TokioScheduler> {
        &mut self.page
    }

    pub fn attribute_store(&self) -> AttributeStore {
        self.page.attribute_store()
    }

    /// Wait for the next event and handle it. Returns false once no sender
    /// remains.
    pub async fn step(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.page.handle(event);
                true
            }
            None => false,
        }
    }

    /// Handle events until `shutdown` resolves or every sender is dropped.
    /// Queued events are drained before shutdown is observed.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(groups = self.page.controllers().len(), "Event loop started");

        loop {
            tokio::select! {
                biased;

                event = self.events.recv() => match event {
                    Some(event) => {
                        self.page.handle(event);
                    }
                    None => break,
                },
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Event loop stopped");
    }
}
