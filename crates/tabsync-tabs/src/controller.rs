//! Tab Controller
//!
//! One instance per tab group. ActivePanelId is the single source of truth;
//! every transition goes through `sync`, which projects it onto the DOM and
//! queues only the attribute patches that changed.

use std::collections::HashMap;

use tabsync_navigation::{fragment_matches, SessionHistory};

use crate::autoplay::{Autoplay, AutoplaySettings, Scheduler};
use crate::event::{EventKind, PageEvent};
use crate::markup::{PanelMarkup, TabGroupMarkup, TriggerMarkup};
use crate::state::AutoplayState;
use crate::view::{diff, AttributeMap, AttributePatch, TabView};

/// Page resources a handler may touch
pub struct Context<'a> {
    /// Owner of the shared URL hash fragment
    pub history: &'a mut SessionHistory,
    pub scheduler: &'a mut dyn Scheduler,
    /// Patches queued for the host
    pub patches: &'a mut Vec<AttributePatch>,
}

type Handler = fn(&mut TabController, &mut Context<'_>, &PageEvent);

pub struct TabController {
    group: String,
    triggers: Vec<TriggerMarkup>,
    panels: Vec<PanelMarkup>,
    active_panel_id: String,
    /// Attributes as of the last sync
    synced: AttributeMap,
    autoplay: Option<Autoplay>,
    subscriptions: HashMap<EventKind, Handler>,
}

impl TabController {
    /// Build the controller, render the initial state and subscribe.
    ///
    /// Returns `None` for a group without panels; such a group is left alone.
    pub fn new(
        markup: TabGroupMarkup,
        settings: &AutoplaySettings,
        ctx: &mut Context<'_>,
    ) -> Option<Self> {
        let active_panel_id = resolve_initial(&markup, ctx.history.current().hash())?;
        let synced = markup.attributes();
        let interval = settings.resolve_interval(markup.autoplay_interval.as_deref());

        let mut controller = Self {
            group: markup.id,
            triggers: markup.triggers,
            panels: markup.panels,
            active_panel_id,
            synced,
            autoplay: None,
            subscriptions: HashMap::new(),
        };

        controller.sync(ctx);
        controller.subscribe(EventKind::Click, Self::on_click);
        controller.subscribe(EventKind::HashChange, Self::on_hash_change);

        if markup.autoplay && controller.panels.len() >= 2 {
            controller.subscribe(EventKind::FocusIn, Self::on_interaction);
            controller.subscribe(EventKind::PointerDown, Self::on_interaction);
            controller.subscribe(EventKind::VisibilityChange, Self::on_visibility_change);
            controller.subscribe(EventKind::AutoplayTick, Self::on_autoplay_tick);

            let mut autoplay = Autoplay::new(interval);
            autoplay.start(&controller.group, ctx.scheduler);
            controller.autoplay = Some(autoplay);
        }

        tracing::debug!(
            group = %controller.group,
            active = %controller.active_panel_id,
            autoplay = ?controller.autoplay_state(),
            "Tab group initialized"
        );

        Some(controller)
    }

    pub fn group_id(&self) -> &str {
        &self.group
    }

    pub fn active_panel_id(&self) -> &str {
        &self.active_panel_id
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().map(|p| p.id.as_str())
    }

    /// `None` when autoplay was never constructed for this group
    pub fn autoplay_state(&self) -> Option<AutoplayState> {
        self.autoplay.as_ref().map(Autoplay::state)
    }

    pub fn subscribes_to(&self, kind: EventKind) -> bool {
        self.subscriptions.contains_key(&kind)
    }

    pub fn view(&self) -> TabView {
        TabView::render(
            &self.group,
            &self.triggers,
            &self.panels,
            &self.active_panel_id,
        )
    }

    /// Route an event to this group's handler.
    ///
    /// Returns false when the group is not subscribed to the event's kind or
    /// the event is scoped to another group.
    pub fn handle(&mut self, ctx: &mut Context<'_>, event: &PageEvent) -> bool {
        if event.target_group().is_some_and(|g| g != self.group) {
            return false;
        }

        match self.subscriptions.get(&event.kind()).copied() {
            Some(handler) => {
                handler(self, ctx, event);
                true
            }
            None => false,
        }
    }

    /// Project ActivePanelId onto triggers and panels, queueing changed attributes
    pub fn sync(&mut self, ctx: &mut Context<'_>) {
        let next = self.view().attributes();
        let patches = diff(&self.synced, &next);

        if !patches.is_empty() {
            tracing::trace!(group = %self.group, patches = patches.len(), "Synced tab group");
        }

        ctx.patches.extend(patches);
        self.synced = next;
    }

    fn subscribe(&mut self, kind: EventKind, handler: Handler) {
        self.subscriptions.insert(kind, handler);
    }

    fn activate(&mut self, panel_id: String, ctx: &mut Context<'_>) {
        if panel_id != self.active_panel_id {
            tracing::debug!(
                group = %self.group,
                from = %self.active_panel_id,
                to = %panel_id,
                "Active panel changed"
            );
        }
        self.active_panel_id = panel_id;
        self.sync(ctx);
    }

    fn stop_autoplay(&mut self, ctx: &mut Context<'_>) {
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.stop_permanently(&self.group, ctx.scheduler);
        }
    }

    fn on_click(&mut self, ctx: &mut Context<'_>, event: &PageEvent) {
        let PageEvent::Click { trigger, .. } = event else {
            return;
        };

        let panel_id = self
            .triggers
            .get(*trigger)
            .and_then(|t| t.controls.as_deref())
            .filter(|id| self.panels.iter().any(|p| p.id == *id))
            .map(str::to_string);

        let Some(panel_id) = panel_id else {
            tracing::debug!(group = %self.group, trigger, "Ignoring click without a known panel");
            return;
        };

        self.stop_autoplay(ctx);
        self.activate(panel_id, ctx);

        let location = ctx.history.current().with_fragment(&self.active_panel_id);
        ctx.history.push_state(location);
    }

    fn on_hash_change(&mut self, ctx: &mut Context<'_>, event: &PageEvent) {
        let PageEvent::HashChange { hash } = event else {
            return;
        };
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        if hash.is_empty() {
            return;
        }

        let matched = self
            .panels
            .iter()
            .find(|p| fragment_matches(hash, &p.id))
            .map(|p| p.id.clone());

        if let Some(panel_id) = matched {
            if panel_id != self.active_panel_id {
                self.activate(panel_id, ctx);
            }
        }
    }

    fn on_visibility_change(&mut self, ctx: &mut Context<'_>, event: &PageEvent) {
        let PageEvent::VisibilityChange { hidden } = event else {
            return;
        };
        let Some(autoplay) = self.autoplay.as_mut() else {
            return;
        };

        if *hidden {
            autoplay.pause(&self.group, ctx.scheduler);
        } else {
            autoplay.start(&self.group, ctx.scheduler);
        }
    }

    fn on_interaction(&mut self, ctx: &mut Context<'_>, _event: &PageEvent) {
        self.stop_autoplay(ctx);
    }

    fn on_autoplay_tick(&mut self, ctx: &mut Context<'_>, event: &PageEvent) {
        let PageEvent::AutoplayTick { timer, .. } = event else {
            return;
        };
        let accepted = self
            .autoplay
            .as_ref()
            .is_some_and(|autoplay| autoplay.accepts_tick(*timer));
        if !accepted {
            tracing::trace!(group = %self.group, timer = %timer, "Ignoring stale autoplay tick");
            return;
        }

        let current = self
            .panels
            .iter()
            .position(|p| p.id == self.active_panel_id)
            .unwrap_or(0);
        let next = self.panels[(current + 1) % self.panels.len()].id.clone();
        self.activate(next, ctx);
    }
}

/// Initial ActivePanelId: hash match, then markup selection, then first panel
fn resolve_initial(markup: &TabGroupMarkup, hash: &str) -> Option<String> {
    let from_hash = markup
        .panels
        .iter()
        .find(|p| fragment_matches(hash, &p.id))
        .map(|p| p.id.clone());

    let from_markup = || {
        markup
            .triggers
            .iter()
            .find(|t| t.selected)
            .and_then(|t| t.controls.clone())
            .filter(|id| markup.has_panel(id))
    };

    from_hash
        .or_else(from_markup)
        .or_else(|| markup.panels.first().map(|p| p.id.clone()))
}
