//! Page host
//!
//! Owns everything shared between the tab groups of one page: the session
//! history (and with it the URL hash), the timer scheduler, the page's
//! visibility and the produced attribute state. Controllers are driven one
//! event at a time.

use std::time::Duration;

use tabsync_navigation::{Location, SessionHistory};
use tabsync_tabs::{discover, AttributePatch, Context, PageEvent, Scheduler, TabController};

use crate::config::Config;
use crate::dom::AttributeStore;
use crate::scheduler::ManualScheduler;
use crate::Result;

pub struct Page<S: Scheduler> {
    controllers: Vec<TabController>,
    history: SessionHistory,
    scheduler: S,
    hidden: bool,
    store: AttributeStore,
    /// Patches produced since the last `take_patches`
    pending: Vec<AttributePatch>,
}

impl<S: Scheduler> Page<S> {
    /// Discover every tab group in `html` and initialize it.
    ///
    /// A page without `[data-tabs]` roots yields a page with no controllers.
    /// A root missing its tab list fails construction.
    pub fn from_html(config: &Config, html: &str, scheduler: S) -> Result<Self> {
        config.validate()?;
        let location = Location::parse(&config.page_url)?;
        let groups = discover(html)?;
        let settings = config.autoplay_settings();

        let mut page = Self {
            controllers: Vec::with_capacity(groups.len()),
            history: SessionHistory::new(location),
            scheduler,
            hidden: false,
            store: AttributeStore::new(),
            pending: Vec::new(),
        };

        for markup in groups {
            page.store.seed(markup.attributes());

            let group = markup.id.clone();
            let mut patches = Vec::new();
            let mut ctx = Context {
                history: &mut page.history,
                scheduler: &mut page.scheduler,
                patches: &mut patches,
            };

            match TabController::new(markup, &settings, &mut ctx) {
                Some(controller) => page.controllers.push(controller),
                None => tracing::debug!(group = %group, "Skipping tab group without panels"),
            }
            page.publish(patches);
        }

        tracing::info!(
            url = %page.history.current(),
            groups = page.controllers.len(),
            "Page initialized"
        );

        Ok(page)
    }

    /// Deliver an event from the host.
    ///
    /// `HashChange` first records the navigation; a hash change to the
    /// current fragment, or a visibility change to the current visibility,
    /// is dropped. Returns how many groups handled the event.
    pub fn handle(&mut self, event: PageEvent) -> usize {
        match &event {
            PageEvent::HashChange { hash } => {
                let target = self.history.current().with_fragment(hash);
                if !self.history.navigate(target) {
                    return 0;
                }
                // Groups see the fragment as the location stores it
                let normalized = PageEvent::HashChange {
                    hash: self.history.current().hash().to_string(),
                };
                return self.dispatch(&normalized);
            }
            PageEvent::VisibilityChange { hidden } => {
                if *hidden == self.hidden {
                    return 0;
                }
                self.hidden = *hidden;
            }
            _ => {}
        }

        self.dispatch(&event)
    }

    pub fn click(&mut self, group: &str, trigger: usize) -> usize {
        self.handle(PageEvent::Click {
            group: group.to_string(),
            trigger,
        })
    }

    pub fn focus_in(&mut self, group: &str) -> usize {
        self.handle(PageEvent::FocusIn {
            group: group.to_string(),
        })
    }

    pub fn pointer_down(&mut self, group: &str) -> usize {
        self.handle(PageEvent::PointerDown {
            group: group.to_string(),
        })
    }

    pub fn set_hidden(&mut self, hidden: bool) -> usize {
        self.handle(PageEvent::VisibilityChange { hidden })
    }

    /// Navigate to a fragment from outside the widgets (anchor link, address bar)
    pub fn navigate_to_fragment(&mut self, fragment: &str) -> usize {
        self.handle(PageEvent::HashChange {
            hash: fragment.to_string(),
        })
    }

    /// Browser back. Emits a hash change when the fragment differs.
    pub fn back(&mut self) -> usize {
        match self.history.back() {
            Some(traversal) if traversal.fragment_changed() => self.dispatch(&PageEvent::HashChange {
                hash: traversal.to.hash().to_string(),
            }),
            _ => 0,
        }
    }

    /// Browser forward. Emits a hash change when the fragment differs.
    pub fn forward(&mut self) -> usize {
        match self.history.forward() {
            Some(traversal) if traversal.fragment_changed() => self.dispatch(&PageEvent::HashChange {
                hash: traversal.to.hash().to_string(),
            }),
            _ => 0,
        }
    }

    pub fn location(&self) -> &Location {
        self.history.current()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn controllers(&self) -> &[TabController] {
        &self.controllers
    }

    pub fn group(&self, id: &str) -> Option<&TabController> {
        self.controllers.iter().find(|c| c.group_id() == id)
    }

    pub fn active_panel(&self, group: &str) -> Option<&str> {
        self.group(group).map(TabController::active_panel_id)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Cloneable view of the produced attributes
    pub fn attribute_store(&self) -> AttributeStore {
        self.store.clone()
    }

    /// Drain the patches the host has not applied yet
    pub fn take_patches(&mut self) -> Vec<AttributePatch> {
        std::mem::take(&mut self.pending)
    }

    fn dispatch(&mut self, event: &PageEvent) -> usize {
        let mut patches = Vec::new();
        let mut ctx = Context {
            history: &mut self.history,
            scheduler: &mut self.scheduler,
            patches: &mut patches,
        };

        let handled = self
            .controllers
            .iter_mut()
            .map(|controller| controller.handle(&mut ctx, event))
            .filter(|handled| *handled)
            .count();

        if handled == 0 {
            tracing::trace!(event = ?event.kind(), "Event had no subscribers");
        }

        self.publish(patches);
        handled
    }

    fn publish(&mut self, patches: Vec<AttributePatch>) {
        if patches.is_empty() {
            return;
        }
        self.store.apply(&patches);
        self.pending.extend(patches);
    }
}

impl Page<ManualScheduler> {
    /// Move virtual time forward, firing every tick that falls due in order
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut handled = 0;

        while let Some(tick) = self.scheduler.next_due(until) {
            handled += self.dispatch(&tick);
        }

        self.scheduler.set_now(until);
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_tabs::{AutoplayState, EventKind};

    const FEATURES: &str = r#"
        <section id="features" data-tabs data-tabs-autoplay data-tabs-autoplay-interval="2000">
          <div role="tablist">
            <button role="tab" aria-controls="a" aria-selected="false">A</button>
            <button role="tab" aria-controls="b" aria-selected="true">B</button>
            <button role="tab" aria-controls="c" aria-selected="false">C</button>
          </div>
          <div role="tabpanel" id="a"></div>
          <div role="tabpanel" id="b"></div>
          <div role="tabpanel" id="c"></div>
        </section>
    "#;

    const FEATURES_UNSELECTED: &str = r#"
        <section id="features" data-tabs data-tabs-autoplay data-tabs-autoplay-interval="2000">
          <div role="tablist">
            <button role="tab" aria-controls="a">A</button>
            <button role="tab" aria-controls="b">B</button>
            <button role="tab" aria-controls="c">C</button>
          </div>
          <div role="tabpanel" id="a"></div>
          <div role="tabpanel" id="b"></div>
          <div role="tabpanel" id="c"></div>
        </section>
    "#;

    const PRICING: &str = r#"
        <section id="pricing" data-tabs>
          <div role="tablist">
            <button role="tab" aria-controls="monthly">Monthly</button>
            <button role="tab" aria-controls="yearly">Yearly</button>
          </div>
          <div role="tabpanel" id="monthly"></div>
          <div role="tabpanel" id="yearly"></div>
        </section>
    "#;

    fn page(url: &str, html: &str) -> Page<ManualScheduler> {
        Page::from_html(&Config::new(url), html, ManualScheduler::new()).unwrap()
    }

    fn assert_one_active(page: &Page<ManualScheduler>, group: &str) {
        let store = page.attribute_store();
        let active = page.active_panel(group).unwrap();
        let selected = store.selected_triggers(group);
        let visible = store.visible_panels(group);

        assert_eq!(selected.len(), 1, "exactly one selected trigger");
        assert_eq!(visible, vec![active.to_string()], "exactly one visible panel");

        let view = page.group(group).unwrap().view();
        assert_eq!(view.selected_trigger(), Some(selected[0]));
    }

    #[test]
    fn test_hash_wins_over_markup() {
        let page = page("https://example.com/#c", FEATURES);
        assert_eq!(page.active_panel("features"), Some("c"));
        assert_one_active(&page, "features");
    }

    #[test]
    fn test_fallback_to_first_panel() {
        let page = page("https://example.com/", FEATURES_UNSELECTED);
        assert_eq!(page.active_panel("features"), Some("a"));
        assert_one_active(&page, "features");
    }

    #[test]
    fn test_autoplay_cycle() {
        let mut page = page("https://example.com/", FEATURES_UNSELECTED);

        page.advance(Duration::from_millis(1999));
        assert_eq!(page.active_panel("features"), Some("a"));

        page.advance(Duration::from_millis(1));
        assert_eq!(page.active_panel("features"), Some("b"));
        page.advance(Duration::from_millis(2000));
        assert_eq!(page.active_panel("features"), Some("c"));
        page.advance(Duration::from_millis(2000));
        assert_eq!(page.active_panel("features"), Some("a"));

        assert_one_active(&page, "features");
        // Autoplay never writes the URL
        assert_eq!(page.history().len(), 1);
    }

    #[test]
    fn test_pointer_down_stops_forever() {
        let mut page = page("https://example.com/", FEATURES_UNSELECTED);
        page.advance(Duration::from_millis(2000));
        assert_eq!(page.active_panel("features"), Some("b"));

        assert_eq!(page.pointer_down("features"), 1);
        page.set_hidden(true);
        page.set_hidden(false);
        page.advance(Duration::from_secs(60));

        assert_eq!(page.active_panel("features"), Some("b"));
        assert_eq!(
            page.group("features").unwrap().autoplay_state(),
            Some(AutoplayState::Stopped)
        );
        assert_eq!(page.scheduler().live_timers(), 0);
    }

    #[test]
    fn test_hidden_page_pauses_then_resumes() {
        let mut page = page("https://example.com/", FEATURES_UNSELECTED);
        page.set_hidden(true);
        page.advance(Duration::from_secs(30));
        assert_eq!(page.active_panel("features"), Some("a"));
        assert_eq!(
            page.group("features").unwrap().autoplay_state(),
            Some(AutoplayState::Paused)
        );

        // Repeated notifications of the same visibility are dropped
        assert_eq!(page.set_hidden(true), 0);

        page.set_hidden(false);
        page.advance(Duration::from_millis(2000));
        assert_eq!(page.active_panel("features"), Some("b"));
    }

    #[test]
    fn test_stopped_while_hidden_stays_stopped() {
        let mut page = page("https://example.com/", FEATURES_UNSELECTED);
        page.set_hidden(true);
        page.focus_in("features");
        page.set_hidden(false);
        page.advance(Duration::from_secs(30));

        assert_eq!(page.active_panel("features"), Some("a"));
        assert_eq!(page.scheduler().live_timers(), 0);
    }

    #[test]
    fn test_hash_round_trip() {
        let html = format!("{FEATURES_UNSELECTED}{PRICING}");
        let mut page = page("https://example.com/product", &html);

        page.click("features", 2);
        assert_eq!(page.location().hash(), "c");
        assert_eq!(page.active_panel("features"), Some("c"));
        // Other groups ignore a fragment they do not own
        assert_eq!(page.active_panel("pricing"), Some("monthly"));

        page.navigate_to_fragment("a");
        // "a" belongs to features, so features follows; pricing is untouched
        assert_eq!(page.active_panel("features"), Some("a"));
        assert_eq!(page.active_panel("pricing"), Some("monthly"));

        page.navigate_to_fragment("yearly");
        assert_eq!(page.active_panel("features"), Some("a"));
        assert_eq!(page.active_panel("pricing"), Some("yearly"));
    }

    #[test]
    fn test_external_hash_outside_group_keeps_state() {
        let mut page = page("https://example.com/", PRICING);
        page.click("pricing", 1);
        assert_eq!(page.location().hash(), "yearly");

        page.navigate_to_fragment("a");
        assert_eq!(page.active_panel("pricing"), Some("yearly"));
        assert_one_active(&page, "pricing");
    }

    #[test]
    fn test_back_and_forward_follow_history() {
        let mut page = page("https://example.com/", PRICING);
        page.click("pricing", 1);
        page.click("pricing", 0);
        assert_eq!(page.location().hash(), "monthly");

        page.back();
        assert_eq!(page.location().hash(), "yearly");
        assert_eq!(page.active_panel("pricing"), Some("yearly"));

        // Back to the initial entry: empty fragment is ignored
        page.back();
        assert_eq!(page.location().hash(), "");
        assert_eq!(page.active_panel("pricing"), Some("yearly"));

        page.forward();
        page.forward();
        assert_eq!(page.active_panel("pricing"), Some("monthly"));
    }

    #[test]
    fn test_hash_change_does_not_stop_autoplay() {
        let mut page = page("https://example.com/", FEATURES_UNSELECTED);
        page.navigate_to_fragment("C");
        assert_eq!(page.active_panel("features"), Some("c"));

        page.advance(Duration::from_millis(2000));
        assert_eq!(page.active_panel("features"), Some("a"));
    }

    #[test]
    fn test_patches_are_minimal() {
        let mut page = page("https://example.com/", PRICING);
        let initial = page.take_patches();
        // Two triggers (aria-selected + tabindex) and two panels
        assert_eq!(initial.len(), 6);

        page.click("pricing", 0);
        assert!(page.take_patches().is_empty());

        page.click("pricing", 1);
        assert_eq!(page.take_patches().len(), 6);
    }

    #[test]
    fn test_page_without_groups() {
        let mut page = page("https://example.com/", "<main><p>Hello</p></main>");
        assert!(page.controllers().is_empty());
        assert_eq!(page.set_hidden(true), 0);
        assert_eq!(page.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_missing_tab_list_fails() {
        let html = r#"<div data-tabs><div role="tabpanel" id="x"></div></div>"#;
        let result = Page::from_html(&Config::default(), html, ManualScheduler::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_subscriptions_follow_autoplay() {
        let page = page("https://example.com/", &format!("{FEATURES}{PRICING}"));
        let features = page.group("features").unwrap();
        let pricing = page.group("pricing").unwrap();

        assert!(features.subscribes_to(EventKind::PointerDown));
        assert!(!pricing.subscribes_to(EventKind::PointerDown));
        assert!(pricing.subscribes_to(EventKind::HashChange));
    }

    const LOCALIZED: &str = r#"
        <section id="g" data-tabs>
          <div role="tablist">
            <button role="tab" aria-controls="a">A</button>
            <button role="tab" aria-controls="über">Über</button>
          </div>
          <div role="tabpanel" id="a"></div>
          <div role="tabpanel" id="über"></div>
        </section>
    "#;

    #[test]
    fn test_non_ascii_panel_round_trip() {
        let mut page = page("https://example.com/", LOCALIZED);

        page.click("g", 1);
        assert_eq!(page.active_panel("g"), Some("über"));
        assert_eq!(page.location().hash(), "%C3%BCber");

        page.click("g", 0);
        page.back();
        assert_eq!(page.active_panel("g"), Some("über"));

        page.navigate_to_fragment("a");
        assert_eq!(page.active_panel("g"), Some("a"));
        page.navigate_to_fragment("Über");
        assert_eq!(page.active_panel("g"), Some("über"));
        page.navigate_to_fragment("a");
        page.navigate_to_fragment("%C3%BCber");
        assert_eq!(page.active_panel("g"), Some("über"));
    }

    #[test]
    fn test_non_ascii_hash_on_load() {
        let page = page("https://example.com/#%C3%BCber", LOCALIZED);
        assert_eq!(page.active_panel("g"), Some("über"));
    }

    #[test]
    fn test_correct_markup_needs_no_patches() {
        let html = r#"
            <section id="pricing" data-tabs>
              <div role="tablist">
                <button role="tab" aria-controls="monthly" aria-selected="false" tabindex="-1">M</button>
                <button role="tab" aria-controls="yearly" aria-selected="true" tabindex="0">Y</button>
              </div>
              <div role="tabpanel" id="monthly" aria-hidden="true"></div>
              <div role="tabpanel" id="yearly" aria-hidden="false"></div>
            </section>
        "#;
        let mut page = page("https://example.com/", html);

        assert_eq!(page.active_panel("pricing"), Some("yearly"));
        assert!(page.take_patches().is_empty());
        assert_one_active(&page, "pricing");
    }

    #[test]
    fn test_hash_change_to_current_fragment_is_dropped() {
        let mut page = page("https://example.com/#yearly", PRICING);
        assert_eq!(page.active_panel("pricing"), Some("yearly"));
        page.take_patches();

        assert_eq!(page.navigate_to_fragment("yearly"), 0);
        assert_eq!(page.navigate_to_fragment("#yearly"), 0);
        assert_eq!(page.history().len(), 1);
        assert!(page.take_patches().is_empty());

        assert_eq!(page.navigate_to_fragment("monthly"), 1);
        assert_eq!(page.history().len(), 2);
    }
}
