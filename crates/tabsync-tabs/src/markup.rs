//! Tab group discovery
//!
//! Reads pre-rendered markup:
//! - root: `[data-tabs]`, optional `data-tabs-autoplay` and
//!   `data-tabs-autoplay-interval`
//! - trigger list: first `[role="tablist"]` inside the root (required)
//! - triggers: `[role="tab"]` inside the trigger list
//! - panels: `[role="tabpanel"]` inside the root, in document order

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TabsError;
use crate::view::{AttributeMap, ElementKey, ARIA_HIDDEN, ARIA_SELECTED, TAB_INDEX};
use crate::Result;

const GROUP_SELECTOR: &str = "[data-tabs]";
const TAB_LIST_SELECTOR: &str = r#"[role="tablist"]"#;
const TRIGGER_SELECTOR: &str = r#"[role="tab"]"#;
const PANEL_SELECTOR: &str = r#"[role="tabpanel"]"#;

const AUTOPLAY_ATTR: &str = "data-tabs-autoplay";
const AUTOPLAY_INTERVAL_ATTR: &str = "data-tabs-autoplay-interval";
const ARIA_CONTROLS: &str = "aria-controls";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMarkup {
    /// Id of the panel this trigger controls (`aria-controls`)
    pub controls: Option<String>,
    /// `aria-selected="true"` in the markup
    pub selected: bool,
    /// Raw attribute values as rendered, used as the first sync baseline
    pub aria_selected: Option<String>,
    pub tab_index: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMarkup {
    pub id: String,
    pub aria_hidden: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroupMarkup {
    /// Root `id`, or a generated `tabs-<uuid>` when the root has none
    pub id: String,
    pub triggers: Vec<TriggerMarkup>,
    pub panels: Vec<PanelMarkup>,
    pub autoplay: bool,
    /// Raw `data-tabs-autoplay-interval`, resolved against `AutoplaySettings`
    pub autoplay_interval: Option<String>,
}

impl TabGroupMarkup {
    pub fn has_panel(&self, id: &str) -> bool {
        self.panels.iter().any(|p| p.id == id)
    }

    /// Attributes as rendered in the markup, keyed like `TabView::attributes`
    pub fn attributes(&self) -> AttributeMap {
        let mut attributes = AttributeMap::new();

        for (index, trigger) in self.triggers.iter().enumerate() {
            let key = ElementKey::Trigger {
                group: self.id.clone(),
                index,
            };
            if let Some(value) = &trigger.aria_selected {
                attributes.insert((key.clone(), ARIA_SELECTED.to_string()), value.clone());
            }
            if let Some(value) = &trigger.tab_index {
                attributes.insert((key, TAB_INDEX.to_string()), value.clone());
            }
        }

        for panel in &self.panels {
            if let Some(value) = &panel.aria_hidden {
                let key = ElementKey::Panel {
                    group: self.id.clone(),
                    id: panel.id.clone(),
                };
                attributes.insert((key, ARIA_HIDDEN.to_string()), value.clone());
            }
        }

        attributes
    }
}

/// Find every tab group in a document.
///
/// Returns an empty list when the page has no `[data-tabs]` root. A root
/// without a trigger list is an authoring error and fails the whole call.
pub fn discover(html: &str) -> Result<Vec<TabGroupMarkup>> {
    let doc = Html::parse_document(html);
    let groups = selector(GROUP_SELECTOR)?;

    doc.select(&groups).map(read_group).collect()
}

fn read_group(root: ElementRef<'_>) -> Result<TabGroupMarkup> {
    let id = root
        .value()
        .id()
        .map(str::to_string)
        .unwrap_or_else(|| format!("tabs-{}", Uuid::new_v4()));

    let tab_list = root
        .select(&selector(TAB_LIST_SELECTOR)?)
        .next()
        .ok_or_else(|| TabsError::MissingTabList { group: id.clone() })?;

    let triggers = tab_list
        .select(&selector(TRIGGER_SELECTOR)?)
        .map(|el| {
            let attr = |name: &str| el.value().attr(name).map(str::to_string);
            TriggerMarkup {
                controls: attr(ARIA_CONTROLS).filter(|c| !c.is_empty()),
                selected: el.value().attr(ARIA_SELECTED) == Some("true"),
                aria_selected: attr(ARIA_SELECTED),
                tab_index: attr(TAB_INDEX),
            }
        })
        .collect();

    let mut panels = Vec::new();
    for el in root.select(&selector(PANEL_SELECTOR)?) {
        match el.value().id().filter(|id| !id.is_empty()) {
            Some(panel_id) => panels.push(PanelMarkup {
                id: panel_id.to_string(),
                aria_hidden: el.value().attr(ARIA_HIDDEN).map(str::to_string),
            }),
            None => tracing::warn!(group = %id, "Skipping tab panel without an id"),
        }
    }

    let group = TabGroupMarkup {
        autoplay: root.value().attr(AUTOPLAY_ATTR).is_some(),
        autoplay_interval: root.value().attr(AUTOPLAY_INTERVAL_ATTR).map(str::to_string),
        id,
        triggers,
        panels,
    };

    tracing::debug!(
        group = %group.id,
        triggers = group.triggers.len(),
        panels = group.panels.len(),
        autoplay = group.autoplay,
        "Discovered tab group"
    );

    Ok(group)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TabsError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}
