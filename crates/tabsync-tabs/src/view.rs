//! DOM projection of a tab group
//!
//! `TabView::render` is a pure function of ActivePanelId. The controller keeps
//! the attributes it last synced and hands the host only the patches that
//! differ, so syncing twice with the same ActivePanelId emits nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::markup::{PanelMarkup, TriggerMarkup};

pub const ARIA_SELECTED: &str = "aria-selected";
pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const TAB_INDEX: &str = "tabindex";

/// Element addressed by a produced attribute
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKey {
    /// Trigger by position inside the group's tab list
    Trigger { group: String, index: usize },
    /// Panel by its id
    Panel { group: String, id: String },
}

impl ElementKey {
    pub fn group(&self) -> &str {
        match self {
            ElementKey::Trigger { group, .. } | ElementKey::Panel { group, .. } => group,
        }
    }
}

/// Attribute values keyed by element and attribute name
pub type AttributeMap = BTreeMap<(ElementKey, String), String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePatch {
    pub element: ElementKey,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerView {
    pub selected: bool,
    /// Only the selected trigger stays in the natural tab order
    pub focusable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub id: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabView {
    pub group: String,
    pub triggers: Vec<TriggerView>,
    pub panels: Vec<PanelView>,
}

impl TabView {
    /// Project `active` onto the group.
    ///
    /// Only the first trigger controlling `active` is selected, so at most one
    /// trigger is selected even if several point at the same panel.
    pub fn render(
        group: &str,
        triggers: &[TriggerMarkup],
        panels: &[PanelMarkup],
        active: &str,
    ) -> Self {
        let active_trigger = triggers
            .iter()
            .position(|t| t.controls.as_deref() == Some(active));

        let triggers = (0..triggers.len())
            .map(|index| {
                let selected = active_trigger == Some(index);
                TriggerView {
                    selected,
                    focusable: selected,
                }
            })
            .collect();

        let panels = panels
            .iter()
            .map(|p| PanelView {
                id: p.id.clone(),
                hidden: p.id != active,
            })
            .collect();

        Self {
            group: group.to_string(),
            triggers,
            panels,
        }
    }

    pub fn selected_trigger(&self) -> Option<usize> {
        self.triggers.iter().position(|t| t.selected)
    }

    pub fn visible_panels(&self) -> impl Iterator<Item = &str> {
        self.panels
            .iter()
            .filter(|p| !p.hidden)
            .map(|p| p.id.as_str())
    }

    /// The attribute set this view asks the host to hold
    pub fn attributes(&self) -> AttributeMap {
        let mut attributes = AttributeMap::new();

        for (index, trigger) in self.triggers.iter().enumerate() {
            let key = ElementKey::Trigger {
                group: self.group.clone(),
                index,
            };
            attributes.insert(
                (key.clone(), ARIA_SELECTED.to_string()),
                trigger.selected.to_string(),
            );
            attributes.insert(
                (key, TAB_INDEX.to_string()),
                if trigger.focusable { "0" } else { "-1" }.to_string(),
            );
        }

        for panel in &self.panels {
            let key = ElementKey::Panel {
                group: self.group.clone(),
                id: panel.id.clone(),
            };
            attributes.insert((key, ARIA_HIDDEN.to_string()), panel.hidden.to_string());
        }

        attributes
    }
}

/// Patches that turn `previous` into `next`. Attributes missing from `next`
/// are left untouched.
pub fn diff(previous: &AttributeMap, next: &AttributeMap) -> Vec<AttributePatch> {
    next.iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|((element, name), value)| AttributePatch {
            element: element.clone(),
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}
