//! Produced attribute state
//!
//! Cloneable handle over the attributes the page has asked the host to hold.
//! Seeded with the markup's rendered attributes, then updated by every patch,
//! so it always mirrors what a real DOM would show.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tabsync_tabs::{AttributePatch, ElementKey, ARIA_HIDDEN, ARIA_SELECTED};

pub struct AttributeStore {
    attributes: Arc<RwLock<HashMap<ElementKey, HashMap<String, String>>>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self {
            attributes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record attributes that already exist in the markup
    pub fn seed<I>(&self, attributes: I)
    where
        I: IntoIterator<Item = ((ElementKey, String), String)>,
    {
        let mut store = self.attributes.write();
        for ((element, name), value) in attributes {
            store.entry(element).or_default().insert(name, value);
        }
    }

    pub fn apply(&self, patches: &[AttributePatch]) {
        let mut store = self.attributes.write();
        for patch in patches {
            store
                .entry(patch.element.clone())
                .or_default()
                .insert(patch.name.clone(), patch.value.clone());
        }
    }

    pub fn get(&self, element: &ElementKey, name: &str) -> Option<String> {
        self.attributes
            .read()
            .get(element)
            .and_then(|attrs| attrs.get(name))
            .cloned()
    }

    /// Indices of triggers in `group` whose `aria-selected` is "true"
    pub fn selected_triggers(&self, group: &str) -> Vec<usize> {
        let mut selected: Vec<usize> = self
            .attributes
            .read()
            .iter()
            .filter_map(|(element, attrs)| match element {
                ElementKey::Trigger { group: g, index }
                    if g == group
                        && attrs.get(ARIA_SELECTED).map(String::as_str) == Some("true") =>
                {
                    Some(*index)
                }
                _ => None,
            })
            .collect();
        selected.sort_unstable();
        selected
    }

    /// Ids of panels in `group` whose `aria-hidden` is "false"
    pub fn visible_panels(&self, group: &str) -> Vec<String> {
        let mut visible: Vec<String> = self
            .attributes
            .read()
            .iter()
            .filter_map(|(element, attrs)| match element {
                ElementKey::Panel { group: g, id }
                    if g == group
                        && attrs.get(ARIA_HIDDEN).map(String::as_str) == Some("false") =>
                {
                    Some(id.clone())
                }
                _ => None,
            })
            .collect();
        visible.sort();
        visible
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AttributeStore {
    fn clone(&self) -> Self {
        Self {
            attributes: Arc::clone(&self.attributes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(index: usize) -> ElementKey {
        ElementKey::Trigger {
            group: "g".to_string(),
            index,
        }
    }

    #[test]
    fn test_patches_override_seeded_values() {
        let store = AttributeStore::new();
        store.seed([((trigger(0), ARIA_SELECTED.to_string()), "true".to_string())]);
        assert_eq!(store.selected_triggers("g"), vec![0]);

        store.apply(&[
            AttributePatch {
                element: trigger(0),
                name: ARIA_SELECTED.to_string(),
                value: "false".to_string(),
            },
            AttributePatch {
                element: trigger(1),
                name: ARIA_SELECTED.to_string(),
                value: "true".to_string(),
            },
        ]);
        assert_eq!(store.selected_triggers("g"), vec![1]);
        assert_eq!(store.get(&trigger(0), ARIA_SELECTED).as_deref(), Some("false"));
        assert!(store.selected_triggers("other").is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = AttributeStore::new();
        let reader = store.clone();
        store.apply(&[AttributePatch {
            element: ElementKey::Panel {
                group: "g".to_string(),
                id: "a".to_string(),
            },
            name: ARIA_HIDDEN.to_string(),
            value: "false".to_string(),
        }]);
        assert_eq!(reader.visible_panels("g"), vec!["a".to_string()]);
    }

    #[test]
    fn test_reads_rendered_view() {
        use tabsync_tabs::{PanelMarkup, TabView, TriggerMarkup};

        let triggers = ["a", "b"].map(|id| TriggerMarkup {
            controls: Some(id.to_string()),
            ..Default::default()
        });
        let panels = ["a", "b"].map(|id| PanelMarkup {
            id: id.to_string(),
            ..Default::default()
        });

        let store = AttributeStore::new();
        store.seed(TabView::render("g", &triggers, &panels, "b").attributes());
        assert_eq!(store.selected_triggers("g"), vec![1]);
        assert_eq!(store.visible_panels("g"), vec!["b".to_string()]);
    }
}
