#![forbid(unsafe_code)]

//! Trigger binder: maps clickable markup to page intents.
//!
//! Triggers are found once at page construction, in document order. A click
//! resolves to the nearest trigger enclosing the target.
//!
//! | Markup | Trigger |
//! |--------|---------|
//! | `[data-modal-open="ministry"][data-ministry=k]` | entity dialog `k` |
//! | `[data-modal-open=k]` | topic dialog `k` |
//! | `.gallery-item[data-full=src]` | lightbox with `src` |
//! | `[data-ics=k]` | calendar download `k` |
//! | `[data-jump="#id"]` | scroll to `#id` |
//! | `.chip[data-filter=f]` | event filter `f` |

use std::collections::HashMap;

use vestry_content::registry::RegistryKind;
use vestry_core::dom::{Document, ElementId, ElementKind};

/// Value of `data-modal-open` selecting the entity registry.
pub const ENTITY_MODE: &str = "ministry";

/// What a trigger element asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Dialog { kind: RegistryKind, key: String },
    Lightbox { source: String },
    Calendar { key: String },
    Jump { selector: String },
    Filter { value: String },
}

/// Trigger elements found in a document.
#[derive(Debug, Clone, Default)]
pub struct TriggerBinder {
    order: Vec<ElementId>,
    triggers: HashMap<ElementId, Trigger>,
}

impl TriggerBinder {
    /// Find every trigger in `doc`.
    pub fn scan(doc: &Document) -> Self {
        let mut binder = Self::default();
        for id in doc.descendants(doc.root()) {
            if let Some(trigger) = Self::classify(doc, id) {
                binder.order.push(id);
                binder.triggers.insert(id, trigger);
            }
        }
        tracing::debug!(triggers = binder.order.len(), "trigger scan complete");
        binder
    }

    fn classify(doc: &Document, id: ElementId) -> Option<Trigger> {
        if let Some(value) = doc.attribute(id, "data-modal-open") {
            if value == ENTITY_MODE {
                let Some(key) = doc.attribute(id, "data-ministry") else {
                    tracing::debug!(?id, "entity trigger without data-ministry");
                    return None;
                };
                return Some(Trigger::Dialog {
                    kind: RegistryKind::Entity,
                    key: key.to_owned(),
                });
            }
            return Some(Trigger::Dialog {
                kind: RegistryKind::Topic,
                key: value.to_owned(),
            });
        }
        if doc.has_class(id, "gallery-item")
            && let Some(source) = doc.attribute(id, "data-full")
        {
            return Some(Trigger::Lightbox {
                source: source.to_owned(),
            });
        }
        if let Some(key) = doc.attribute(id, "data-ics") {
            return Some(Trigger::Calendar {
                key: key.to_owned(),
            });
        }
        if let Some(selector) = doc.attribute(id, "data-jump") {
            return Some(Trigger::Jump {
                selector: selector.to_owned(),
            });
        }
        if doc.has_class(id, "chip")
            && let Some(value) = doc.attribute(id, "data-filter")
        {
            return Some(Trigger::Filter {
                value: value.to_owned(),
            });
        }
        None
    }

    /// The trigger enclosing `target`, nearest first.
    #[must_use]
    pub fn resolve(&self, doc: &Document, target: ElementId) -> Option<(ElementId, &Trigger)> {
        let mut current = Some(target);
        while let Some(id) = current {
            if let Some(trigger) = self.triggers.get(&id) {
                return Some((id, trigger));
            }
            current = doc.parent(id);
        }
        None
    }

    /// Triggers in document order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Trigger)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.triggers.get(id).map(|t| (*id, t)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Caption for a gallery item: the `alt` of its first image.
#[must_use]
pub fn gallery_caption(doc: &Document, item: ElementId) -> String {
    doc.find(item, |d, id| d.kind(id) == Some(ElementKind::Image))
        .and_then(|img| doc.attribute(img, "alt"))
        .unwrap_or_default()
        .to_owned()
}
