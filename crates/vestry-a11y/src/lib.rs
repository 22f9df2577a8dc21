#![forbid(unsafe_code)]

//! Accessibility layer for Vestry.
//!
//! Screen readers observe two things the behavior layer owns:
//!
//! - **Visibility flags** on overlay surfaces (`aria-hidden`) and toggle
//!   state on buttons (`aria-pressed`). These are required outputs, written
//!   through the helpers in this crate so every widget spells them the same
//!   way.
//! - **Live-region announcements** for state changes that happen away from
//!   the focused element (a dialog opening, a toast appearing).
//!
//! # Invariants
//!
//! 1. `set_hidden(doc, id, h)` followed by `is_hidden(doc, id)` returns `h`.
//! 2. An element with no `aria-hidden` attribute is reported as visible.
//! 3. The announcer history never exceeds its capacity; oldest entries are
//!    evicted first.

use std::collections::VecDeque;

use vestry_core::dom::{Document, ElementId};

/// Attribute announcing whether a surface is hidden from assistive technology.
pub const ARIA_HIDDEN: &str = "aria-hidden";
/// Attribute announcing a toggle button's pressed state.
pub const ARIA_PRESSED: &str = "aria-pressed";
/// Attribute marking an element as a modal dialog.
pub const ARIA_MODAL: &str = "aria-modal";

/// Mark `id` hidden (or shown) for assistive technology.
pub fn set_hidden(doc: &mut Document, id: ElementId, hidden: bool) {
    doc.set_attribute(id, ARIA_HIDDEN, if hidden { "true" } else { "false" });
}

/// Whether `id` is hidden from assistive technology.
#[must_use]
pub fn is_hidden(doc: &Document, id: ElementId) -> bool {
    doc.attribute(id, ARIA_HIDDEN) == Some("true")
}

/// Record a toggle button's pressed state.
pub fn set_pressed(doc: &mut Document, id: ElementId, pressed: bool) {
    doc.set_attribute(id, ARIA_PRESSED, if pressed { "true" } else { "false" });
}

/// Whether a toggle button reports itself pressed.
#[must_use]
pub fn is_pressed(doc: &Document, id: ElementId) -> bool {
    doc.attribute(id, ARIA_PRESSED) == Some("true")
}

/// Give `id` dialog semantics unless the markup already declares a role.
pub fn mark_modal(doc: &mut Document, id: ElementId) {
    if !doc.has_attribute(id, "role") {
        doc.set_attribute(id, "role", "dialog");
    }
    doc.set_attribute(id, ARIA_MODAL, "true");
}

/// Live-region urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Politeness {
    /// Read when the user is idle.
    #[default]
    Polite,
    /// Interrupts current speech.
    Assertive,
}

impl Politeness {
    /// Value for the `aria-live` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// A single live-region message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub politeness: Politeness,
    pub message: String,
}

/// Writes messages into a live region and keeps a bounded history.
///
/// The live region is optional: pages without one still get the history,
/// which hosts and tests can drain.
#[derive(Debug, Clone)]
pub struct Announcer {
    region: Option<ElementId>,
    history: VecDeque<Announcement>,
    capacity: usize,
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Announcer {
    /// Default number of announcements retained.
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Create an announcer writing to `region` (if any).
    #[must_use]
    pub fn new(region: Option<ElementId>) -> Self {
        Self {
            region,
            history: VecDeque::new(),
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Locate the live region by element id (`aria-live` container).
    #[must_use]
    pub fn from_document(doc: &Document, dom_id: &str) -> Self {
        Self::new(doc.element_by_id(dom_id))
    }

    /// Override the history capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self
    }

    /// Announce `message`.
    pub fn announce(&mut self, doc: &mut Document, message: impl Into<String>, politeness: Politeness) {
        let message = message.into();
        if let Some(region) = self.region
            && doc.is_attached(region)
        {
            doc.set_attribute(region, "aria-live", politeness.as_str());
            doc.set_text(region, message.clone());
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(Announcement {
            politeness,
            message,
        });
    }

    /// Most recent announcement.
    #[must_use]
    pub fn last(&self) -> Option<&Announcement> {
        self.history.back()
    }

    /// Announcements in order, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Announcement> {
        self.history.iter()
    }

    /// Remove and return all retained announcements.
    pub fn drain(&mut self) -> Vec<Announcement> {
        self.history.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_core::dom::ElementKind;

    #[test]
    fn hidden_round_trip() {
        let mut doc = Document::new();
        let el = doc.append_new(doc.root(), ElementKind::Container);
        assert!(!is_hidden(&doc, el), "no attribute means visible");
        set_hidden(&mut doc, el, true);
        assert!(is_hidden(&doc, el));
        assert_eq!(doc.attribute(el, ARIA_HIDDEN), Some("true"));
        set_hidden(&mut doc, el, false);
        assert!(!is_hidden(&doc, el));
        assert_eq!(doc.attribute(el, ARIA_HIDDEN), Some("false"));
    }

    #[test]
    fn pressed_round_trip() {
        let mut doc = Document::new();
        let btn = doc.append_new(doc.root(), ElementKind::Button);
        set_pressed(&mut doc, btn, true);
        assert!(is_pressed(&doc, btn));
        set_pressed(&mut doc, btn, false);
        assert_eq!(doc.attribute(btn, ARIA_PRESSED), Some("false"));
    }

    #[test]
    fn mark_modal_keeps_existing_role() {
        let mut doc = Document::new();
        let el = doc.append_new(doc.root(), ElementKind::Container);
        doc.set_attribute(el, "role", "alertdialog");
        mark_modal(&mut doc, el);
        assert_eq!(doc.attribute(el, "role"), Some("alertdialog"));
        assert_eq!(doc.attribute(el, ARIA_MODAL), Some("true"));
    }

    #[test]
    fn announce_writes_live_region() {
        let mut doc = Document::new();
        let region = doc.append_new(doc.root(), ElementKind::Container);
        doc.set_attribute(region, "id", "srStatus");
        let mut announcer = Announcer::from_document(&doc, "srStatus");

        announcer.announce(&mut doc, "Dialog opened", Politeness::Assertive);
        assert_eq!(doc.text(region), "Dialog opened");
        assert_eq!(doc.attribute(region, "aria-live"), Some("assertive"));
        assert_eq!(announcer.last().map(|a| a.message.as_str()), Some("Dialog opened"));
    }

    #[test]
    fn announce_without_region_still_records() {
        let mut doc = Document::new();
        let mut announcer = Announcer::default();
        announcer.announce(&mut doc, "hello", Politeness::Polite);
        assert_eq!(announcer.history().count(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let mut doc = Document::new();
        let mut announcer = Announcer::default().with_capacity(2);
        for i in 0..5 {
            announcer.announce(&mut doc, format!("m{i}"), Politeness::Polite);
        }
        let drained: Vec<String> = announcer.drain().into_iter().map(|a| a.message).collect();
        assert_eq!(drained, vec!["m3", "m4"]);
        assert!(announcer.last().is_none());
    }
}
