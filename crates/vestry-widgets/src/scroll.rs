#![forbid(unsafe_code)]

//! Scroll-driven page features: sticky mini header, reveal-on-view, and
//! jump buttons.

use vestry_core::dom::{Document, ElementId};

pub const VISIBLE_CLASS: &str = "is-visible";
pub const DEFAULT_STICKY_THRESHOLD: f64 = 260.0;
pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.12;

/// `#miniHeader`, shown once the page scrolls past a threshold.
#[derive(Debug, Clone)]
pub struct StickyHeader {
    element: Option<ElementId>,
    threshold: f64,
}

impl StickyHeader {
    pub fn new(doc: &Document, dom_id: &str, threshold: f64) -> Self {
        Self {
            element: doc.element_by_id(dom_id),
            threshold,
        }
    }

    /// Apply the scroll position. Returns whether the header is visible.
    pub fn update(&self, doc: &mut Document, offset: f64) -> bool {
        let visible = offset > self.threshold;
        if let Some(el) = self.element {
            doc.toggle_class(el, VISIBLE_CLASS, visible);
        }
        visible
    }
}

/// `.reveal` elements that gain `is-visible` the first time they scroll in.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    observed: Vec<ElementId>,
    threshold: f32,
}

impl RevealTracker {
    pub fn scan(doc: &Document, threshold: f32) -> Self {
        Self {
            observed: doc.query_class(doc.root(), "reveal"),
            threshold,
        }
    }

    /// Report `target`'s visible ratio. Returns `true` when it was revealed by
    /// this call; revealed elements are no longer observed.
    pub fn observe(&mut self, doc: &mut Document, target: ElementId, ratio: f32) -> bool {
        if ratio <= 0.0 || ratio < self.threshold {
            return false;
        }
        let Some(pos) = self.observed.iter().position(|&id| id == target) else {
            return false;
        };
        self.observed.swap_remove(pos);
        doc.add_class(target, VISIBLE_CLASS);
        true
    }

    /// Elements still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.observed.len()
    }
}

/// The scroll destination of a `[data-jump]` control containing `target`.
///
/// The attribute holds a `#id` selector. Missing destinations yield `None`.
#[must_use]
pub fn jump_target(doc: &Document, target: ElementId) -> Option<ElementId> {
    let mut current = Some(target);
    while let Some(id) = current {
        if let Some(selector) = doc.attribute(id, "data-jump") {
            let dom_id = selector.strip_prefix('#')?;
            return doc.element_by_id(dom_id);
        }
        current = doc.parent(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_core::dom::ElementKind;

    #[test]
    fn header_toggles_around_threshold() {
        let mut doc = Document::new();
        let header = doc.append_new(doc.root(), ElementKind::Container);
        doc.set_attribute(header, "id", "miniHeader");
        let sticky = StickyHeader::new(&doc, "miniHeader", DEFAULT_STICKY_THRESHOLD);

        assert!(!sticky.update(&mut doc, 260.0));
        assert!(!doc.has_class(header, VISIBLE_CLASS));
        assert!(sticky.update(&mut doc, 261.0));
        assert!(doc.has_class(header, VISIBLE_CLASS));
        sticky.update(&mut doc, 0.0);
        assert!(!doc.has_class(header, VISIBLE_CLASS));
    }

    #[test]
    fn reveal_once_then_unobserve() {
        let mut doc = Document::new();
        let a = doc.append_new(doc.root(), ElementKind::Container);
        doc.add_class(a, "reveal");
        let b = doc.append_new(doc.root(), ElementKind::Container);
        doc.add_class(b, "reveal");
        let mut tracker = RevealTracker::scan(&doc, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(tracker.pending(), 2);

        assert!(!tracker.observe(&mut doc, a, 0.05));
        assert!(tracker.observe(&mut doc, a, 0.5));
        assert!(doc.has_class(a, VISIBLE_CLASS));
        assert!(!tracker.observe(&mut doc, a, 1.0));
        assert_eq!(tracker.pending(), 1);

        // Scrolling away does not hide it again.
        tracker.observe(&mut doc, a, 0.0);
        assert!(doc.has_class(a, VISIBLE_CLASS));
    }

    #[test]
    fn jump_resolves_selector() {
        let mut doc = Document::new();
        let section = doc.append_new(doc.root(), ElementKind::Container);
        doc.set_attribute(section, "id", "events");
        let btn = doc.append_new(doc.root(), ElementKind::Button);
        doc.set_attribute(btn, "data-jump", "#events");
        let icon = doc.append_new(btn, ElementKind::Span);
        let broken = doc.append_new(doc.root(), ElementKind::Button);
        doc.set_attribute(broken, "data-jump", "#nowhere");

        assert_eq!(jump_target(&doc, btn), Some(section));
        assert_eq!(jump_target(&doc, icon), Some(section));
        assert_eq!(jump_target(&doc, broken), None);
        assert_eq!(jump_target(&doc, section), None);
    }
}
