#![forbid(unsafe_code)]

//! Event-category filter chips.

use vestry_core::dom::{Document, ElementId};

/// Filter value that shows every event.
pub const ALL: &str = "all";
pub const ACTIVE_CLASS: &str = "is-active";

/// `.chip[data-filter]` buttons over `.event[data-category]` cards.
///
/// Hidden cards carry the `hidden` attribute.
#[derive(Debug, Clone)]
pub struct EventFilter {
    chips: Vec<ElementId>,
    events: Vec<ElementId>,
}

impl EventFilter {
    /// Collect chips and event cards present in `doc`.
    pub fn scan(doc: &Document) -> Self {
        let root = doc.root();
        let chips = doc
            .query_class(root, "chip")
            .into_iter()
            .filter(|&id| doc.has_attribute(id, "data-filter"))
            .collect();
        Self {
            chips,
            events: doc.query_class(root, "event"),
        }
    }

    /// The chip containing `target`, if any.
    #[must_use]
    pub fn chip_for(&self, doc: &Document, target: ElementId) -> Option<ElementId> {
        self.chips.iter().copied().find(|&chip| doc.contains(chip, target))
    }

    /// Activate `chip` and apply its filter. Returns the filter value.
    ///
    /// Does nothing without event cards, matching pages that have chips but
    /// no listing.
    pub fn select(&self, doc: &mut Document, chip: ElementId) -> Option<String> {
        if self.events.is_empty() {
            return None;
        }
        let filter = doc.attribute(chip, "data-filter")?.to_owned();
        for &c in &self.chips {
            doc.toggle_class(c, ACTIVE_CLASS, c == chip);
        }
        for &card in &self.events {
            let show = filter == ALL || doc.attribute(card, "data-category") == Some(filter.as_str());
            if show {
                doc.remove_attribute(card, "hidden");
            } else {
                doc.set_attribute(card, "hidden", "");
            }
        }
        Some(filter)
    }

    #[must_use]
    pub fn chips(&self) -> &[ElementId] {
        &self.chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_core::dom::ElementKind;

    fn setup() -> (Document, Vec<ElementId>, Vec<ElementId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let chips: Vec<_> = ["all", "prayer", "youth"]
            .iter()
            .map(|f| {
                let c = doc.append_new(root, ElementKind::Button);
                doc.add_class(c, "chip");
                doc.set_attribute(c, "data-filter", *f);
                c
            })
            .collect();
        let events: Vec<_> = ["prayer", "youth", "prayer"]
            .iter()
            .map(|cat| {
                let e = doc.append_new(root, ElementKind::Container);
                doc.add_class(e, "event");
                doc.set_attribute(e, "data-category", *cat);
                e
            })
            .collect();
        (doc, chips, events)
    }

    #[test]
    fn filters_by_category() {
        let (mut doc, chips, events) = setup();
        let filter = EventFilter::scan(&doc);
        assert_eq!(filter.select(&mut doc, chips[1]).as_deref(), Some("prayer"));
        assert!(doc.has_class(chips[1], ACTIVE_CLASS));
        assert!(!doc.has_class(chips[0], ACTIVE_CLASS));
        let hidden: Vec<_> = events.iter().map(|&e| doc.has_attribute(e, "hidden")).collect();
        assert_eq!(hidden, vec![false, true, false]);
    }

    #[test]
    fn all_shows_everything() {
        let (mut doc, chips, events) = setup();
        let filter = EventFilter::scan(&doc);
        filter.select(&mut doc, chips[2]);
        filter.select(&mut doc, chips[0]);
        assert!(events.iter().all(|&e| !doc.has_attribute(e, "hidden")));
        assert_eq!(
            chips.iter().filter(|&&c| doc.has_class(c, ACTIVE_CLASS)).count(),
            1
        );
    }

    #[test]
    fn chip_lookup_includes_children() {
        let (mut doc, chips, _) = setup();
        let label = doc.append_new(chips[2], ElementKind::Span);
        let filter = EventFilter::scan(&doc);
        assert_eq!(filter.chip_for(&doc, label), Some(chips[2]));
        assert_eq!(filter.chip_for(&doc, doc.root()), None);
    }
}
