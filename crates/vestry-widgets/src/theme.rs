#![forbid(unsafe_code)]

//! Light/dark theme toggle.
//!
//! The theme lives in the root element's `data-theme` attribute (absent means
//! light). The toggle button mirrors it through `aria-pressed`. Persisting
//! the choice is the caller's concern.

use vestry_core::dom::{Document, ElementId};

/// Root attribute carrying the theme.
pub const THEME_ATTR: &str = "data-theme";

/// Color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value stored in preferences and in `data-theme`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored preference. Anything but `dark` is light.
    #[must_use]
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Toast text announcing a switch to this theme.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light mode",
            Self::Dark => "Dark mode",
        }
    }
}

/// The `#themeToggle` button and the root attribute it controls.
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    button: Option<ElementId>,
}

impl ThemeToggle {
    pub fn new(doc: &Document, button_id: &str) -> Self {
        Self {
            button: doc.element_by_id(button_id),
        }
    }

    #[must_use]
    pub fn button(&self) -> Option<ElementId> {
        self.button
    }

    /// Whether `target` is the toggle button (or inside it).
    #[must_use]
    pub fn is_hit(&self, doc: &Document, target: ElementId) -> bool {
        self.button.is_some_and(|b| doc.contains(b, target))
    }

    /// Theme currently applied to the document.
    #[must_use]
    pub fn current(doc: &Document) -> Theme {
        Theme::from_preference(doc.attribute(doc.root(), THEME_ATTR))
    }

    /// Write `theme` to the root attribute and the button state.
    pub fn apply(&self, doc: &mut Document, theme: Theme) {
        let root = doc.root();
        match theme {
            Theme::Dark => doc.set_attribute(root, THEME_ATTR, Theme::Dark.as_str()),
            Theme::Light => doc.remove_attribute(root, THEME_ATTR),
        }
        if let Some(button) = self.button {
            vestry_a11y::set_pressed(doc, button, theme == Theme::Dark);
        }
    }

    /// Flip the applied theme and return the new one.
    pub fn toggle(&self, doc: &mut Document) -> Theme {
        let next = Self::current(doc).toggled();
        self.apply(doc, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_core::dom::ElementKind;

    fn setup() -> (Document, ElementId, ThemeToggle) {
        let mut doc = Document::new();
        let btn = doc.append_new(doc.root(), ElementKind::Button);
        doc.set_attribute(btn, "id", "themeToggle");
        let toggle = ThemeToggle::new(&doc, "themeToggle");
        (doc, btn, toggle)
    }

    #[test]
    fn toggle_flips_root_and_pressed_state() {
        let (mut doc, btn, toggle) = setup();
        assert_eq!(ThemeToggle::current(&doc), Theme::Light);

        assert_eq!(toggle.toggle(&mut doc), Theme::Dark);
        assert_eq!(doc.attribute(doc.root(), THEME_ATTR), Some("dark"));
        assert!(vestry_a11y::is_pressed(&doc, btn));

        assert_eq!(toggle.toggle(&mut doc), Theme::Light);
        assert_eq!(doc.attribute(doc.root(), THEME_ATTR), None);
        assert_eq!(doc.attribute(btn, "aria-pressed"), Some("false"));
    }

    #[test]
    fn preference_parsing() {
        assert_eq!(Theme::from_preference(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_preference(Some("light")), Theme::Light);
        assert_eq!(Theme::from_preference(Some("DARK")), Theme::Light);
        assert_eq!(Theme::from_preference(None), Theme::Light);
        assert_eq!(Theme::Dark.label(), "Dark mode");
    }

    #[test]
    fn missing_button_still_applies_root() {
        let mut doc = Document::new();
        let toggle = ThemeToggle::new(&doc, "themeToggle");
        toggle.apply(&mut doc, Theme::Dark);
        assert_eq!(ThemeToggle::current(&doc), Theme::Dark);
        assert!(!toggle.is_hit(&doc, doc.root()));
    }
}
