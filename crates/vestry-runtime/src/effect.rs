#![forbid(unsafe_code)]

//! Results of dispatching an event to a page.

use vestry_core::dom::ElementId;

/// A host-side action the page asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Smooth-scroll so `0` is at the top of the viewport.
    ScrollTo(ElementId),
    /// Offer a file download.
    Download {
        filename: String,
        mime: String,
        contents: String,
    },
}

/// What happened while handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageOutcome {
    /// The host must suppress its default handling of the event.
    pub default_prevented: bool,
    pub effects: Vec<Effect>,
}

impl PageOutcome {
    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// The first download effect, if any.
    #[must_use]
    pub fn download(&self) -> Option<(&str, &str, &str)> {
        self.effects.iter().find_map(|e| match e {
            Effect::Download {
                filename,
                mime,
                contents,
            } => Some((filename.as_str(), mime.as_str(), contents.as_str())),
            Effect::ScrollTo(_) => None,
        })
    }
}
