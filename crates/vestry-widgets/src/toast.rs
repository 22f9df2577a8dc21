#![forbid(unsafe_code)]

//! Transient status notice.
//!
//! A single `#toast` element shows one message at a time. Each
//! [`Toast::show`] replaces the text and re-arms the hide deadline, so rapid
//! calls extend the notice instead of stacking timers. The host drives
//! expiry with [`Toast::tick`].

use std::time::Duration;

use vestry_core::dom::{Document, ElementId};
use web_time::Instant;

/// Default visible time.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2800);

/// Class that makes the toast visible.
pub const SHOW_CLASS: &str = "show";

/// Debounced toast notice.
#[derive(Debug, Clone)]
pub struct Toast {
    element: Option<ElementId>,
    duration: Duration,
    deadline: Option<Instant>,
}

impl Toast {
    /// Bind to `#<dom_id>`. A missing element makes every call a no-op.
    pub fn new(doc: &Document, dom_id: &str) -> Self {
        Self {
            element: doc.element_by_id(dom_id),
            duration: DEFAULT_DURATION,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Show `message` until `now + duration`, replacing any current notice.
    pub fn show(&mut self, doc: &mut Document, message: &str, now: Instant) {
        let Some(el) = self.element else {
            return;
        };
        doc.set_text(el, message);
        doc.add_class(el, SHOW_CLASS);
        self.deadline = Some(now + self.duration);
    }

    /// Hide the notice once its deadline has passed. Returns `true` when it
    /// was hidden by this call.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> bool {
        match (self.element, self.deadline) {
            (Some(el), Some(deadline)) if now >= deadline => {
                doc.remove_class(el, SHOW_CLASS);
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Text currently in the toast element.
    #[must_use]
    pub fn message<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        self.element.map(|el| doc.text(el))
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
