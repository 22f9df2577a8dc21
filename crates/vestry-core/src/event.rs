#![forbid(unsafe_code)]

//! Host input events.
//!
//! Events are plain data. The host translates whatever its platform emits
//! (DOM events, synthetic test input) into these variants and hands them to
//! the page one at a time.

use bitflags::bitflags;
use web_time::Instant;

use crate::dom::ElementId;

bitflags! {
    /// Keyboard modifier state at the time of a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

/// Logical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    Space,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Replace the modifier set.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    #[inline]
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// An input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Keyboard input, delivered at document level.
    Key(KeyEvent),
    /// Pointer activation on `target` (the innermost element under the pointer).
    Click { target: ElementId },
    /// The viewport scrolled to `offset` pixels from the top.
    Scroll { offset: f64 },
    /// `target` is now `ratio` visible within the viewport (`0.0..=1.0`).
    Visibility { target: ElementId, ratio: f32 },
    /// A form was submitted.
    Submit { target: ElementId },
    /// Clock tick for time-based widgets.
    Tick(Instant),
}

impl Event {
    /// Shorthand for a key press with no modifiers.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Shorthand for a key press with modifiers.
    #[must_use]
    pub fn key_with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::Key(KeyEvent::new(code).with_modifiers(modifiers))
    }

    /// Shorthand for a pointer activation.
    #[must_use]
    pub fn click(target: ElementId) -> Self {
        Self::Click { target }
    }

    /// The key event, if this is one.
    #[must_use]
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shorthand_is_unmodified_press() {
        let ev = Event::key(KeyCode::Escape);
        let key = ev.as_key().unwrap();
        assert!(key.is_press());
        assert!(!key.shift());
        assert_eq!(key.code, KeyCode::Escape);
    }

    #[test]
    fn key_with_shift() {
        let ev = Event::key_with(KeyCode::Tab, Modifiers::SHIFT);
        assert!(ev.as_key().unwrap().shift());
    }

    #[test]
    fn release_is_not_press() {
        let key = KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Release);
        assert!(!key.is_press());
    }

    #[test]
    fn non_key_events_have_no_key() {
        assert!(Event::Scroll { offset: 10.0 }.as_key().is_none());
    }
}
