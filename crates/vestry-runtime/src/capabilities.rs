#![forbid(unsafe_code)]

//! Host-provided services.
//!
//! The page never talks to a platform API directly. Clipboard access, the
//! single persisted preference, and the clock come in through these traits,
//! so a browser shim, a native host, and tests can each supply their own.
//! Failures are reported as values and handled at the call site.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use web_time::Instant;

/// Clipboard write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardError {
    /// The host refused access (permissions, insecure context).
    Denied,
    /// No clipboard exists in this environment.
    Unavailable,
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied => write!(f, "clipboard access denied"),
            Self::Unavailable => write!(f, "clipboard unavailable"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Preference storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceError {
    Unavailable,
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "preference storage unavailable"),
        }
    }
}

impl std::error::Error for PreferenceError {}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// String key/value preferences (the theme flag is the only user).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PreferenceError>;
}

/// Monotonic and wall-clock time.
pub trait Clock {
    fn instant(&self) -> Instant;
    fn utc(&self) -> DateTime<Utc>;
}

/// The real clocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at fixed points; for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Rc<RefCell<Instant>>,
    utc: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: Instant, utc: DateTime<Utc>) -> Self {
        Self {
            instant: Rc::new(RefCell::new(instant)),
            utc,
        }
    }

    /// Move the monotonic clock, visible through every clone.
    pub fn set_instant(&self, instant: Instant) {
        *self.instant.borrow_mut() = instant;
    }
}

impl Clock for FixedClock {
    fn instant(&self) -> Instant {
        *self.instant.borrow()
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc
    }
}

/// In-memory clipboard. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `error`.
    #[must_use]
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(error) = self.failure {
            return Err(error);
        }
        *self.contents.borrow_mut() = Some(text.to_owned());
        Ok(())
    }
}

/// In-memory preferences. Clones share storage.
#[derive(Debug, Clone)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
    available: bool,
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self {
            values: Rc::default(),
            available: true,
        }
    }
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes, like a browser with storage disabled.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if !self.available {
            return Err(PreferenceError::Unavailable);
        }
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PreferenceError> {
        if !self.available {
            return Err(PreferenceError::Unavailable);
        }
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Everything the page borrows from its host.
pub struct Capabilities {
    pub clipboard: Box<dyn Clipboard>,
    pub preferences: Box<dyn PreferenceStore>,
    pub clock: Box<dyn Clock>,
}

impl Capabilities {
    pub fn new(
        clipboard: impl Clipboard + 'static,
        preferences: impl PreferenceStore + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            clipboard: Box::new(clipboard),
            preferences: Box::new(preferences),
            clock: Box::new(clock),
        }
    }

    /// In-memory services with the system clock.
    pub fn in_memory() -> Self {
        Self::new(MemoryClipboard::new(), MemoryPreferences::new(), SystemClock)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn memory_clipboard_shares_contents() {
        let handle = MemoryClipboard::new();
        let mut clipboard = handle.clone();
        clipboard.write_text("yourchurch@upi").unwrap();
        assert_eq!(handle.contents().as_deref(), Some("yourchurch@upi"));
    }

    #[test]
    fn failing_clipboard_reports_error() {
        let mut clipboard = MemoryClipboard::failing(ClipboardError::Denied);
        assert_eq!(clipboard.write_text("x"), Err(ClipboardError::Denied));
        assert_eq!(clipboard.contents(), None);
        assert_eq!(ClipboardError::Denied.to_string(), "clipboard access denied");
    }

    #[test]
    fn preferences_round_trip() {
        let mut prefs = MemoryPreferences::new().with("theme", "dark");
        assert_eq!(prefs.get("theme").as_deref(), Some("dark"));
        prefs.remove("theme").unwrap();
        assert_eq!(prefs.get("theme"), None);
    }

    #[test]
    fn unavailable_preferences_refuse_writes() {
        let mut prefs = MemoryPreferences::unavailable();
        assert_eq!(prefs.set("theme", "dark"), Err(PreferenceError::Unavailable));
        assert_eq!(prefs.get("theme"), None);
    }

    #[test]
    fn fixed_clock_moves_through_clones() {
        let t0 = Instant::now();
        let clock = FixedClock::new(t0, Utc::now());
        let other = clock.clone();
        clock.set_instant(t0 + Duration::from_secs(3));
        assert_eq!(other.instant(), t0 + Duration::from_secs(3));
    }
}
