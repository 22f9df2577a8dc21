#![forbid(unsafe_code)]

//! Page wiring for Vestry.
//!
//! [`Page`] owns a [`Document`](vestry_core::dom::Document), wires the
//! content dialog and the image lightbox into a [`ListenerHub`], scans the
//! markup for triggers, and routes host events to the page features. Side
//! effects outside the document go through [`Capabilities`] or come back as
//! [`Effect`]s.
//!
//! # Example
//!
//! ```ignore
//! let config = SiteConfig::builtin()?;
//! let mut page = Page::new(document, config, Capabilities::in_memory());
//! let outcome = page.dispatch(&Event::click(sermons_button));
//! assert!(page.dialog().is_open());
//! ```

pub mod capabilities;
pub mod config;
pub mod effect;
pub mod listeners;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod page;
pub mod triggers;

pub use capabilities::{
    Capabilities, Clipboard, ClipboardError, Clock, FixedClock, MemoryClipboard,
    MemoryPreferences, PreferenceError, PreferenceStore, SystemClock,
};
pub use config::{ConfigError, SiteConfig};
pub use effect::{Effect, PageOutcome};
pub use listeners::{ListenerHub, ListenerKind, ListenerScope, Subscription};
pub use page::Page;
pub use triggers::{Trigger, TriggerBinder};
