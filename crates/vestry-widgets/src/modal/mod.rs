#![forbid(unsafe_code)]

//! Dialog engine, presenters, and focus trap.
//!
//! One [`DialogEngine`] owns one overlay surface. The page runs two
//! independent instances: the content dialog (`DialogEngine<TextPanel>`) and
//! the gallery lightbox (`DialogEngine<ImagePanel>`). Both share the same
//! state machine and keyboard contract; only the [`Presenter`] differs.
//!
//! # Focus Management
//!
//! - **Capture**: the element focused before the dialog opened is remembered
//!   (only on the `Closed → Open` edge, never on a content swap).
//! - **Auto-focus**: the first tabbable element inside the surface receives
//!   focus on open, falling back to the close control.
//! - **Trap**: Tab from the last element wraps to the first, Shift+Tab from
//!   the first wraps to the last. The focusable set is recomputed per press.
//! - **Restore**: on close, focus returns to the captured element if it is
//!   still attached.
//!
//! # Example
//!
//! ```ignore
//! let mut dialog = DialogEngine::new(&mut doc, SurfaceConfig::dialog(), TextPanel::default());
//! if let Some(entry) = registry.resolve(RegistryKind::Topic, "sermons") {
//!     dialog.open(&mut doc, entry.payload());
//! }
//! dialog.handle_event(&mut doc, &Event::key(KeyCode::Escape));
//! assert!(!dialog.is_open());
//! ```

mod engine;
mod focus_trap;
mod presenter;
mod surface;

pub use engine::{CloseReason, DialogAction, DialogEngine, DialogState};
pub use focus_trap::{TabOutcome, trap_tab};
pub use presenter::{BoundAction, ImagePanel, Presenter, TextPanel};
pub use surface::SurfaceConfig;
