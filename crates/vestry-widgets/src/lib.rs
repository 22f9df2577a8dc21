#![forbid(unsafe_code)]

//! Widgets for the Vestry behavior layer.
//!
//! The centerpiece is [`modal`]: a generic dialog engine with a focus trap,
//! driven by typed payloads through a [`modal::Presenter`]. The remaining
//! modules are small page features the runtime wires up next to it.
//!
//! | Module | Markup it drives |
//! |--------|------------------|
//! | [`modal`] | `#modal`, `#lightbox` |
//! | [`toast`] | `#toast` |
//! | [`theme`] | `#themeToggle`, root `data-theme` |
//! | [`filter`] | `.chip[data-filter]`, `.event[data-category]` |
//! | [`calendar`] | `[data-ics]` (produces `.ics` text) |
//! | [`prayer_form`] | `#prayerForm` |
//! | [`scroll`] | `#miniHeader`, `.reveal`, `[data-jump]` |
//!
//! Enable the `tracing` feature to get debug events from the dialog engine.

pub mod calendar;
pub mod filter;
pub mod modal;
pub mod prayer_form;
pub mod scroll;
pub mod theme;
pub mod toast;

pub use calendar::{CalendarError, CalendarEvent, IcsExport};
pub use filter::EventFilter;
pub use modal::{
    BoundAction, CloseReason, DialogAction, DialogEngine, DialogState, ImagePanel, Presenter,
    SurfaceConfig, TextPanel,
};
pub use prayer_form::{FieldError, PrayerForm, PrayerRequest, Submission};
pub use scroll::{RevealTracker, StickyHeader};
pub use theme::{Theme, ThemeToggle};
pub use toast::Toast;
