#![forbid(unsafe_code)]

//! Vestry: headless behavior for a small community website.
//!
//! The host owns rendering and input. It builds a [`Document`] mirroring its
//! markup, feeds [`Event`]s to a [`Page`], and applies the resulting document
//! changes and [`Effect`]s.
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`model`] | document model and events |
//! | [`a11y`] | ARIA helpers and the live-region announcer |
//! | [`content`] | content blocks and keyed registries |
//! | [`widgets`] | dialog engine and page features |
//! | [`runtime`] | page wiring, configuration, capabilities |

pub use vestry_a11y as a11y;
pub use vestry_content as content;
pub use vestry_core as model;
#[cfg(feature = "runtime")]
pub use vestry_runtime as runtime;
pub use vestry_widgets as widgets;

pub use vestry_core::dom::{Document, ElementId, ElementKind};
pub use vestry_core::event::{Event, KeyCode, KeyEvent, Modifiers};
#[cfg(feature = "runtime")]
pub use vestry_runtime::{Capabilities, ConfigError, Effect, Page, PageOutcome, SiteConfig};

/// Common imports for hosts.
pub mod prelude {
    pub use vestry_content::block::{Block, ContentAction, ImagePayload, TextPayload};
    pub use vestry_content::registry::{ContentRegistry, RegistryKind, RegistrySet};
    pub use vestry_core::dom::{Document, ElementId, ElementKind};
    pub use vestry_core::event::{Event, KeyCode, KeyEvent, Modifiers};
    pub use vestry_widgets::modal::{DialogEngine, ImagePanel, Presenter, SurfaceConfig, TextPanel};

    #[cfg(feature = "runtime")]
    pub use vestry_runtime::{
        Capabilities, Clipboard, Clock, Effect, Page, PageOutcome, PreferenceStore, SiteConfig,
    };
}
