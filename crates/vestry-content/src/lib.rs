#![forbid(unsafe_code)]

//! Dialog content for Vestry.
//!
//! - [`block`]: the structured body model (`Block`, `Inline`) that replaces
//!   hand-concatenated markup, plus the typed dialog payloads.
//! - [`registry`]: immutable key → entry tables, built once from static
//!   configuration and queried by the trigger binder.

pub mod block;
pub mod registry;

pub use block::{Block, ContentAction, ImagePayload, Inline, LinkItem, RichText, TextPayload};
pub use registry::{
    ContentEntry, ContentError, ContentRegistry, EntryDef, RegistryKind, RegistrySet, RegistryTables,
};
