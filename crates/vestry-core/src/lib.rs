#![forbid(unsafe_code)]

//! Core types for Vestry: host input events and the headless document model.
//!
//! The host (a browser shim, a test harness, any embedding) owns the real
//! surface. It mirrors the parts of the page Vestry cares about into a
//! [`dom::Document`], feeds [`event::Event`]s in, and reads the mutated
//! document back out.

pub mod dom;
pub mod event;

pub use dom::{Document, ElementId, ElementKind};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
