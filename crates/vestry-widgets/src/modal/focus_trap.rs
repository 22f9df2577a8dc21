#![forbid(unsafe_code)]

//! Tab-key containment for an open overlay.

use vestry_core::dom::{Document, ElementId};

/// What [`trap_tab`] did with a Tab press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    /// Let the host perform default navigation.
    NotIntercepted,
    /// Focus was moved to the given element; the host must suppress its default.
    Wrapped(ElementId),
}

/// Keep Tab navigation inside `scope`.
///
/// The tabbable set is recomputed on every call. With an empty set the press
/// is not intercepted. Forward from the last element wraps to the first;
/// backward from the first wraps to the last. If focus has strayed outside
/// `scope`, it is pulled back to the first (or last, when `reverse`) element.
pub fn trap_tab(doc: &mut Document, scope: ElementId, reverse: bool) -> TabOutcome {
    let order = doc.focusables(scope);
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
        return TabOutcome::NotIntercepted;
    };

    let active = doc.active_element();
    let inside = active.is_some_and(|id| doc.contains(scope, id) && id != scope);

    let target = if !inside {
        Some(if reverse { last } else { first })
    } else if reverse && active == Some(first) {
        Some(last)
    } else if !reverse && active == Some(last) {
        Some(first)
    } else {
        None
    };

    match target {
        Some(id) if doc.focus(id) => TabOutcome::Wrapped(id),
        _ => TabOutcome::NotIntercepted,
    }
}
