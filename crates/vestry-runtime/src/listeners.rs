#![forbid(unsafe_code)]

//! Document-level listener registry with RAII subscriptions.
//!
//! Dialog engines register their key and click handlers here instead of
//! relying on ambient global listeners. The hub keeps only `Weak` references;
//! the returned [`Subscription`] owns the callback, so dropping it (or the
//! [`ListenerScope`] holding it) unregisters the handler.
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. Every listener of the matching kind sees the event; one listener
//!    consuming it does not hide it from the others. Each listener checks its
//!    own engine state.
//! 3. A dropped subscription never fires again. Dead entries are pruned
//!    lazily during dispatch.

use std::rc::{Rc, Weak};

use vestry_core::dom::Document;
use vestry_core::event::Event;
use vestry_widgets::modal::DialogAction;

/// Which events a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Key,
    Click,
}

impl ListenerKind {
    /// The kind an event is delivered to, if any.
    #[must_use]
    pub fn of(event: &Event) -> Option<Self> {
        match event {
            Event::Key(_) => Some(Self::Key),
            Event::Click { .. } => Some(Self::Click),
            _ => None,
        }
    }
}

type Callback = dyn Fn(&mut Document, &Event) -> Option<DialogAction>;

struct Slot {
    kind: ListenerKind,
    callback: Weak<Callback>,
}

/// Registered document listeners.
#[derive(Default)]
pub struct ListenerHub {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for ListenerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHub")
            .field("live", &self.len())
            .finish()
    }
}

/// RAII guard for a registered listener.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    _callback: Rc<Callback>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}

impl ListenerHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`.
    pub fn subscribe(
        &mut self,
        kind: ListenerKind,
        callback: impl Fn(&mut Document, &Event) -> Option<DialogAction> + 'static,
    ) -> Subscription {
        let callback: Rc<Callback> = Rc::new(callback);
        self.slots.push(Slot {
            kind,
            callback: Rc::downgrade(&callback),
        });
        Subscription {
            _callback: callback,
        }
    }

    /// Deliver `event` to every live listener of its kind.
    ///
    /// Returns the actions reported, in registration order.
    pub fn dispatch(&mut self, doc: &mut Document, event: &Event) -> Vec<DialogAction> {
        self.slots.retain(|slot| slot.callback.strong_count() > 0);
        let Some(kind) = ListenerKind::of(event) else {
            return Vec::new();
        };
        let live: Vec<Rc<Callback>> = self
            .slots
            .iter()
            .filter(|slot| slot.kind == kind)
            .filter_map(|slot| slot.callback.upgrade())
            .collect();
        live.iter().filter_map(|callback| callback(doc, event)).collect()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.callback.strong_count() > 0)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds subscriptions for the lifetime of their owner.
///
/// Subscriptions are released in reverse registration order on drop.
#[derive(Debug, Default)]
pub struct ListenerScope {
    subscriptions: Vec<Subscription>,
}

impl ListenerScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release everything now.
    pub fn clear(&mut self) {
        while self.subscriptions.pop().is_some() {}
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use vestry_core::dom::ElementKind;
    use vestry_core::event::KeyCode;
    use vestry_widgets::modal::CloseReason;

    #[test]
    fn dispatch_reaches_matching_kind_in_order() {
        let mut hub = ListenerHub::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let (o1, o2, o3) = (order.clone(), order.clone(), order.clone());
        let _a = hub.subscribe(ListenerKind::Key, move |_, _| {
            o1.borrow_mut().push("a");
            None
        });
        let _b = hub.subscribe(ListenerKind::Click, move |_, _| {
            o2.borrow_mut().push("b");
            None
        });
        let _c = hub.subscribe(ListenerKind::Key, move |_, _| {
            o3.borrow_mut().push("c");
            Some(DialogAction::Closed(CloseReason::Escape))
        });

        let mut doc = Document::new();
        let actions = hub.dispatch(&mut doc, &Event::key(KeyCode::Escape));
        assert_eq!(*order.borrow(), vec!["a", "c"]);
        assert_eq!(actions, vec![DialogAction::Closed(CloseReason::Escape)]);
    }

    #[test]
    fn dropped_subscription_stops_firing() {
        let mut hub = ListenerHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = hub.subscribe(ListenerKind::Click, move |_, _| {
            h.set(h.get() + 1);
            None
        });
        let mut doc = Document::new();
        let target = doc.append_new(doc.root(), ElementKind::Button);

        hub.dispatch(&mut doc, &Event::click(target));
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.len(), 1);

        drop(sub);
        assert_eq!(hub.len(), 0);
        hub.dispatch(&mut doc, &Event::click(target));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn scope_releases_on_drop() {
        let mut hub = ListenerHub::new();
        {
            let mut scope = ListenerScope::new();
            scope.hold(hub.subscribe(ListenerKind::Key, |_, _| None));
            scope.hold(hub.subscribe(ListenerKind::Click, |_, _| None));
            assert_eq!(scope.len(), 2);
            assert_eq!(hub.len(), 2);
        }
        assert!(hub.is_empty());
    }

    #[test]
    fn non_listener_events_are_ignored() {
        let mut hub = ListenerHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = hub.subscribe(ListenerKind::Key, move |_, _| {
            h.set(h.get() + 1);
            None
        });
        let mut doc = Document::new();
        assert!(hub.dispatch(&mut doc, &Event::Scroll { offset: 10.0 }).is_empty());
        assert_eq!(hits.get(), 0);
    }
}
