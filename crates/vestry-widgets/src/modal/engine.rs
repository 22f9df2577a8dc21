#![forbid(unsafe_code)]

//! The dialog state machine.
//!
//! # Invariants
//!
//! 1. **Single surface**: one engine drives one overlay; there is no stacking
//!    within an instance.
//! 2. **Content lifetime**: [`DialogEngine::active_content`] is `Some` exactly
//!    while open. Closing drops the payload and clears the rendered elements.
//! 3. **Prior focus**: captured on the `Closed → Open` edge only, consumed on
//!    `Open → Closed`. A content swap never recaptures it.
//! 4. **Idempotent binding**: nested content actions are rebuilt on every
//!    open; the bound set always reflects the current render only.
//! 5. **Own state only**: event handling checks this instance's state, so
//!    independent engines never react to each other.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing surface | Root or presenter elements absent | Engine detached; all operations no-op |
//! | Surface removed while open | Host removed the markup | `close` still returns to `Closed` |
//! | Stale prior focus | Opener removed while open | Focus restoration skipped |
//! | Nothing focusable | Content without controls or close button | Focus left unchanged; Tab not intercepted |

use std::mem;

use vestry_a11y::{Announcer, Politeness};
use vestry_content::block::ContentAction;
use vestry_core::dom::{Document, ElementId};
use vestry_core::event::{Event, KeyCode};

use super::focus_trap::{TabOutcome, trap_tab};
use super::presenter::{BoundAction, Presenter};
use super::surface::SurfaceConfig;

/// Per-instance dialog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<C> {
    Closed,
    Open {
        content: C,
        prior_focus: Option<ElementId>,
    },
}

impl<C> Default for DialogState<C> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<C> DialogState<C> {
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Why a dialog closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    Escape,
    Backdrop,
    CloseButton,
}

/// Result of an event the engine consumed.
///
/// Any `Some` return means the host should suppress its default handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    /// The dialog closed.
    Closed(CloseReason),
    /// Tab navigation wrapped inside the surface; focus moved to the element.
    FocusWrapped(ElementId),
    /// A bound content control was activated. The caller performs it.
    Invoke(ContentAction),
}

/// Open/close state, focus trap and content rendering for one overlay.
pub struct DialogEngine<P: Presenter> {
    config: SurfaceConfig,
    surface: Option<ElementId>,
    presenter: P,
    state: DialogState<P::Content>,
    bound: Vec<BoundAction>,
    announcer: Announcer,
}

impl<P> std::fmt::Debug for DialogEngine<P>
where
    P: Presenter + std::fmt::Debug,
    P::Content: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogEngine")
            .field("surface", &self.config.root_id)
            .field("attached", &self.surface.is_some())
            .field("state", &self.state)
            .field("bound", &self.bound.len())
            .finish()
    }
}

impl<P: Presenter> DialogEngine<P> {
    /// Resolve the surface named by `config` and mount `presenter` into it.
    ///
    /// When the surface or the presenter's elements are missing the engine is
    /// detached and every later operation is a no-op.
    pub fn new(doc: &mut Document, config: SurfaceConfig, mut presenter: P) -> Self {
        let surface = doc
            .element_by_id(&config.root_id)
            .filter(|&root| presenter.mount(doc, root));
        if let Some(root) = surface {
            vestry_a11y::mark_modal(doc, root);
            vestry_a11y::set_hidden(doc, root, true);
            doc.remove_class(root, &config.open_class);
        }
        let announcer = match config.live_region_id.as_deref() {
            Some(region) => Announcer::from_document(doc, region),
            None => Announcer::new(None),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            surface = %config.root_id,
            attached = surface.is_some(),
            "dialog engine created"
        );

        Self {
            config,
            surface,
            presenter,
            state: DialogState::Closed,
            bound: Vec::new(),
            announcer,
        }
    }

    /// Show `content`.
    ///
    /// From `Closed` this captures the focused element for later restoration.
    /// While already open it replaces the content and keeps the original
    /// prior focus. Returns `false` only when the engine is detached.
    pub fn open(&mut self, doc: &mut Document, content: P::Content) -> bool {
        let Some(surface) = self.attached_surface(doc) else {
            return false;
        };

        let prior_focus = match mem::take(&mut self.state) {
            DialogState::Open { prior_focus, .. } => {
                #[cfg(feature = "tracing")]
                tracing::debug!(surface = %self.config.root_id, "dialog content replaced");
                prior_focus
            }
            DialogState::Closed => doc.active_element(),
        };

        self.presenter.clear(doc);
        self.bound = self.presenter.render(doc, &content);

        doc.add_class(surface, &self.config.open_class);
        vestry_a11y::set_hidden(doc, surface, false);
        let message = self.presenter.announcement(&content);
        self.announcer.announce(doc, message, Politeness::Polite);

        self.state = DialogState::Open {
            content,
            prior_focus,
        };

        let initial = doc.focusables(surface).first().copied().or_else(|| {
            doc.find(surface, |d, id| d.has_attribute(id, &self.config.close_attr))
        });
        if let Some(target) = initial {
            doc.focus(target);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            surface = %self.config.root_id,
            bound_actions = self.bound.len(),
            focused = ?doc.active_element(),
            "dialog opened"
        );
        true
    }

    /// Hide the surface and restore focus. A no-op while closed.
    ///
    /// Returns whether a transition happened.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        let DialogState::Open { prior_focus, .. } = mem::take(&mut self.state) else {
            return false;
        };

        if let Some(surface) = self.attached_surface(doc) {
            doc.remove_class(surface, &self.config.open_class);
            vestry_a11y::set_hidden(doc, surface, true);
        }
        self.presenter.clear(doc);
        self.bound.clear();

        let restored = prior_focus.is_some_and(|id| doc.is_attached(id) && doc.focus(id));
        if !restored
            && let (Some(surface), Some(active)) = (self.surface, doc.active_element())
            && doc.contains(surface, active)
        {
            doc.blur();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            surface = %self.config.root_id,
            restored,
            "dialog closed"
        );
        true
    }

    /// React to a host event. Only acts while this instance is open.
    pub fn handle_event(&mut self, doc: &mut Document, event: &Event) -> Option<DialogAction> {
        if !self.is_open() {
            return None;
        }
        match event {
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Escape if self.config.close_on_escape => {
                    self.close(doc);
                    Some(DialogAction::Closed(CloseReason::Escape))
                }
                KeyCode::Tab => {
                    let surface = self.attached_surface(doc)?;
                    match trap_tab(doc, surface, key.shift()) {
                        TabOutcome::Wrapped(id) => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(surface = %self.config.root_id, ?id, "focus wrapped");
                            Some(DialogAction::FocusWrapped(id))
                        }
                        TabOutcome::NotIntercepted => None,
                    }
                }
                _ => None,
            },
            Event::Click { target } => self.handle_click(doc, *target),
            _ => None,
        }
    }

    fn handle_click(&mut self, doc: &mut Document, target: ElementId) -> Option<DialogAction> {
        let surface = self.attached_surface(doc)?;
        if !doc.contains(surface, target) {
            return None;
        }

        let is_close_control = ancestors_within(doc, target, surface)
            .any(|id| doc.has_attribute(id, &self.config.close_attr));
        if is_close_control {
            self.close(doc);
            return Some(DialogAction::Closed(CloseReason::CloseButton));
        }

        if self.config.close_on_backdrop && doc.has_class(target, &self.config.backdrop_class) {
            self.close(doc);
            return Some(DialogAction::Closed(CloseReason::Backdrop));
        }

        ancestors_within(doc, target, surface).find_map(|id| {
            self.bound
                .iter()
                .find(|b| b.element == id)
                .map(|b| DialogAction::Invoke(b.action.clone()))
        })
    }

    fn attached_surface(&self, doc: &Document) -> Option<ElementId> {
        self.surface.filter(|&s| doc.is_attached(s))
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The displayed payload, while open.
    pub fn active_content(&self) -> Option<&P::Content> {
        match &self.state {
            DialogState::Open { content, .. } => Some(content),
            DialogState::Closed => None,
        }
    }

    /// The element focus returns to on close, while open.
    pub fn prior_focus(&self) -> Option<ElementId> {
        match &self.state {
            DialogState::Open { prior_focus, .. } => *prior_focus,
            DialogState::Closed => None,
        }
    }

    pub fn state(&self) -> &DialogState<P::Content> {
        &self.state
    }

    /// Whether the surface was found at construction.
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<ElementId> {
        self.surface
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Number of content actions bound by the current render.
    pub fn bound_action_count(&self) -> usize {
        self.bound.len()
    }

    pub fn bound_actions(&self) -> &[BoundAction] {
        &self.bound
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }
}

/// `start` and its ancestors up to and including `stop`.
fn ancestors_within(
    doc: &Document,
    start: ElementId,
    stop: ElementId,
) -> impl Iterator<Item = ElementId> + '_ {
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current == stop {
            None
        } else {
            doc.parent(current)
        };
        Some(current)
    })
}
