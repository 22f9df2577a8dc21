#![forbid(unsafe_code)]

//! The page: one document, two dialog engines, and the page features.
//!
//! # Dispatch order
//!
//! [`Page::dispatch`] routes each event through three stages:
//!
//! 1. the listener hub, where each dialog engine reacts only if it is open;
//! 2. if nothing there consumed the event, the trigger binder and the page
//!    features;
//! 3. an unconsumed Tab press gets default sequential focus navigation.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Surface markup missing | Engine detached; triggers for it do nothing |
//! | Unknown content or calendar key | Logged at `debug`; nothing happens |
//! | Clipboard refused | Logged at `warn`; fallback toast; dialog stays open |
//! | Preference store refused | Logged at `warn`; theme still switches |

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use chrono::Datelike;
use url::Url;
use vestry_content::block::{ContentAction, ImagePayload};
use vestry_content::registry::{RegistryKind, RegistrySet};
use vestry_core::dom::{Document, ElementId};
use vestry_core::event::{Event, KeyCode};
use vestry_widgets::calendar::{ICS_MIME, IcsExport};
use vestry_widgets::filter::EventFilter;
use vestry_widgets::modal::{DialogAction, DialogEngine, ImagePanel, SurfaceConfig, TextPanel};
use vestry_widgets::prayer_form::{PrayerForm, Submission};
use vestry_widgets::scroll::{RevealTracker, StickyHeader, jump_target};
use vestry_widgets::theme::{Theme, ThemeToggle};
use vestry_widgets::toast::Toast;

use crate::capabilities::Capabilities;
use crate::config::SiteConfig;
use crate::effect::{Effect, PageOutcome};
use crate::listeners::{ListenerHub, ListenerKind, ListenerScope};
use crate::triggers::{Trigger, TriggerBinder, gallery_caption};

/// Preference key for the persisted theme.
pub const THEME_PREFERENCE: &str = "theme";

pub const MSG_CALENDAR: &str = "Calendar file downloaded.";
pub const MSG_FORM_INVALID: &str = "Please fix the highlighted fields.";
pub const MSG_FORM_SENT: &str = "Thank you — we received your request.";
pub const MSG_COPIED: &str = "UPI ID copied!";
pub const MSG_COPY_FAILED: &str = "Copy failed. Please copy manually.";

type Shared<T> = Rc<RefCell<T>>;

/// A wired page.
pub struct Page {
    doc: Document,
    config: SiteConfig,
    capabilities: Capabilities,
    dialog: Shared<DialogEngine<TextPanel>>,
    lightbox: Shared<DialogEngine<ImagePanel>>,
    hub: ListenerHub,
    listeners: ListenerScope,
    binder: TriggerBinder,
    toast: Toast,
    theme: ThemeToggle,
    filter: EventFilter,
    form: PrayerForm,
    header: StickyHeader,
    reveal: RevealTracker,
    export: IcsExport,
    mail_draft: Option<Url>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("dialog_open", &self.dialog.borrow().is_open())
            .field("lightbox_open", &self.lightbox.borrow().is_open())
            .field("listeners", &self.hub.len())
            .field("triggers", &self.binder.len())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Wire `document` according to `config`.
    pub fn new(mut document: Document, config: SiteConfig, capabilities: Capabilities) -> Self {
        let doc = &mut document;

        let mut dialog_surface = SurfaceConfig::dialog();
        let mut lightbox_surface = SurfaceConfig::lightbox();
        if let Some(region) = &config.dialog.live_region {
            dialog_surface = dialog_surface.live_region(region.clone());
            lightbox_surface = lightbox_surface.live_region(region.clone());
        }
        let dialog = Rc::new(RefCell::new(DialogEngine::new(
            doc,
            dialog_surface,
            TextPanel::default(),
        )));
        let lightbox = Rc::new(RefCell::new(DialogEngine::new(
            doc,
            lightbox_surface,
            ImagePanel::default(),
        )));

        let mut hub = ListenerHub::new();
        let mut listeners = ListenerScope::new();
        register_engine(&mut hub, &mut listeners, &dialog);
        register_engine(&mut hub, &mut listeners, &lightbox);

        let header = StickyHeader::new(doc, "miniHeader", config.header.sticky_threshold);
        header.update(doc, 0.0);

        let theme = ThemeToggle::new(doc, "themeToggle");
        if theme.button().is_some() {
            let saved = capabilities.preferences.get(THEME_PREFERENCE);
            if Theme::from_preference(saved.as_deref()) == Theme::Dark {
                theme.apply(doc, Theme::Dark);
            }
        }

        if let Some(year) = doc.element_by_id("year") {
            doc.set_text(year, capabilities.clock.utc().year().to_string());
        }

        let page = Self {
            binder: TriggerBinder::scan(doc),
            toast: Toast::new(doc, "toast").with_duration(config.toast.duration()),
            filter: EventFilter::scan(doc),
            form: PrayerForm::new(doc, "prayerForm"),
            reveal: RevealTracker::scan(doc, config.reveal.threshold),
            export: config.calendar.export(),
            header,
            theme,
            dialog,
            lightbox,
            hub,
            listeners,
            config,
            capabilities,
            mail_draft: None,
            doc: document,
        };

        tracing::info!(
            dialog_attached = page.dialog.borrow().is_attached(),
            lightbox_attached = page.lightbox.borrow().is_attached(),
            triggers = page.binder.len(),
            listeners = page.listeners.len(),
            "page wired"
        );
        page
    }

    /// Route one host event.
    pub fn dispatch(&mut self, event: &Event) -> PageOutcome {
        let mut outcome = PageOutcome::default();

        let actions = self.hub.dispatch(&mut self.doc, event);
        if !actions.is_empty() {
            outcome.prevent_default();
            for action in actions {
                if let DialogAction::Invoke(content_action) = action {
                    self.perform(content_action);
                }
            }
            return outcome;
        }

        match event {
            Event::Click { target } => self.handle_click(*target, &mut outcome),
            Event::Scroll { offset } => {
                self.header.update(&mut self.doc, *offset);
            }
            Event::Visibility { target, ratio } => {
                self.reveal.observe(&mut self.doc, *target, *ratio);
            }
            Event::Submit { target } if self.form.is_form(*target) => {
                outcome.prevent_default();
                self.submit_form();
            }
            Event::Tick(now) => {
                self.toast.tick(&mut self.doc, *now);
            }
            Event::Key(key) if key.is_press() && key.code == KeyCode::Tab => {
                self.doc.advance_focus(key.shift());
            }
            _ => {}
        }
        outcome
    }

    fn handle_click(&mut self, target: ElementId, outcome: &mut PageOutcome) {
        if self.theme.is_hit(&self.doc, target) {
            self.toggle_theme();
            return;
        }
        let Some((element, trigger)) = self.binder.resolve(&self.doc, target) else {
            return;
        };
        match trigger.clone() {
            Trigger::Dialog { kind, key } => {
                if self.open_content(kind, &key) {
                    outcome.prevent_default();
                }
            }
            Trigger::Lightbox { source } => {
                let caption = gallery_caption(&self.doc, element);
                let payload = ImagePayload::new(source, caption);
                if self.lightbox.borrow_mut().open(&mut self.doc, payload) {
                    outcome.prevent_default();
                }
            }
            Trigger::Calendar { key } => {
                if let Some(effect) = self.calendar_download(&key) {
                    outcome.push(effect);
                    self.show_toast(MSG_CALENDAR);
                }
            }
            Trigger::Jump { selector } => match jump_target(&self.doc, element) {
                Some(destination) => {
                    outcome.prevent_default();
                    outcome.push(Effect::ScrollTo(destination));
                }
                None => tracing::debug!(%selector, "jump target not found"),
            },
            Trigger::Filter { .. } => {
                self.filter.select(&mut self.doc, element);
            }
        }
    }

    /// Open the content dialog with the entry `key` from the `kind` registry.
    ///
    /// Unknown keys do nothing and return `false`.
    pub fn open_content(&mut self, kind: RegistryKind, key: &str) -> bool {
        let Some(entry) = self.config.content.resolve(kind, key) else {
            tracing::debug!(kind = kind.as_str(), key, "unresolved content key");
            return false;
        };
        let payload = entry.payload();
        self.dialog.borrow_mut().open(&mut self.doc, payload)
    }

    /// Open the lightbox directly.
    pub fn open_image(&mut self, source: &str, caption: &str) -> bool {
        self.lightbox
            .borrow_mut()
            .open(&mut self.doc, ImagePayload::new(source, caption))
    }

    /// Close whichever dialogs are open.
    pub fn close_all(&mut self) {
        self.dialog.borrow_mut().close(&mut self.doc);
        self.lightbox.borrow_mut().close(&mut self.doc);
    }

    fn perform(&mut self, action: ContentAction) {
        match action {
            ContentAction::CopyText { source } => {
                let text = self
                    .doc
                    .element_by_id(&source)
                    .map(|id| self.doc.text_content(id).trim().to_owned())
                    .unwrap_or_default();
                match self.capabilities.clipboard.write_text(&text) {
                    Ok(()) => self.show_toast(MSG_COPIED),
                    Err(err) => {
                        tracing::warn!(%err, %source, "clipboard write failed");
                        self.show_toast(MSG_COPY_FAILED);
                    }
                }
            }
        }
    }

    fn calendar_download(&self, key: &str) -> Option<Effect> {
        let Some(event) = self.config.calendar.events.get(key) else {
            tracing::debug!(key, "unknown calendar event");
            return None;
        };
        let contents = self.export.render(key, event, self.capabilities.clock.utc());
        Some(Effect::Download {
            filename: IcsExport::file_name(key),
            mime: ICS_MIME.to_owned(),
            contents,
        })
    }

    fn submit_form(&mut self) {
        match self.form.submit(&mut self.doc) {
            Some(Submission::Rejected(errors)) => {
                tracing::debug!(errors = errors.len(), "prayer form rejected");
                self.show_toast(MSG_FORM_INVALID);
            }
            Some(Submission::Accepted(request)) => {
                self.show_toast(MSG_FORM_SENT);
                match request.mailto(&self.config.contact.church_email) {
                    Ok(url) => self.mail_draft = Some(url),
                    Err(err) => tracing::warn!(%err, "could not build mail draft"),
                }
            }
            None => {}
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.theme.toggle(&mut self.doc);
        let prefs = &mut self.capabilities.preferences;
        let stored = match theme {
            Theme::Dark => prefs.set(THEME_PREFERENCE, Theme::Dark.as_str()),
            Theme::Light => prefs.remove(THEME_PREFERENCE),
        };
        if let Err(err) = stored {
            tracing::warn!(%err, theme = theme.as_str(), "theme preference not saved");
        }
        self.show_toast(theme.label());
    }

    fn show_toast(&mut self, message: &str) {
        let now = self.capabilities.clock.instant();
        self.toast.show(&mut self.doc, message, now);
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for hosts that patch markup between events.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn dialog(&self) -> Ref<'_, DialogEngine<TextPanel>> {
        self.dialog.borrow()
    }

    pub fn lightbox(&self) -> Ref<'_, DialogEngine<ImagePanel>> {
        self.lightbox.borrow()
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    /// Current toast text, if the toast is showing.
    pub fn toast_message(&self) -> Option<&str> {
        if self.toast.is_visible() {
            self.toast.message(&self.doc)
        } else {
            None
        }
    }

    pub fn registries(&self) -> &RegistrySet {
        &self.config.content
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn triggers(&self) -> &TriggerBinder {
        &self.binder
    }

    /// The `mailto:` draft built by the last accepted prayer request.
    pub fn mail_draft(&self) -> Option<&Url> {
        self.mail_draft.as_ref()
    }

    /// Live document listeners.
    pub fn listener_count(&self) -> usize {
        self.hub.len()
    }

    /// Release listeners and hand the document back.
    pub fn into_document(self) -> Document {
        self.doc
    }
}

/// Register one key and one click listener for `engine`.
fn register_engine<P>(hub: &mut ListenerHub, scope: &mut ListenerScope, engine: &Shared<DialogEngine<P>>)
where
    P: vestry_widgets::modal::Presenter + 'static,
{
    for kind in [ListenerKind::Key, ListenerKind::Click] {
        let engine = Rc::clone(engine);
        scope.hold(hub.subscribe(kind, move |doc, event| {
            engine.borrow_mut().handle_event(doc, event)
        }));
    }
}
