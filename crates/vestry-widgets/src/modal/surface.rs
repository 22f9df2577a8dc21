#![forbid(unsafe_code)]

//! Surface configuration: which markup an engine instance drives.

/// Names of the elements, attributes and classes making up one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Element id of the overlay root.
    pub root_id: String,
    /// Attribute marking close controls inside the surface.
    pub close_attr: String,
    /// Class marking the dismissible backdrop.
    pub backdrop_class: String,
    /// Class applied to the root while open.
    pub open_class: String,
    /// Element id of the live region used for announcements, if any.
    pub live_region_id: Option<String>,
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::dialog()
    }
}

impl SurfaceConfig {
    /// The content dialog (`#modal`).
    pub fn dialog() -> Self {
        Self {
            root_id: "modal".into(),
            close_attr: "data-modal-close".into(),
            backdrop_class: "modal-backdrop".into(),
            open_class: "is-open".into(),
            live_region_id: None,
            close_on_escape: true,
            close_on_backdrop: true,
        }
    }

    /// The gallery lightbox (`#lightbox`).
    pub fn lightbox() -> Self {
        Self {
            root_id: "lightbox".into(),
            close_attr: "data-lightbox-close".into(),
            backdrop_class: "lightbox-backdrop".into(),
            ..Self::dialog()
        }
    }

    pub fn root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = id.into();
        self
    }

    pub fn close_attr(mut self, attr: impl Into<String>) -> Self {
        self.close_attr = attr.into();
        self
    }

    pub fn backdrop_class(mut self, class: impl Into<String>) -> Self {
        self.backdrop_class = class.into();
        self
    }

    pub fn live_region(mut self, id: impl Into<String>) -> Self {
        self.live_region_id = Some(id.into());
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }
}
