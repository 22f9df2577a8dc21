#![forbid(unsafe_code)]

//! Render capabilities for dialog surfaces.
//!
//! A [`Presenter`] turns a typed payload into elements inside an overlay and
//! removes them again. The engine never builds markup itself.

use vestry_content::block::{Block, ContentAction, ImagePayload, Inline, RichText, TextPayload};
use vestry_core::dom::{Document, ElementId, ElementKind};

/// An interactive element created by a render, and what activating it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundAction {
    pub element: ElementId,
    pub action: ContentAction,
}

/// Render capability a [`DialogEngine`](super::DialogEngine) is generic over.
pub trait Presenter {
    /// Payload shown by this surface.
    type Content: Clone;

    /// Locate the presenter's elements inside `root`.
    ///
    /// Returns `false` when required elements are missing; the engine then
    /// stays detached.
    fn mount(&mut self, doc: &Document, root: ElementId) -> bool;

    /// Show `content`, returning the interactive actions it created.
    ///
    /// Called only after [`clear`](Self::clear), so implementations may
    /// assume an empty surface.
    fn render(&mut self, doc: &mut Document, content: &Self::Content) -> Vec<BoundAction>;

    /// Remove everything a previous render produced.
    fn clear(&mut self, doc: &mut Document);

    /// Live-region message announced when `content` opens.
    fn announcement(&self, content: &Self::Content) -> String;
}

fn find_by_dom_id(doc: &Document, root: ElementId, dom_id: &str) -> Option<ElementId> {
    doc.find(root, |d, id| d.attribute(id, "id") == Some(dom_id))
}

// ---------------------------------------------------------------------------
// TextPanel
// ---------------------------------------------------------------------------

/// Title + structured body presenter for the content dialog.
#[derive(Debug, Clone)]
pub struct TextPanel {
    title_id: String,
    body_id: String,
    title: Option<ElementId>,
    body: Option<ElementId>,
}

impl Default for TextPanel {
    fn default() -> Self {
        Self::new("modalTitle", "modalBody")
    }
}

impl TextPanel {
    #[must_use]
    pub fn new(title_id: impl Into<String>, body_id: impl Into<String>) -> Self {
        Self {
            title_id: title_id.into(),
            body_id: body_id.into(),
            title: None,
            body: None,
        }
    }

    fn append_rich_text(doc: &mut Document, parent: ElementId, text: &RichText) {
        // A single plain run becomes the parent's own text.
        if let [Inline::Text(plain)] = text.0.as_slice() {
            doc.set_text(parent, plain.as_str());
            return;
        }
        for run in &text.0 {
            let kind = match run {
                Inline::Text(_) => ElementKind::Span,
                Inline::Strong(_) => ElementKind::Strong,
                Inline::Emphasis(_) => ElementKind::Emphasis,
            };
            let el = doc.append_new(parent, kind);
            doc.set_text(el, run.as_str());
        }
    }

    fn append_block(doc: &mut Document, body: ElementId, block: &Block) -> Option<BoundAction> {
        match block {
            Block::Paragraph { text } => {
                let p = doc.append_new(body, ElementKind::Paragraph);
                Self::append_rich_text(doc, p, text);
                None
            }
            Block::Note { text } => {
                let p = doc.append_new(body, ElementKind::Paragraph);
                doc.add_class(p, "small");
                doc.add_class(p, "muted-text");
                Self::append_rich_text(doc, p, text);
                None
            }
            Block::Links { items } => {
                let list = doc.append_new(body, ElementKind::List);
                for item in items {
                    let li = doc.append_new(list, ElementKind::ListItem);
                    let a = doc.append_new(li, ElementKind::Link);
                    doc.set_attribute(a, "href", item.href.as_str());
                    doc.set_attribute(a, "target", "_blank");
                    doc.set_attribute(a, "rel", "noopener");
                    doc.set_text(a, item.label.as_str());
                }
                None
            }
            Block::Bullets { items } => {
                let list = doc.append_new(body, ElementKind::List);
                for item in items {
                    let li = doc.append_new(list, ElementKind::ListItem);
                    Self::append_rich_text(doc, li, item);
                }
                None
            }
            Block::Copyable { id, text, button } => {
                let row = doc.append_new(body, ElementKind::Container);
                doc.add_class(row, "copy-row");
                let code = doc.append_new(row, ElementKind::Code);
                doc.set_attribute(code, "id", id.as_str());
                doc.set_text(code, text.as_str());
                let btn = doc.append_new(row, ElementKind::Button);
                doc.set_attribute(btn, "type", "button");
                doc.set_attribute(btn, "data-action", "copy");
                doc.set_attribute(btn, "data-copy-source", id.as_str());
                for class in ["btn", "btn-primary", "btn-small"] {
                    doc.add_class(btn, class);
                }
                doc.set_text(btn, button.as_str());
                block.action().map(|action| BoundAction {
                    element: btn,
                    action,
                })
            }
        }
    }
}

impl Presenter for TextPanel {
    type Content = TextPayload;

    fn mount(&mut self, doc: &Document, root: ElementId) -> bool {
        self.title = find_by_dom_id(doc, root, &self.title_id);
        self.body = find_by_dom_id(doc, root, &self.body_id);
        self.title.is_some() && self.body.is_some()
    }

    fn render(&mut self, doc: &mut Document, content: &TextPayload) -> Vec<BoundAction> {
        let (Some(title), Some(body)) = (self.title, self.body) else {
            return Vec::new();
        };
        doc.set_text(title, content.title.as_str());
        content
            .body
            .iter()
            .filter_map(|block| Self::append_block(doc, body, block))
            .collect()
    }

    fn clear(&mut self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.set_text(title, "");
        }
        if let Some(body) = self.body {
            // Rendered blocks are owned by the panel; free them.
            doc.discard_children(body);
            doc.set_text(body, "");
        }
    }

    fn announcement(&self, content: &TextPayload) -> String {
        format!("{} dialog opened", content.title)
    }
}

// ---------------------------------------------------------------------------
// ImagePanel
// ---------------------------------------------------------------------------

/// Alt text used when a gallery image has no caption.
pub const DEFAULT_ALT: &str = "Gallery image";

/// Single image + caption presenter for the lightbox.
#[derive(Debug, Clone)]
pub struct ImagePanel {
    image_id: String,
    caption_id: String,
    image: Option<ElementId>,
    caption: Option<ElementId>,
}

impl Default for ImagePanel {
    fn default() -> Self {
        Self::new("lightboxImg", "lightboxCaption")
    }
}

impl ImagePanel {
    #[must_use]
    pub fn new(image_id: impl Into<String>, caption_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            caption_id: caption_id.into(),
            image: None,
            caption: None,
        }
    }
}

impl Presenter for ImagePanel {
    type Content = ImagePayload;

    fn mount(&mut self, doc: &Document, root: ElementId) -> bool {
        self.image = find_by_dom_id(doc, root, &self.image_id);
        self.caption = find_by_dom_id(doc, root, &self.caption_id);
        self.image.is_some() && self.caption.is_some()
    }

    fn render(&mut self, doc: &mut Document, content: &ImagePayload) -> Vec<BoundAction> {
        if let Some(image) = self.image {
            // An empty source stays empty; there is nothing to fail on.
            doc.set_attribute(image, "src", content.source.as_str());
            let alt = if content.caption.is_empty() {
                DEFAULT_ALT
            } else {
                content.caption.as_str()
            };
            doc.set_attribute(image, "alt", alt);
        }
        if let Some(caption) = self.caption {
            doc.set_text(caption, content.caption.as_str());
        }
        Vec::new()
    }

    fn clear(&mut self, doc: &mut Document) {
        if let Some(image) = self.image {
            doc.set_attribute(image, "src", "");
            doc.set_attribute(image, "alt", "");
        }
        if let Some(caption) = self.caption {
            doc.set_text(caption, "");
        }
    }

    fn announcement(&self, content: &ImagePayload) -> String {
        if content.caption.is_empty() {
            format!("{DEFAULT_ALT} opened")
        } else {
            format!("Image opened: {}", content.caption)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_content::block::LinkItem;

    fn text_surface() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.append_new(doc.root(), ElementKind::Container);
        let title = doc.append_new(root, ElementKind::Heading);
        doc.set_attribute(title, "id", "modalTitle");
        let body = doc.append_new(root, ElementKind::Container);
        doc.set_attribute(body, "id", "modalBody");
        (doc, root, title, body)
    }

    #[test]
    fn text_panel_requires_both_elements() {
        let mut doc = Document::new();
        let root = doc.append_new(doc.root(), ElementKind::Container);
        let title = doc.append_new(root, ElementKind::Heading);
        doc.set_attribute(title, "id", "modalTitle");
        assert!(!TextPanel::default().mount(&doc, root));
    }

    #[test]
    fn renders_title_and_blocks() {
        let (mut doc, root, title, body) = text_surface();
        let mut panel = TextPanel::default();
        assert!(panel.mount(&doc, root));
        let payload = TextPayload::new(
            "More Sermons",
            vec![
                Block::paragraph("Watch past messages."),
                Block::Links {
                    items: vec![LinkItem {
                        label: "YouTube Sermons Playlist".into(),
                        href: "https://www.youtube.com/".into(),
                    }],
                },
            ],
        );
        let bound = panel.render(&mut doc, &payload);
        assert!(bound.is_empty());
        assert_eq!(doc.text(title), "More Sermons");
        assert_eq!(doc.children(body).len(), 2);
        let link = doc.find(body, |d, id| d.kind(id) == Some(ElementKind::Link)).unwrap();
        assert_eq!(doc.attribute(link, "target"), Some("_blank"));
        assert_eq!(doc.attribute(link, "rel"), Some("noopener"));
        assert_eq!(doc.text(link), "YouTube Sermons Playlist");
    }

    #[test]
    fn inline_runs_become_styled_children() {
        let (mut doc, root, _, body) = text_surface();
        let mut panel = TextPanel::default();
        panel.mount(&doc, root);
        let payload = TextPayload::new(
            "Kids",
            vec![Block::Paragraph {
                text: RichText(vec![
                    Inline::Strong("Safe.".into()),
                    Inline::Text(" Joyful.".into()),
                ]),
            }],
        );
        panel.render(&mut doc, &payload);
        let p = doc.children(body)[0];
        let kinds: Vec<_> = doc.children(p).iter().map(|&c| doc.kind(c)).collect();
        assert_eq!(kinds, vec![Some(ElementKind::Strong), Some(ElementKind::Span)]);
        assert_eq!(doc.text_content(p), "Safe. Joyful.");
    }

    #[test]
    fn copyable_binds_one_action() {
        let (mut doc, root, _, body) = text_surface();
        let mut panel = TextPanel::default();
        panel.mount(&doc, root);
        let payload = TextPayload::new(
            "Give via UPI",
            vec![Block::Copyable {
                id: "upiId".into(),
                text: "yourchurch@upi".into(),
                button: "Copy UPI ID".into(),
            }],
        );
        let bound = panel.render(&mut doc, &payload);
        assert_eq!(bound.len(), 1);
        assert_eq!(
            bound[0].action,
            ContentAction::CopyText {
                source: "upiId".into()
            }
        );
        assert_eq!(doc.text(bound[0].element), "Copy UPI ID");
        let code = doc.element_by_id("upiId").unwrap();
        assert!(doc.contains(body, code));
        assert_eq!(doc.text(code), "yourchurch@upi");
    }

    #[test]
    fn clear_removes_rendered_content() {
        let (mut doc, root, title, body) = text_surface();
        let mut panel = TextPanel::default();
        panel.mount(&doc, root);
        panel.render(&mut doc, &TextPayload::new("T", vec![Block::paragraph("x")]));
        panel.clear(&mut doc);
        assert_eq!(doc.text(title), "");
        assert!(doc.children(body).is_empty());
        assert_eq!(doc.text_content(body), "");
    }

    #[test]
    fn image_panel_defaults_alt_and_tolerates_empty_source() {
        let mut doc = Document::new();
        let root = doc.append_new(doc.root(), ElementKind::Container);
        let img = doc.append_new(root, ElementKind::Image);
        doc.set_attribute(img, "id", "lightboxImg");
        let caption = doc.append_new(root, ElementKind::Paragraph);
        doc.set_attribute(caption, "id", "lightboxCaption");

        let mut panel = ImagePanel::default();
        assert!(panel.mount(&doc, root));
        panel.render(&mut doc, &ImagePayload::new("", ""));
        assert_eq!(doc.attribute(img, "src"), Some(""));
        assert_eq!(doc.attribute(img, "alt"), Some(DEFAULT_ALT));
        assert_eq!(doc.text(caption), "");

        panel.clear(&mut doc);
        panel.render(&mut doc, &ImagePayload::new("img/gallery1.jpg", "Sunday service"));
        assert_eq!(doc.attribute(img, "src"), Some("img/gallery1.jpg"));
        assert_eq!(doc.attribute(img, "alt"), Some("Sunday service"));
        assert_eq!(doc.text(caption), "Sunday service");
        assert_eq!(
            panel.announcement(&ImagePayload::new("x", "Sunday service")),
            "Image opened: Sunday service"
        );
    }
}
