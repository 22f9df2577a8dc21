#![forbid(unsafe_code)]

//! Structured dialog bodies and payloads.
//!
//! Bodies are lists of [`Block`]s rather than markup strings, so presenters
//! build real elements and content authors cannot inject arbitrary markup.
//!
//! In configuration files a block is a table tagged by `kind`:
//!
//! ```toml
//! body = [
//!   { kind = "paragraph", text = [{ strong = "Safe and joyful." }, { text = " Bible stories." }] },
//!   { kind = "note", text = "Plain strings work too." },
//!   { kind = "links", items = [{ label = "Playlist", href = "https://www.youtube.com/" }] },
//!   { kind = "copyable", id = "upiId", text = "yourchurch@upi", button = "Copy UPI ID" },
//! ]
//! ```

use serde::Deserialize;

/// A run of inline text with optional emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
}

impl Inline {
    /// The run's text, without styling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Strong(s) | Self::Emphasis(s) => s,
        }
    }
}

/// Inline runs making up one piece of rich text.
///
/// Deserializes from either a plain string or a list of [`Inline`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RichTextRepr")]
pub struct RichText(pub Vec<Inline>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Plain(String),
    Runs(Vec<Inline>),
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Plain(s) => Self::plain(s),
            RichTextRepr::Runs(runs) => Self(runs),
        }
    }
}

impl RichText {
    /// A single unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![Inline::Text(text.into())])
    }

    /// Concatenated text of all runs.
    #[must_use]
    pub fn to_plain(&self) -> String {
        self.0.iter().map(Inline::as_str).collect()
    }
}

/// One external link in a [`Block::Links`] list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkItem {
    pub label: String,
    pub href: String,
}

/// A block-level piece of dialog body content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Block {
    /// Body paragraph.
    Paragraph { text: RichText },
    /// Small print.
    Note { text: RichText },
    /// Bulleted list of external links (opened in a new context).
    Links { items: Vec<LinkItem> },
    /// Bulleted list of plain items.
    Bullets { items: Vec<RichText> },
    /// A code span with a button that copies its text.
    Copyable {
        id: String,
        text: String,
        button: String,
    },
}

impl Block {
    /// Convenience constructor for a plain paragraph.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: RichText::plain(text),
        }
    }

    /// Interactive action this block contributes, if any.
    #[must_use]
    pub fn action(&self) -> Option<ContentAction> {
        match self {
            Self::Copyable { id, .. } => Some(ContentAction::CopyText { source: id.clone() }),
            _ => None,
        }
    }
}

/// An action wired to an interactive element inside rendered content.
///
/// The dialog engine binds these per open and reports activations; the page
/// performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    /// Copy the trimmed text of the element whose id is `source`.
    CopyText { source: String },
}

/// Payload for the content dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextPayload {
    pub title: String,
    pub body: Vec<Block>,
}

impl TextPayload {
    #[must_use]
    pub fn new(title: impl Into<String>, body: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }
}

/// Payload for the image lightbox.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePayload {
    /// Image URL; may be empty.
    pub source: String,
    pub caption: String,
}

impl ImagePayload {
    #[must_use]
    pub fn new(source: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: caption.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        body: Vec<Block>,
    }

    #[test]
    fn blocks_deserialize_from_toml() {
        let src = r#"
            body = [
              { kind = "paragraph", text = [{ strong = "Safe." }, { text = " Joyful." }] },
              { kind = "note", text = "Small print" },
              { kind = "links", items = [{ label = "YouTube", href = "https://www.youtube.com/" }] },
              { kind = "bullets", items = ["one", [{ emphasis = "two" }]] },
              { kind = "copyable", id = "upiId", text = "yourchurch@upi", button = "Copy UPI ID" },
            ]
        "#;
        let parsed: Wrapper = toml::from_str(src).unwrap();
        assert_eq!(parsed.body.len(), 5);
        assert_eq!(
            parsed.body[0],
            Block::Paragraph {
                text: RichText(vec![
                    Inline::Strong("Safe.".into()),
                    Inline::Text(" Joyful.".into())
                ])
            }
        );
        assert_eq!(
            parsed.body[1],
            Block::Note {
                text: RichText::plain("Small print")
            }
        );
        match &parsed.body[3] {
            Block::Bullets { items } => {
                assert_eq!(items[0].to_plain(), "one");
                assert_eq!(items[1].0, vec![Inline::Emphasis("two".into())]);
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let src = r#"body = [{ kind = "iframe", src = "x" }]"#;
        assert!(toml::from_str::<Wrapper>(src).is_err());
    }

    #[test]
    fn only_copyable_blocks_carry_actions() {
        let copy = Block::Copyable {
            id: "upiId".into(),
            text: "x@upi".into(),
            button: "Copy".into(),
        };
        assert_eq!(
            copy.action(),
            Some(ContentAction::CopyText {
                source: "upiId".into()
            })
        );
        assert_eq!(Block::paragraph("hi").action(), None);
    }

    #[test]
    fn rich_text_plain_concatenates() {
        let text = RichText(vec![
            Inline::Strong("a".into()),
            Inline::Text("b".into()),
            Inline::Emphasis("c".into()),
        ]);
        assert_eq!(text.to_plain(), "abc");
    }
}
