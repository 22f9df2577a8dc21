#![forbid(unsafe_code)]

//! Prayer request form validation.
//!
//! Validates `#prayerForm` on submit, writes per-field messages into
//! `[data-error-for=<field>]` elements, and on success produces a
//! [`PrayerRequest`] that can be turned into a `mailto:` draft. Nothing is
//! sent anywhere.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use url::form_urlencoded::byte_serialize;
use vestry_core::dom::{Document, ElementId};

// Literal patterns; a build failure would reject every value, so tests assert
// both compile.
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[+()\-0-9\s]{7,}$").ok());

fn pattern_matches(re: &LazyLock<Option<Regex>>, s: &str) -> bool {
    (**re).as_ref().is_some_and(|re| re.is_match(s))
}

/// Whether `s` looks like an email address.
#[must_use]
pub fn is_email(s: &str) -> bool {
    pattern_matches(&EMAIL, s)
}

/// Whether `s` looks like a phone number: 7+ digits, spaces, `+()-`.
#[must_use]
pub fn is_phone(s: &str) -> bool {
    pattern_matches(&PHONE, s)
}

/// Form fields, named as in their `data-error-for` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Contact,
    Message,
    Consent,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Contact, Self::Message, Self::Consent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Contact => "contact",
            Self::Message => "message",
            Self::Consent => "consent",
        }
    }

    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::Name => "Please enter your name.",
            Self::Contact => "Please enter a valid email or phone number (or leave it blank).",
            Self::Message => "Please share a prayer request.",
            Self::Consent => "Please confirm consent.",
        }
    }
}

/// One failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
}

impl FieldError {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.field.error_message()
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerRequest {
    pub name: String,
    /// Empty when not given.
    pub contact: String,
    pub message: String,
}

impl PrayerRequest {
    pub fn subject(&self) -> String {
        format!("Prayer Request from {}", self.name)
    }

    pub fn body(&self) -> String {
        let contact = if self.contact.is_empty() {
            "—"
        } else {
            self.contact.as_str()
        };
        format!(
            "Name: {}\nContact: {contact}\n\nPrayer Request:\n{}\n\nConsent: Yes",
            self.name, self.message
        )
    }

    /// `mailto:` draft addressed to `to`.
    pub fn mailto(&self, to: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("mailto:{to}"))?;
        let query = format!(
            "subject={}&body={}",
            encode_component(&self.subject()),
            encode_component(&self.body())
        );
        url.set_query(Some(&query));
        Ok(url)
    }
}

/// Percent-encode like a URI component (spaces as `%20`, not `+`).
fn encode_component(s: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so every '+' left is a space.
    byte_serialize(s.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Outcome of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted(PrayerRequest),
    Rejected(Vec<FieldError>),
}

/// Check raw field values. Values are trimmed first.
pub fn validate(name: &str, contact: &str, message: &str, consent: bool) -> Submission {
    let (name, contact, message) = (name.trim(), contact.trim(), message.trim());
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError { field: Field::Name });
    }
    if message.is_empty() {
        errors.push(FieldError {
            field: Field::Message,
        });
    }
    if !consent {
        errors.push(FieldError {
            field: Field::Consent,
        });
    }
    if !contact.is_empty() && !is_email(contact) && !is_phone(contact) {
        errors.push(FieldError {
            field: Field::Contact,
        });
    }
    if errors.is_empty() {
        Submission::Accepted(PrayerRequest {
            name: name.to_owned(),
            contact: contact.to_owned(),
            message: message.to_owned(),
        })
    } else {
        Submission::Rejected(errors)
    }
}

/// The `#prayerForm` element and its inputs.
#[derive(Debug, Clone)]
pub struct PrayerForm {
    form: Option<ElementId>,
    name: Option<ElementId>,
    contact: Option<ElementId>,
    message: Option<ElementId>,
    consent: Option<ElementId>,
}

impl PrayerForm {
    pub fn new(doc: &Document, form_id: &str) -> Self {
        Self {
            form: doc.element_by_id(form_id),
            name: doc.element_by_id("name"),
            contact: doc.element_by_id("contact"),
            message: doc.element_by_id("message"),
            consent: doc.element_by_id("consent"),
        }
    }

    #[must_use]
    pub fn is_form(&self, target: ElementId) -> bool {
        self.form == Some(target)
    }

    fn input(&self, field: Field) -> Option<ElementId> {
        match field {
            Field::Name => self.name,
            Field::Contact => self.contact,
            Field::Message => self.message,
            Field::Consent => self.consent,
        }
    }

    fn error_slot(&self, doc: &Document, field: Field) -> Option<ElementId> {
        let form = self.form?;
        doc.find(form, |d, id| d.attribute(id, "data-error-for") == Some(field.as_str()))
    }

    fn value<'a>(&self, doc: &'a Document, field: Field) -> &'a str {
        self.input(field).map_or("", |id| doc.value(id))
    }

    /// Validate the current values and update error slots.
    ///
    /// Accepted submissions reset the form. Returns `None` when the form is
    /// absent.
    pub fn submit(&self, doc: &mut Document) -> Option<Submission> {
        self.form?;
        for field in Field::ALL {
            if let Some(slot) = self.error_slot(doc, field) {
                doc.set_text(slot, "");
            }
        }

        let consent = self.consent.is_some_and(|id| doc.is_checked(id));
        let outcome = validate(
            self.value(doc, Field::Name),
            self.value(doc, Field::Contact),
            self.value(doc, Field::Message),
            consent,
        );

        match &outcome {
            Submission::Rejected(errors) => {
                for error in errors {
                    if let Some(slot) = self.error_slot(doc, error.field) {
                        doc.set_text(slot, error.message());
                    }
                }
            }
            Submission::Accepted(_) => self.reset(doc),
        }
        Some(outcome)
    }

    /// Clear every input.
    pub fn reset(&self, doc: &mut Document) {
        for field in [Field::Name, Field::Contact, Field::Message] {
            if let Some(id) = self.input(field) {
                doc.set_value(id, "");
            }
        }
        if let Some(id) = self.consent {
            doc.set_checked(id, false);
        }
    }
}
