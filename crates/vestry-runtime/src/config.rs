#![forbid(unsafe_code)]

//! Site configuration.
//!
//! One TOML document carries every author-editable value: feature
//! thresholds, the church contact address, calendar events, and the dialog
//! content registries. [`SiteConfig::builtin`] parses the embedded default
//! (`assets/site.toml`); [`SiteConfig::load`] reads a file from disk.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Unreadable file | [`ConfigError::Io`] |
//! | Syntax or schema error | [`ConfigError::Parse`] |
//! | Empty content title/key | [`ConfigError::Content`] |
//! | Event ending before it starts | [`ConfigError::InvalidEvent`] |
//! | Threshold outside `[0, 1]`, zero duration, bad address | [`ConfigError::Invalid`] |

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;
use vestry_content::registry::{ContentError, RegistrySet, RegistryTables};
use vestry_widgets::calendar::{CalendarEvent, IcsExport};
use vestry_widgets::scroll::{DEFAULT_REVEAL_THRESHOLD, DEFAULT_STICKY_THRESHOLD};

const BUILTIN: &str = include_str!("../assets/site.toml");

/// Errors from loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
    Content(ContentError),
    InvalidEvent { key: String, reason: String },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Content(err) => write!(f, "invalid content: {err}"),
            Self::InvalidEvent { key, reason } => write!(f, "calendar event '{key}': {reason}"),
            Self::Invalid { field, reason } => write!(f, "{field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContentError> for ConfigError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub sticky_threshold: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            sticky_threshold: DEFAULT_STICKY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 2800 }
    }
}

impl ToastConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub church_email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            church_email: "hello@yourchurch.org".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub organizer: String,
    pub domain: String,
    pub events: BTreeMap<String, CalendarEvent>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            organizer: "Grace Community Church".into(),
            domain: "yourchurch.local".into(),
            events: BTreeMap::new(),
        }
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn export(&self) -> IcsExport {
        IcsExport::new(self.organizer.clone(), self.domain.clone())
    }
}

/// Dialog surface options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Element id of a live region for open announcements.
    pub live_region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiteFile {
    header: HeaderConfig,
    reveal: RevealConfig,
    toast: ToastConfig,
    contact: ContactConfig,
    calendar: CalendarConfig,
    dialog: DialogConfig,
    content: RegistryTables,
}

/// Validated site configuration.
///
/// `Default` has no calendar events and empty registries.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    pub header: HeaderConfig,
    pub reveal: RevealConfig,
    pub toast: ToastConfig,
    pub contact: ContactConfig,
    pub calendar: CalendarConfig,
    pub dialog: DialogConfig,
    pub content: RegistrySet,
}

impl SiteConfig {
    /// The embedded default site.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let file: SiteFile = toml::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&src)?;
        tracing::info!(
            path = %path.display(),
            events = config.calendar.events.len(),
            "loaded site configuration"
        );
        Ok(config)
    }

    fn from_file(file: SiteFile) -> Result<Self, ConfigError> {
        let threshold = file.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                field: "reveal.threshold",
                reason: format!("{threshold} is outside [0, 1]"),
            });
        }
        if !file.header.sticky_threshold.is_finite() || file.header.sticky_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "header.sticky_threshold",
                reason: "must be a non-negative number".into(),
            });
        }
        if file.toast.duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "toast.duration_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if file.contact.church_email.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "contact.church_email",
                reason: "must not be empty".into(),
            });
        }
        Url::parse(&format!("mailto:{}", file.contact.church_email)).map_err(|e| {
            ConfigError::Invalid {
                field: "contact.church_email",
                reason: e.to_string(),
            }
        })?;
        for (key, event) in &file.calendar.events {
            event.validate().map_err(|e| ConfigError::InvalidEvent {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(Self {
            header: file.header,
            reveal: file.reveal,
            toast: file.toast,
            contact: file.contact,
            calendar: file.calendar,
            dialog: file.dialog,
            content: RegistrySet::from_tables(file.content)?,
        })
    }
}
