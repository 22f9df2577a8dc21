#![forbid(unsafe_code)]

//! Immutable content registries.
//!
//! # Invariants
//!
//! 1. **Read-only after construction**: a [`ContentRegistry`] exposes no
//!    mutation once built; resolved entries are borrowed, and callers copy
//!    payloads out by value.
//! 2. **Total lookup**: [`ContentRegistry::resolve`] returns `Some` for every
//!    configured key and `None` for everything else. It never panics.
//! 3. **Non-empty entries**: every stored entry has a non-empty key and a
//!    non-empty title.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Trigger references an undefined entry | `resolve` returns `None`; callers do nothing |
//! | Empty key/title | Authoring mistake | Construction fails with [`ContentError`] |
//! | Duplicate key | Builder inserts a key twice | Construction fails with [`ContentError::DuplicateKey`] |
//! | Bad TOML | Syntax or schema error | [`ContentError::Parse`] |

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::block::{Block, TextPayload};

/// Which logical registry a trigger addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// Named entities (ministries), selected by the entity-mode flag.
    Entity,
    /// Flat topics (sermons, giving). The default mode.
    Topic,
}

impl RegistryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Topic => "topic",
        }
    }
}

/// Errors from registry construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// An entry was declared with an empty key.
    EmptyKey { kind: RegistryKind },
    /// An entry has an empty title.
    EmptyTitle { kind: RegistryKind, key: String },
    /// The same key was inserted twice into one registry.
    DuplicateKey { kind: RegistryKind, key: String },
    /// The configuration could not be parsed.
    Parse(String),
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey { kind } => write!(f, "empty key in {} registry", kind.as_str()),
            Self::EmptyTitle { kind, key } => {
                write!(f, "{} entry '{key}' has an empty title", kind.as_str())
            }
            Self::DuplicateKey { kind, key } => {
                write!(f, "duplicate key '{key}' in {} registry", kind.as_str())
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {}

/// One immutable registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub key: String,
    pub title: String,
    pub body: Vec<Block>,
}

impl ContentEntry {
    /// Copy this entry's content out as a dialog payload.
    #[must_use]
    pub fn payload(&self) -> TextPayload {
        TextPayload::new(self.title.clone(), self.body.clone())
    }
}

/// Entry as written in configuration (key comes from the table name).
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDef {
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
}

/// Key → entry table for one registry kind.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    kind: RegistryKind,
    entries: HashMap<String, ContentEntry>,
}

impl ContentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Build a registry from `(key, title, body)` triples.
    pub fn from_entries<I, K, T>(kind: RegistryKind, entries: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = (K, T, Vec<Block>)>,
        K: Into<String>,
        T: Into<String>,
    {
        let mut registry = Self::new(kind);
        for (key, title, body) in entries {
            registry.insert(key.into(), title.into(), body)?;
        }
        Ok(registry)
    }

    fn from_defs(kind: RegistryKind, defs: BTreeMap<String, EntryDef>) -> Result<Self, ContentError> {
        Self::from_entries(kind, defs.into_iter().map(|(k, d)| (k, d.title, d.body)))
    }

    fn insert(&mut self, key: String, title: String, body: Vec<Block>) -> Result<(), ContentError> {
        if key.trim().is_empty() {
            return Err(ContentError::EmptyKey { kind: self.kind });
        }
        if title.trim().is_empty() {
            return Err(ContentError::EmptyTitle {
                kind: self.kind,
                key,
            });
        }
        if self.entries.contains_key(&key) {
            return Err(ContentError::DuplicateKey {
                kind: self.kind,
                key,
            });
        }
        self.entries
            .insert(key.clone(), ContentEntry { key, title, body });
        Ok(())
    }

    /// Look up `key`. Missing keys are not an error.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&ContentEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Configured keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry tables as written in configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryTables {
    #[serde(default)]
    pub entities: BTreeMap<String, EntryDef>,
    #[serde(default)]
    pub topics: BTreeMap<String, EntryDef>,
}

/// The entity and topic registries behind one lookup capability.
#[derive(Debug, Clone)]
pub struct RegistrySet {
    entities: ContentRegistry,
    topics: ContentRegistry,
}

impl Default for RegistrySet {
    fn default() -> Self {
        Self::new(
            ContentRegistry::new(RegistryKind::Entity),
            ContentRegistry::new(RegistryKind::Topic),
        )
    }
}

impl RegistrySet {
    /// Combine two registries.
    #[must_use]
    pub fn new(entities: ContentRegistry, topics: ContentRegistry) -> Self {
        Self { entities, topics }
    }

    /// Build from parsed configuration tables.
    pub fn from_tables(tables: RegistryTables) -> Result<Self, ContentError> {
        Ok(Self::new(
            ContentRegistry::from_defs(RegistryKind::Entity, tables.entities)?,
            ContentRegistry::from_defs(RegistryKind::Topic, tables.topics)?,
        ))
    }

    /// Parse a TOML document with `[entities.<key>]` and `[topics.<key>]` tables.
    pub fn from_toml_str(src: &str) -> Result<Self, ContentError> {
        let tables: RegistryTables =
            toml::from_str(src).map_err(|e| ContentError::Parse(e.to_string()))?;
        Self::from_tables(tables)
    }

    /// Resolve `key` in the registry selected by `kind`.
    #[must_use]
    pub fn resolve(&self, kind: RegistryKind, key: &str) -> Option<&ContentEntry> {
        self.registry(kind).resolve(key)
    }

    #[must_use]
    pub fn registry(&self, kind: RegistryKind) -> &ContentRegistry {
        match kind {
            RegistryKind::Entity => &self.entities,
            RegistryKind::Topic => &self.topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"
        [entities.kids]
        title = "Kids Ministry"
        body = [{ kind = "paragraph", text = "Safe, joyful, and age-appropriate." }]

        [entities.youth]
        title = "Youth Ministry"

        [topics.sermons]
        title = "More Sermons"
        body = [{ kind = "links", items = [{ label = "YouTube Sermons Playlist", href = "https://www.youtube.com/" }] }]
    "#;

    fn sample() -> RegistrySet {
        RegistrySet::from_toml_str(SAMPLE).unwrap()
    }

    #[test]
    fn resolves_by_kind() {
        let set = sample();
        assert_eq!(
            set.resolve(RegistryKind::Entity, "kids").map(|e| e.title.as_str()),
            Some("Kids Ministry")
        );
        assert_eq!(
            set.resolve(RegistryKind::Topic, "sermons").map(|e| e.title.as_str()),
            Some("More Sermons")
        );
    }

    #[test]
    fn registries_are_separate() {
        let set = sample();
        assert!(set.resolve(RegistryKind::Topic, "kids").is_none());
        assert!(set.resolve(RegistryKind::Entity, "sermons").is_none());
    }

    #[test]
    fn missing_key_returns_none() {
        let set = sample();
        assert!(set.resolve(RegistryKind::Entity, "choir").is_none());
        assert!(set.resolve(RegistryKind::Topic, "").is_none());
    }

    #[test]
    fn body_defaults_to_empty() {
        let set = sample();
        let youth = set.resolve(RegistryKind::Entity, "youth").unwrap();
        assert!(youth.body.is_empty());
    }

    #[test]
    fn payload_is_a_copy() {
        let set = sample();
        let entry = set.resolve(RegistryKind::Entity, "kids").unwrap();
        let mut payload = entry.payload();
        payload.title.push_str(" (edited)");
        assert_eq!(entry.title, "Kids Ministry");
    }

    #[test]
    fn keys_are_sorted() {
        let set = sample();
        assert_eq!(set.registry(RegistryKind::Entity).keys(), vec!["kids", "youth"]);
        assert_eq!(set.registry(RegistryKind::Topic).len(), 1);
    }

    #[test]
    fn empty_title_rejected() {
        let err = RegistrySet::from_toml_str("[topics.blank]\ntitle = \"  \"\n").unwrap_err();
        assert_eq!(
            err,
            ContentError::EmptyTitle {
                kind: RegistryKind::Topic,
                key: "blank".into()
            }
        );
    }

    #[test]
    fn empty_key_rejected() {
        let err = RegistrySet::from_toml_str("[entities.\"\"]\ntitle = \"x\"\n").unwrap_err();
        assert_eq!(
            err,
            ContentError::EmptyKey {
                kind: RegistryKind::Entity
            }
        );
    }

    #[test]
    fn duplicate_key_rejected_by_builder() {
        let err = ContentRegistry::from_entries(
            RegistryKind::Topic,
            vec![("a", "A", Vec::new()), ("a", "Again", Vec::new())],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::DuplicateKey {
                kind: RegistryKind::Topic,
                key: "a".into()
            }
        );
        assert_eq!(err.to_string(), "duplicate key 'a' in topic registry");
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = RegistrySet::from_toml_str("[topics.x\n").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[test]
    fn empty_set_resolves_nothing() {
        let set = RegistrySet::default();
        assert!(set.resolve(RegistryKind::Topic, "sermons").is_none());
        assert!(set.registry(RegistryKind::Entity).is_empty());
    }

    proptest! {
        #[test]
        fn resolve_is_total_over_configured_keys(
            keys in proptest::collection::btree_set("[a-z][a-z0-9-]{0,11}", 1..16),
            lookup in "[a-z]{1,12}",
        ) {
            let registry = ContentRegistry::from_entries(
                RegistryKind::Topic,
                keys.iter().map(|k| (k.clone(), format!("Title {k}"), Vec::new())),
            ).unwrap();
            for key in &keys {
                let entry = registry.resolve(key);
                prop_assert!(entry.is_some());
                prop_assert_eq!(entry.map(|e| e.title.clone()), Some(format!("Title {key}")));
            }
            prop_assert_eq!(registry.resolve(&lookup).is_some(), keys.contains(&lookup));
        }
    }
}
