//! Translation catalog: locale code to a tree of translated strings.
//!
//! Leaves are always strings. A pluralized entry is a tree keyed by plural
//! category names (`one`, `few`, `other`, ...). The catalog is only ever
//! changed by merging in another bundle.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a catalog bundle.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog entry {path} must be a string or an object, found {kind}")]
    InvalidLeaf { path: String, kind: &'static str },
}

/// A node in the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    Tree(BTreeMap<String, Entry>),
}

impl Entry {
    /// The leaf string, if this node is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Entry::Text(text) => Some(text),
            Entry::Tree(_) => None,
        }
    }

    /// A direct child, if this node is a tree.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        match self {
            Entry::Tree(children) => children.get(key),
            Entry::Text(_) => None,
        }
    }

    /// Walk `segments` from this node.
    pub fn descend<'a, S: AsRef<str>>(&'a self, segments: &[S]) -> Option<&'a Entry> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.get(segment.as_ref()))
    }

    fn merge(&mut self, other: Entry) {
        match (self, other) {
            (Entry::Tree(mine), Entry::Tree(theirs)) => {
                for (key, value) in theirs {
                    match mine.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            mine.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }

    fn collect_keys(&self, prefix: &str, out: &mut Vec<String>) {
        match self {
            Entry::Text(_) => out.push(prefix.to_string()),
            Entry::Tree(children) => {
                for (key, child) in children {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    child.collect_keys(&path, out);
                }
            }
        }
    }
}

/// Depth-first search for a leaf that cannot become an [`Entry`].
fn first_invalid_leaf(value: &Value, path: &str) -> Option<(String, &'static str)> {
    let kind = match value {
        Value::String(_) => return None,
        Value::Object(children) => {
            return children.iter().find_map(|(key, child)| {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                first_invalid_leaf(child, &child_path)
            });
        }
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
    };
    Some((path.to_string(), kind))
}

/// Bundled fallback data (English, Chinese and Lithuanian formats and units).
const BUILTIN_CATALOG: &str = include_str!("builtin.json");

/// Translations for every loaded locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    locales: HashMap<String, Entry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fallback catalog shipped with the crate.
    ///
    /// # Panics
    /// Panics if the bundled JSON is malformed. This is covered by tests and
    /// cannot happen at runtime.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_CATALOG).expect("Built-in catalog should always parse")
    }

    /// Parse a bundle of the form `{"<locale>": {"js": {...}}}`.
    ///
    /// # Errors
    /// `Json` for malformed JSON, `InvalidLeaf` naming the first dotted path
    /// whose value is not a string or an object.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        if let Some((path, kind)) = first_invalid_leaf(&value, "") {
            return Err(CatalogError::InvalidLeaf { path, kind });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a bundle file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Deep-merge another bundle into this one. Later leaves replace earlier ones.
    pub fn merge(&mut self, other: Catalog) {
        for (locale, tree) in other.locales {
            match self.locales.get_mut(&locale) {
                Some(existing) => existing.merge(tree),
                None => {
                    self.locales.insert(locale, tree);
                }
            }
        }
    }

    /// Insert or replace a single leaf at a dotted path.
    pub fn insert(&mut self, locale: &str, path: &str, value: impl Into<String>) {
        let leaf = path
            .rsplit('.')
            .fold(Entry::Text(value.into()), |child, segment| {
                Entry::Tree(BTreeMap::from([(segment.to_string(), child)]))
            });

        self.merge(Catalog {
            locales: HashMap::from([(locale.to_string(), leaf)]),
        });
    }

    /// Root node of a locale, if loaded.
    pub fn locale(&self, locale: &str) -> Option<&Entry> {
        self.locales.get(locale)
    }

    /// Walk `segments` inside `locale`.
    pub fn descend<S: AsRef<str>>(&self, locale: &str, segments: &[S]) -> Option<&Entry> {
        self.locale(locale)?.descend(segments)
    }

    /// Whether `locale` has been loaded.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Loaded locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Dotted paths of every leaf in `locale`, depth-first in key order.
    pub fn keys(&self, locale: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(root) = self.locale(locale) {
            root.collect_keys("", &mut keys);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lt": {
            "js": {
                "topic": {
                    "title": "Tema",
                    "replies": {"one": "%{count} atsakymas", "few": "%{count} atsakymai", "other": "%{count} atsakymų"}
                }
            }
        },
        "en": {"js": {"topic": {"title": "Topic"}}}
    }"#;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_from_json_str_parses_locales() {
        let catalog = Catalog::from_json_str(SAMPLE).expect("Should parse");
        assert_eq!(catalog.locales(), vec!["en", "lt"]);
        assert!(catalog.has_locale("lt"));
        assert!(!catalog.has_locale("zh_CN"));
    }

    #[test]
    fn test_from_json_str_rejects_non_string_leaf() {
        let result = Catalog::from_json_str(r#"{"en": {"js": {"title": "Topic", "count": 3}}}"#);
        match result {
            Err(CatalogError::InvalidLeaf { path, kind }) => {
                assert_eq!(path, "en.js.count");
                assert_eq!(kind, "number");
            }
            other => panic!("Expected InvalidLeaf, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_leaf_message_names_path() {
        let err = Catalog::from_json_str(
            r#"{"lt": {"js": {"date": {"day_names": ["sekmadienis", "pirmadienis"]}}}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "catalog entry lt.js.date.day_names must be a string or an object, found array"
        );
    }

    #[test]
    fn test_from_json_str_malformed_json() {
        let result = Catalog::from_json_str(r#"{"en": "#);
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Catalog::from_path("/definitely/not/here.json");
        let err = result.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("lt.json");
        std::fs::write(&path, SAMPLE).expect("Should write catalog");

        let catalog = Catalog::from_path(&path).expect("Should load");
        assert_eq!(
            catalog.descend("lt", &["js", "topic", "title"]).and_then(Entry::as_text),
            Some("Tema")
        );
    }

    #[test]
    fn test_builtin_parses() {
        let catalog = Catalog::builtin();
        assert!(catalog.has_locale("en"));
        assert!(catalog.has_locale("lt"));
        assert!(catalog.has_locale("zh_CN"));
    }

    // ==================== Descent Tests ====================

    #[test]
    fn test_descend_returns_plural_tree() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let node = catalog.descend("lt", &["js", "topic", "replies"]).unwrap();
        assert_eq!(node.get("few").and_then(Entry::as_text), Some("%{count} atsakymai"));
    }

    #[test]
    fn test_descend_through_leaf_is_none() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.descend("lt", &["js", "topic", "title", "extra"]).is_none());
    }

    #[test]
    fn test_descend_unknown_locale_is_none() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.descend("fr", &["js"]).is_none());
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_deep_merges_trees() {
        let mut catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let extra = Catalog::from_json_str(
            r#"{"lt": {"js": {"topic": {"title": "Tema!", "views": "Peržiūros"}}}}"#,
        )
        .unwrap();

        catalog.merge(extra);

        assert_eq!(
            catalog.descend("lt", &["js", "topic", "title"]).and_then(Entry::as_text),
            Some("Tema!")
        );
        assert_eq!(
            catalog.descend("lt", &["js", "topic", "views"]).and_then(Entry::as_text),
            Some("Peržiūros")
        );
        assert!(catalog.descend("lt", &["js", "topic", "replies", "one"]).is_some());
    }

    #[test]
    fn test_merge_adds_new_locale() {
        let mut catalog = Catalog::from_json_str(SAMPLE).unwrap();
        catalog.merge(Catalog::from_json_str(r#"{"zh_CN": {"js": {"ok": "好"}}}"#).unwrap());
        assert_eq!(catalog.locales(), vec!["en", "lt", "zh_CN"]);
    }

    #[test]
    fn test_insert_creates_path() {
        let mut catalog = Catalog::new();
        catalog.insert("en", "js.user.name", "Name");
        catalog.insert("en", "js.user.email", "Email");

        assert_eq!(catalog.keys("en"), vec!["js.user.email", "js.user.name"]);
    }

    // ==================== Keys Tests ====================

    #[test]
    fn test_keys_flattens_leaves() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            catalog.keys("lt"),
            vec![
                "js.topic.replies.few",
                "js.topic.replies.one",
                "js.topic.replies.other",
                "js.topic.title",
            ]
        );
        assert!(catalog.keys("fr").is_empty());
    }
}
