//! Document-level properties from the header metadata.

use crate::document::ParsedDocument;
use ppt2video_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Built-in mapping from semantic property keys to header meta names.
const DEFAULT_PROPERTY_NAMES: &[(&str, &str)] = &[
    ("title", "dc:title"),
    ("author", "dc:creator"),
    ("subject", "dc:subject"),
    ("description", "dc:description"),
    ("keywords", "meta:keyword"),
    ("created", "dcterms:created"),
    ("modified", "dcterms:modified"),
    ("company", "extended-properties:Company"),
];

/// Mapping from semantic property keys (`"title"`) to the literal meta
/// names used in the document header (`"dc:title"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    names: BTreeMap<String, String>,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_PROPERTY_NAMES
                .iter()
                .map(|(key, name)| (key.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl PropertyNames {
    /// A mapping with no entries.
    pub fn empty() -> Self {
        Self {
            names: BTreeMap::new(),
        }
    }

    /// Meta name for a key, if mapped.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.names.insert(key.into(), name.into());
    }

    /// Mapped keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Overlay entries from a JSON object (`{"title": "dc:title"}`) on top
    /// of this mapping.
    pub fn merge_json(mut self, json: &str) -> Result<Self> {
        let overrides: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid property map: {}", e)))?;
        self.names.extend(overrides);
        Ok(self)
    }

    /// Default mapping overlaid with the JSON object in `path`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::default().merge_json(&json)
    }
}

/// Content of the first header entry named by `key`'s mapping.
///
/// Returns an empty string when the key is unmapped or no entry matches.
pub fn property(document: &ParsedDocument, names: &PropertyNames, key: &str) -> String {
    let Some(name) = names.get(key) else {
        log::debug!("No meta name mapped for property '{}'", key);
        return String::new();
    };

    document
        .meta()
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.content.clone())
        .unwrap_or_default()
}

/// Contents of every header entry whose name is exactly `name`, in document order.
pub fn property_all(document: &ParsedDocument, name: &str) -> Vec<String> {
    document
        .meta()
        .iter()
        .filter(|entry| entry.name == name)
        .map(|entry| entry.content.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<html><head>
<meta name="dc:title" content="First title"/>
<meta name="dc:creator" content="Alice"/>
<meta name="dc:title" content="Second title"/>
<meta name="dc:creator" content="Bob"/>
</head><body/></html>"#;

    fn doc() -> ParsedDocument {
        ParsedDocument::parse(HEADER).unwrap()
    }

    #[test]
    fn test_property_returns_first_match() {
        let names = PropertyNames::default();
        assert_eq!(property(&doc(), &names, "title"), "First title");
        assert_eq!(property(&doc(), &names, "author"), "Alice");
    }

    #[test]
    fn test_property_missing_is_empty() {
        let names = PropertyNames::default();
        assert_eq!(property(&doc(), &names, "subject"), "");
        assert_eq!(property(&doc(), &names, "no-such-key"), "");
    }

    #[test]
    fn test_property_all_uses_literal_name() {
        assert_eq!(property_all(&doc(), "dc:creator"), vec!["Alice", "Bob"]);
        assert_eq!(
            property_all(&doc(), "dc:title"),
            vec!["First title", "Second title"]
        );
        // Semantic keys are not translated here.
        assert!(property_all(&doc(), "author").is_empty());
    }

    #[test]
    fn test_merge_json_overrides_defaults() {
        let names = PropertyNames::default()
            .merge_json(r#"{"title": "dc:creator", "course": "custom:course"}"#)
            .unwrap();
        assert_eq!(names.get("title"), Some("dc:creator"));
        assert_eq!(names.get("course"), Some("custom:course"));
        assert_eq!(names.get("subject"), Some("dc:subject"));
        assert_eq!(property(&doc(), &names, "title"), "Alice");
    }

    #[test]
    fn test_merge_json_rejects_non_object() {
        let err = PropertyNames::empty().merge_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties.json");
        std::fs::write(&path, r#"{"title": "custom:title"}"#).unwrap();

        let names = PropertyNames::from_json_file(&path).unwrap();
        assert_eq!(names.get("title"), Some("custom:title"));
        assert_eq!(names.keys().count(), DEFAULT_PROPERTY_NAMES.len());
    }
}
