// src/section/key.rs

//! Section keys and their categories
//!
//! Every record in an export stream is tagged with a short key. The key
//! decides where the record lands on disk and which extraction rules apply.

use serde_json::Value;

/// Name of the environment root folder, also the file reference marker
pub const ENV_ROOT: &str = "env";

/// Name of the data root folder
pub const DATA_ROOT: &str = "data";

/// Keys whose records belong under the environment root
pub const ENVIRONMENT_KEYS: &[&str] = &[
    ENV_ROOT,
    "app",
    "config",
    "notification",
    "policy",
    "role",
    "smsNumber",
    "serviceAccount",
    "storageLocation",
    "configuration",
    "template",
    "object",
    "script",
    "view",
];

/// Keys whose records belong under the data root
pub const DATA_KEYS: &[&str] = &[""];

/// Manifest keys; the records sit at the run root
pub const MANIFEST_KEYS: &[&str] = &["manifest", "manifest-dependencies", "manifest-exports"];

/// Key carried by binary asset records
pub const FACET_KEY: &str = "facet";

/// Key carried by template records
pub const TEMPLATE_KEY: &str = "template";

/// Broad classification of a section key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionCategory {
    /// Environment definitions (scripts, templates, objects, policies...)
    Environment,
    /// Data records
    Data,
    /// Export manifests
    Manifest,
    /// Binary asset records
    Facet,
    /// Anything else; has no canonical folder
    Other,
}

impl SectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Data => "data",
            Self::Manifest => "manifest",
            Self::Facet => "facet",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short tag classifying a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SectionKey(String);

impl SectionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key for a raw exported record
    ///
    /// Records whose `object` names a known category keep it as their key;
    /// everything else is a data record with the empty key.
    pub fn for_record(record: &Value) -> Self {
        let object = record.get("object").and_then(Value::as_str).unwrap_or("");
        let known = ENVIRONMENT_KEYS.contains(&object)
            || MANIFEST_KEYS.contains(&object)
            || object == FACET_KEY;
        if known && !object.is_empty() {
            Self::new(object)
        } else {
            Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> SectionCategory {
        let key = self.0.as_str();
        if ENVIRONMENT_KEYS.contains(&key) {
            SectionCategory::Environment
        } else if DATA_KEYS.contains(&key) {
            SectionCategory::Data
        } else if MANIFEST_KEYS.contains(&key) {
            SectionCategory::Manifest
        } else if key == FACET_KEY {
            SectionCategory::Facet
        } else {
            SectionCategory::Other
        }
    }

    /// Facet sections are extraction targets but never resolution hosts
    pub fn is_writable(&self) -> bool {
        self.category() != SectionCategory::Facet
    }

    pub fn is_facet(&self) -> bool {
        self.0 == FACET_KEY
    }

    pub fn is_template(&self) -> bool {
        self.0 == TEMPLATE_KEY
    }

    pub fn is_env_root(&self) -> bool {
        self.0 == ENV_ROOT
    }

    /// `manifest-dependencies` -> `dependencies`; `None` for the root manifest
    pub fn manifest_suffix(&self) -> Option<&str> {
        MANIFEST_KEYS[1..]
            .contains(&self.0.as_str())
            .then(|| self.0.trim_start_matches("manifest-"))
    }
}

impl From<&str> for SectionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "<data>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_categories() {
        assert_eq!(SectionKey::from("script").category(), SectionCategory::Environment);
        assert_eq!(SectionKey::from("env").category(), SectionCategory::Environment);
        assert_eq!(SectionKey::from("").category(), SectionCategory::Data);
        assert_eq!(SectionKey::from("manifest-exports").category(), SectionCategory::Manifest);
        assert_eq!(SectionKey::from("facet").category(), SectionCategory::Facet);
        assert_eq!(SectionKey::from("unknown").category(), SectionCategory::Other);
    }

    #[test]
    fn test_facets_are_not_writable() {
        assert!(!SectionKey::from("facet").is_writable());
        assert!(SectionKey::from("template").is_writable());
        assert!(SectionKey::from("").is_writable());
    }

    #[test]
    fn test_manifest_suffix() {
        assert_eq!(SectionKey::from("manifest").manifest_suffix(), None);
        assert_eq!(
            SectionKey::from("manifest-dependencies").manifest_suffix(),
            Some("dependencies")
        );
        assert_eq!(SectionKey::from("manifest-exports").manifest_suffix(), Some("exports"));
        assert_eq!(SectionKey::from("script").manifest_suffix(), None);
    }

    #[test]
    fn test_key_for_record() {
        assert_eq!(SectionKey::for_record(&json!({"object": "script"})).as_str(), "script");
        assert_eq!(SectionKey::for_record(&json!({"object": "facet"})).as_str(), "facet");
        assert_eq!(SectionKey::for_record(&json!({"object": "env"})).as_str(), "env");
        assert_eq!(SectionKey::for_record(&json!({"object": "c_study"})).as_str(), "");
        assert_eq!(SectionKey::for_record(&json!({"name": "x"})).as_str(), "");
    }
}
