// src/section/classifier.rs

//! Section-to-folder classification
//!
//! Maps a section key and the object type named in its record to the
//! canonical relative folder of the section. Classification is pure: the
//! same inputs always produce the same path.

use serde_json::Value;

use super::key::{DATA_ROOT, ENV_ROOT, SectionCategory, SectionKey};
use super::naming::{is_custom_name, pluralize};

/// Classifies sections into folders of the exported tree
pub struct PathClassifier;

impl PathClassifier {
    /// Classify a section from its key and object name
    ///
    /// Returns an empty string when the section has no canonical folder
    /// (manifests and unknown keys sit at the run root).
    pub fn classify(key: &SectionKey, object: Option<&str>) -> String {
        let name = section_name(key, None, object);
        Self::classify_named(key, object, &name)
    }

    /// Classify with an already derived section name
    ///
    /// Order of checks matters - the `env` override wins over custom names.
    pub fn classify_named(key: &SectionKey, object: Option<&str>, name: &str) -> String {
        let category = key.category();

        // 1-3. Base folder from the key category
        let base = match category {
            SectionCategory::Environment => Some(ENV_ROOT),
            SectionCategory::Data => Some(DATA_ROOT),
            SectionCategory::Manifest => Some(""),
            SectionCategory::Facet | SectionCategory::Other => None,
        };

        let Some(object) = object.filter(|o| !o.is_empty()) else {
            return base.unwrap_or_default().to_string();
        };

        // The environment record itself lives in a folder of its own name
        if category == SectionCategory::Environment && object == ENV_ROOT {
            return name.to_string();
        }

        // 4. Custom objects always go under the data root
        if is_custom_name(object) {
            return format!("{}/{}", DATA_ROOT, pluralize(object));
        }

        // 5. Pluralized leaf under a non-empty base
        match base {
            Some(base) if !base.is_empty() => format!("{}/{}", base, pluralize(object)),
            _ => String::new(),
        }
    }
}

/// Logical name of a section
///
/// The `env` key names itself, manifest sub-keys drop their `manifest-`
/// prefix, and everything else uses the part of `resource` (or `object`)
/// after its last dot.
pub fn section_name(key: &SectionKey, resource: Option<&str>, object: Option<&str>) -> String {
    if key.is_env_root() {
        return key.as_str().to_string();
    }
    if let Some(suffix) = key.manifest_suffix() {
        return suffix.to_string();
    }

    let source = resource
        .filter(|r| !r.is_empty())
        .or(object.filter(|o| !o.is_empty()));

    match source {
        Some(source) => match source.rsplit_once('.') {
            Some((_, tail)) if !tail.is_empty() => tail.to_string(),
            _ => source.to_string(),
        },
        None if !key.as_str().is_empty() => key.as_str().to_string(),
        None => "record".to_string(),
    }
}

/// Section name derived straight from a record
pub fn record_name(key: &SectionKey, record: &Value) -> String {
    section_name(
        key,
        record.get("resource").and_then(Value::as_str),
        record.get("object").and_then(Value::as_str),
    )
}
