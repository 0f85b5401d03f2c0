// src/adapter/mod.rs

//! File tree adapters
//!
//! Adapters sit around the section engine: the export adapter places
//! sections on disk, writes the files they extract and rewrites records to
//! point at them; the import adapter reads a tree back and feeds inbound
//! sections.

mod export;
mod import;

pub use export::{ExportFileAdapter, ExportSummary};
pub use import::{ImportFileAdapter, ImportSummary};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::section::FileKind;
use crate::section::key::ENV_ROOT;

/// Base name of the single document written by the blob layout
pub const BLOB_NAME: &str = "blob";

/// Serialization format of document files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Parse format from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    pub fn serialize(&self, value: &Value) -> Result<String> {
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
            Self::Json => {
                let mut text = serde_json::to_string_pretty(value)?;
                text.push('\n');
                Ok(text)
            }
        }
    }

    pub fn deserialize(&self, text: &str) -> Result<Value> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
            Self::Json => Ok(serde_json::from_str(text)?),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// How documents are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One document per section, in its classified folder
    #[default]
    Default,
    /// All records in a single `blob.<format>` document
    Blob,
}

impl Layout {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" | "tree" => Ok(Self::Default),
            "blob" | "single" => Ok(Self::Blob),
            other => Err(Error::UnsupportedFormat(format!("layout '{}'", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Blob => "blob",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Folders under the run root that hold extracted files, not documents
pub fn extracted_folders() -> Vec<String> {
    [FileKind::Script, FileKind::Template, FileKind::Asset]
        .iter()
        .map(|kind| format!("{}/{}", ENV_ROOT, kind.folder()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("yaml").unwrap(), Format::Yaml);
        assert_eq!(Format::parse("YML").unwrap(), Format::Yaml);
        assert_eq!(Format::parse("json").unwrap(), Format::Json);
        assert!(Format::parse("xml").is_err());
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!(Layout::parse("default").unwrap(), Layout::Default);
        assert_eq!(Layout::parse("blob").unwrap(), Layout::Blob);
        assert!(Layout::parse("zip").is_err());
    }

    #[test]
    fn test_format_serialize_round_trip() {
        let value = json!({
            "name": "c_a",
            "script": "return 1\n// multi-line",
            "list": [1, 2.5, true, null],
            "nested": { "x": "y" }
        });
        for format in [Format::Yaml, Format::Json] {
            let text = format.serialize(&value).unwrap();
            assert_eq!(format.deserialize(&text).unwrap(), value);
        }
    }

    #[test]
    fn test_extracted_folders() {
        assert_eq!(extracted_folders(), vec!["env/js", "env/tpl", "env/assets"]);
    }
}
