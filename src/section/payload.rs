// src/section/payload.rs

//! Inline content versus file reference placeholders
//!
//! Exported records carry either inline content or a placeholder pointing at
//! a file under the environment root. Classifying the string once at the
//! record boundary keeps the prefix check in a single place.

use super::key::ENV_ROOT;

/// A scalar value read from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Content stored directly in the record
    Inline(&'a str),
    /// Placeholder for content stored in a file, relative to the run root
    FileReference(&'a str),
}

impl<'a> Payload<'a> {
    /// Classify a string value
    ///
    /// Only `/env` itself or values under `/env/` are references; a value
    /// such as `/envelope` stays inline.
    pub fn classify(value: &'a str) -> Self {
        let marker = reference_marker();
        match value.strip_prefix(marker.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Self::FileReference(value),
            _ => Self::Inline(value),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::FileReference(_))
    }

    pub fn reference(&self) -> Option<&'a str> {
        match self {
            Self::FileReference(path) => Some(path),
            Self::Inline(_) => None,
        }
    }
}

/// The `/env` marker prefix
pub fn reference_marker() -> String {
    format!("/{}", ENV_ROOT)
}

/// Build a placeholder for a file relative to the environment root
pub fn file_reference(parts: &[&str]) -> String {
    let mut reference = reference_marker();
    for part in parts {
        reference.push('/');
        reference.push_str(part.trim_matches('/'));
    }
    reference
}
