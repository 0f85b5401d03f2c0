// src/error.rs

//! Error types for section decomposition and reconstruction

use thiserror::Error;

/// Errors raised by the envtree library
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A template block has no matching entry in the record's `spec` array
    #[error("No MIME type declared for template block '{block}' in {section}")]
    MissingMimeType { section: String, block: String },

    /// A declared MIME type has no known file extension
    #[error("Unknown MIME type '{mime}' for '{name}'")]
    UnknownMimeType { mime: String, name: String },

    /// The output path of a section was assigned twice in one run
    #[error("Output path already set for section {section} (current: {current}, rejected: {rejected})")]
    OutputPathAlreadySet {
        section: String,
        current: String,
        rejected: String,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;
