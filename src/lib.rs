// src/lib.rs

//! envtree
//!
//! Decomposes an exported environment (a stream of JSON records) into a
//! directory tree of documents and extracted files, and rebuilds the stream
//! from such a tree.
//!
//! # Architecture
//!
//! - Sections: each record is classified by key into a folder and name
//! - Extraction: scripts, template bodies and facet assets become files,
//!   replaced in the record by `/env/...` placeholders
//! - Run context: an explicit [`ExportRun`] registry lets facets find the
//!   section that owns their `resourceId`
//! - Adapters: file tree writers and readers around the section engine

pub mod adapter;
pub mod config;
mod error;
pub mod filesystem;
pub mod section;
pub mod stream;

pub use adapter::{ExportFileAdapter, ExportSummary, Format, ImportFileAdapter, ImportSummary, Layout};
pub use config::{ConfigError, DEFAULT_CONFIG_PATH, EnvtreeConfig, load_config};
pub use error::{Error, Result};
pub use section::{
    ExportRun, FileDescriptor, FileKind, InboundSection, OutboundSection, PathClassifier,
    SectionKey,
};
pub use stream::{RecordReader, write_record};
