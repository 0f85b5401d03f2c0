// src/section/mod.rs

//! Section decomposition and reconstruction
//!
//! A section is one classified record of an export stream, paired with the
//! rules that split it into files (outbound) or put it back together
//! (inbound).
//!
//! # Flow
//!
//! Export, one record at a time:
//! 1. [`OutboundSection::new`] wraps the record and registers it in the
//!    [`ExportRun`] unless it is a facet
//! 2. The adapter places the section with [`OutboundSection::set_output_path`]
//! 3. `extract_scripts`, `extract_templates` and `extract_assets` describe
//!    the files to write and the nodes to rewrite
//!
//! Import reverses step 3: [`InboundSection`] replaces `/env/...`
//! placeholders with file contents and hands out facet bytes.
//!
//! Facets resolve their host through the registry as it stands when the
//! facet is processed, so hosts must come first in the stream.

pub mod classifier;
pub mod inbound;
pub mod key;
pub mod naming;
pub mod outbound;
pub mod payload;
pub mod registry;
pub mod tree;

pub use classifier::{PathClassifier, record_name, section_name};
pub use inbound::{FacetBlob, FileSource, FsSource, InboundSection};
pub use key::{SectionCategory, SectionKey};
pub use outbound::{FileData, FileDescriptor, FileKind, HostRef, OutboundSection};
pub use payload::Payload;
pub use registry::{ExportRun, HostMatch, RegistryEntry, SectionId, SectionRegistry};
pub use tree::{Ancestor, Owner, RefPath, Segment};
