// src/section/registry.rs

//! Run-scoped registry of outbound sections
//!
//! Facet records name their owner only by `resourceId`, so asset extraction
//! has to look across every section seen so far in the run. The registry is
//! that lookup table. It lives inside an [`ExportRun`] which is passed to
//! section construction and extraction; dropping or resetting the run
//! discards it.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::key::SectionKey;
use super::tree::{RefPath, find_nodes};

/// Opaque identity of a section within one run; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(Uuid);

impl SectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A writable section as seen by the registry
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub id: SectionId,
    pub key: SectionKey,
    pub name: String,
    /// Every `resourceId` node of the record, in document order
    pub resource_ids: Vec<(RefPath, Value)>,
    /// Where the section is written; `None` until placed
    pub output_path: Option<String>,
}

/// A host section matched for a facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMatch {
    pub section_id: SectionId,
    pub output_path: Option<String>,
    /// Path of the matched `resourceId` node in the host record
    pub node: RefPath,
}

/// Insertion-ordered collection of writable sections
#[derive(Debug, Default)]
pub struct SectionRegistry {
    entries: Vec<RegistryEntry>,
}

impl SectionRegistry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn get(&self, id: SectionId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub(crate) fn register(&mut self, id: SectionId, key: &SectionKey, name: &str, content: &Value) {
        let resource_ids = find_nodes(content, "resourceId")
            .into_iter()
            .map(|(path, value)| (path, value.clone()))
            .collect::<Vec<_>>();
        debug!(
            "Registered section {} ({}) with {} resource ids",
            name,
            key,
            resource_ids.len()
        );
        self.entries.push(RegistryEntry {
            id,
            key: key.clone(),
            name: name.to_string(),
            resource_ids,
            output_path: None,
        });
    }

    pub(crate) fn update_output_path(&mut self, id: SectionId, path: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.output_path = Some(path.to_string());
        }
    }

    /// First section, other than `exclude`, holding a `resourceId` equal to `resource_id`
    ///
    /// Sections are searched in registration order.
    pub fn find_resource(&self, resource_id: &Value, exclude: SectionId) -> Option<HostMatch> {
        self.entries
            .iter()
            .filter(|e| e.id != exclude)
            .find_map(|entry| {
                entry
                    .resource_ids
                    .iter()
                    .find(|(_, value)| value == resource_id)
                    .map(|(path, _)| HostMatch {
                        section_id: entry.id,
                        output_path: entry.output_path.clone(),
                        node: path.clone(),
                    })
            })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// State shared by every section of one export run
#[derive(Debug, Default)]
pub struct ExportRun {
    registry: SectionRegistry,
    unresolved_facets: usize,
}

impl ExportRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut SectionRegistry {
        &mut self.registry
    }

    /// Facets whose `resourceId` matched no registered section
    pub fn unresolved_facets(&self) -> usize {
        self.unresolved_facets
    }

    pub(crate) fn record_unresolved_facet(&mut self) {
        self.unresolved_facets += 1;
    }

    /// Discard all registered sections and counters
    pub fn reset(&mut self) {
        self.registry.clear();
        self.unresolved_facets = 0;
    }
}
