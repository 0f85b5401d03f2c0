// src/adapter/export.rs

//! Export file adapter
//!
//! Feeds a record stream through outbound sections and lays the result out
//! on disk. Nothing is written until [`ExportFileAdapter::finish`], so an
//! aborted export leaves the output directory untouched and late facets
//! can still patch records that were placed earlier.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filesystem::path::{output_path, safe_join, sanitize_filename};
use crate::section::payload::file_reference;
use crate::section::{ExportRun, FileDescriptor, OutboundSection, SectionId, SectionKey};

use super::{BLOB_NAME, Format, Layout};

/// Outcome of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Records read from the stream
    pub records: usize,
    /// Document files written
    pub documents: usize,
    /// Extracted files written (scripts, templates, assets)
    pub files: usize,
    /// Facets whose host was not registered when they arrived
    pub unresolved_facets: usize,
    /// Assets held remotely and not downloaded
    pub remote_assets_skipped: usize,
    /// Assets whose host was matched but has no placed document
    pub unplaced_assets: usize,
}

impl ExportSummary {
    pub fn total_files(&self) -> usize {
        self.documents + self.files
    }
}

/// A rewritten record waiting to be written
struct PendingDocument {
    output_path: String,
    content: Value,
}

/// Writes an export stream into a file tree
pub struct ExportFileAdapter {
    root: PathBuf,
    format: Format,
    layout: Layout,
    run: ExportRun,
    documents: Vec<PendingDocument>,
    by_section: HashMap<SectionId, usize>,
    used_paths: HashSet<String>,
    staged_files: Vec<(String, Vec<u8>)>,
    summary: ExportSummary,
}

impl ExportFileAdapter {
    pub fn new(root: impl Into<PathBuf>, format: Format, layout: Layout) -> Self {
        Self {
            root: root.into(),
            format,
            layout,
            run: ExportRun::new(),
            documents: Vec::new(),
            by_section: HashMap::new(),
            used_paths: HashSet::new(),
            staged_files: Vec::new(),
            summary: ExportSummary::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Export a whole stream and write the tree
    pub fn export<I>(mut self, records: I) -> Result<ExportSummary>
    where
        I: IntoIterator<Item = Result<Value>>,
    {
        for record in records {
            self.write_record(record?)?;
        }
        self.finish()
    }

    /// Process one record
    ///
    /// The record is fully classified, placed and extracted before this
    /// returns, so the next record sees it in the registry.
    pub fn write_record(&mut self, record: Value) -> Result<()> {
        if !record.is_object() {
            return Err(Error::InvalidRecord("expected a JSON object".to_string()));
        }
        self.summary.records += 1;

        let key = SectionKey::for_record(&record);
        let mut section = OutboundSection::new(&mut self.run, record, key);

        if section.is_facet() {
            self.stage_assets(&mut section)
        } else {
            self.place_section(&mut section)
        }
    }

    fn place_section(&mut self, section: &mut OutboundSection) -> Result<()> {
        let folder = section.path();
        let name = sanitize_filename(&section.name())?;
        let output = self.allocate_output(&folder, &name);
        section.set_output_path(&mut self.run, output.clone())?;

        let mut content = section.content().clone();
        let scripts = section.extract_scripts().to_vec();
        let templates = section.extract_templates()?.to_vec();

        for descriptor in scripts.iter().chain(templates.iter()) {
            if let Some(reference) = self.stage_file(descriptor)? {
                descriptor.pointer.set(&mut content, Value::String(reference));
            }
        }

        debug!(
            "Placed {} section {} at {} ({} scripts, {} templates)",
            section.key(),
            section.name(),
            output,
            scripts.len(),
            templates.len()
        );

        self.by_section.insert(section.id(), self.documents.len());
        self.documents.push(PendingDocument {
            output_path: output,
            content,
        });
        Ok(())
    }

    fn stage_assets(&mut self, section: &mut OutboundSection) -> Result<()> {
        let assets = section.extract_assets(&mut self.run).to_vec();

        for asset in &assets {
            let Some(host) = &asset.host else {
                continue;
            };
            if host.output_path.is_none() {
                warn!("Host of asset {} is not placed yet; skipped", asset.name);
                self.summary.unplaced_assets += 1;
                continue;
            }
            if asset.data.is_remote() {
                warn!("Asset {} is stored remotely; not downloaded", asset.name);
                self.summary.remote_assets_skipped += 1;
                continue;
            }
            let Some(&index) = self.by_section.get(&host.section_id) else {
                warn!("Host of asset {} has no pending document", asset.name);
                self.summary.unplaced_assets += 1;
                continue;
            };

            if let Some(reference) = self.stage_file(asset)? {
                let document = &mut self.documents[index];
                if !asset.pointer.set(&mut document.content, Value::String(reference)) {
                    warn!(
                        "Could not set {} in {} for asset {}",
                        asset.pointer, document.output_path, asset.name
                    );
                }
            }
        }
        Ok(())
    }

    /// Reserve a unique `/<folder>/<stem>.<ext>` path
    ///
    /// Taken paths get `-2`, `-3`, ... appended to the stem.
    fn reserve_path(&mut self, folder: &str, stem: &str, extension: &str) -> String {
        let mut candidate = output_path(folder, &format!("{}.{}", stem, extension));
        let mut counter = 2;
        while self.used_paths.contains(&candidate) {
            candidate = output_path(folder, &format!("{}-{}.{}", stem, counter, extension));
            counter += 1;
        }
        self.used_paths.insert(candidate.clone());
        candidate
    }

    /// Reserve a unique document path for a section
    fn allocate_output(&mut self, folder: &str, name: &str) -> String {
        let extension = self.format.extension();
        self.reserve_path(folder, name, extension)
    }

    /// Stage an extracted file under its own placeholder
    fn stage_file(&mut self, descriptor: &FileDescriptor) -> Result<Option<String>> {
        let Some(bytes) = descriptor.data.to_bytes()? else {
            return Ok(None);
        };
        let folder = file_reference(&[descriptor.kind.folder()]);
        let stem = sanitize_filename(&descriptor.name)?;
        let reference = self.reserve_path(&folder, &stem, &descriptor.extension);
        if reference != output_path(&folder, &descriptor.file_name()) {
            debug!("Extracted file {} renamed to {}", descriptor.file_name(), reference);
        }
        self.staged_files.push((reference.clone(), bytes));
        Ok(Some(reference))
    }

    /// Write every staged file and document
    pub fn finish(mut self) -> Result<ExportSummary> {
        fs::create_dir_all(&self.root)?;

        for (reference, bytes) in &self.staged_files {
            write_file(&self.root, reference, bytes)?;
        }
        self.summary.files = self.staged_files.len();

        match self.layout {
            Layout::Default => {
                for document in &self.documents {
                    let text = self.format.serialize(&document.content)?;
                    write_file(&self.root, &document.output_path, text.as_bytes())?;
                }
                self.summary.documents = self.documents.len();
            }
            Layout::Blob => {
                let records = self
                    .documents
                    .iter()
                    .map(|d| d.content.clone())
                    .collect::<Vec<_>>();
                let text = self.format.serialize(&Value::Array(records))?;
                let name = format!("/{}.{}", BLOB_NAME, self.format.extension());
                write_file(&self.root, &name, text.as_bytes())?;
                self.summary.documents = 1;
            }
        }

        self.summary.unresolved_facets = self.run.unresolved_facets();
        if self.summary.unresolved_facets > 0 {
            warn!(
                "{} facet(s) had no registered host and were dropped",
                self.summary.unresolved_facets
            );
        }
        if self.summary.unplaced_assets > 0 {
            warn!("{} asset(s) matched a host with no document", self.summary.unplaced_assets);
        }
        info!(
            "Exported {} records to {} ({} layout): {} documents, {} extracted files",
            self.summary.records,
            self.root.display(),
            self.layout,
            self.summary.documents,
            self.summary.files
        );

        self.run.reset();
        Ok(self.summary)
    }
}

fn write_file(root: &Path, relative: &str, bytes: &[u8]) -> Result<()> {
    let target = safe_join(root, relative)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, bytes)?;
    Ok(())
}
