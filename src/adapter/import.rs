// src/adapter/import.rs

//! Import file adapter
//!
//! Reads an exported tree back into a record stream. Each document becomes
//! an inbound section whose placeholders are resolved against the tree root;
//! facet bytes follow their record as `{ streamId, data }` items.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::section::{FsSource, InboundSection, SectionKey};

use super::{BLOB_NAME, Format, extracted_folders};

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub documents: usize,
    pub records: usize,
    pub scripts: usize,
    pub templates: usize,
    pub blobs: usize,
}

/// Reads a file tree written by the export adapter
pub struct ImportFileAdapter {
    root: PathBuf,
    format: Format,
}

impl ImportFileAdapter {
    pub fn new(root: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Document files to read, in a stable order
    ///
    /// A `blob.<format>` file at the root takes precedence over the tree.
    pub fn documents(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::InvalidPath(format!(
                "Import root is not a directory: {}",
                self.root.display()
            )));
        }

        let blob = self.root.join(format!("{}.{}", BLOB_NAME, self.format.extension()));
        if blob.is_file() {
            return Ok(vec![blob]);
        }

        let skipped: Vec<PathBuf> = extracted_folders()
            .iter()
            .map(|folder| self.root.join(folder))
            .collect();
        let extension = self.format.extension();

        let documents = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !skipped.iter().any(|s| entry.path() == s.as_path()))
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some(extension))
            .map(|entry| entry.into_path())
            .collect();
        Ok(documents)
    }

    /// Read the raw records of one document
    fn read_document(&self, path: &Path) -> Result<Vec<Value>> {
        let text = fs::read_to_string(path)?;
        match self.format.deserialize(&text)? {
            Value::Array(records) => Ok(records),
            record @ Value::Object(_) => Ok(vec![record]),
            _ => Err(Error::InvalidRecord(format!(
                "{} does not hold a record",
                path.display()
            ))),
        }
    }

    /// Rebuild every record and pass stream items to `emit`
    ///
    /// Items are emitted per record: the record first, then its facet blobs.
    /// The first failed file read stops the import.
    pub fn import<F>(&self, mut emit: F) -> Result<ImportSummary>
    where
        F: FnMut(Value) -> Result<()>,
    {
        let source = FsSource::new(&self.root);
        let mut summary = ImportSummary::default();

        for path in self.documents()? {
            summary.documents += 1;
            for record in self.read_document(&path)? {
                if !record.is_object() {
                    return Err(Error::InvalidRecord(format!(
                        "non-object record in {}",
                        path.display()
                    )));
                }
                let key = SectionKey::for_record(&record);
                let mut section = InboundSection::new(record, key, &source);
                summary.scripts += section.load_scripts()?;
                summary.templates += section.load_templates()?;
                section.load_facets()?;

                let (content, blobs) = section.into_parts();
                emit(content)?;
                summary.records += 1;
                for blob in blobs {
                    emit(blob.to_json())?;
                    summary.blobs += 1;
                }
            }
            debug!("Imported {}", path.display());
        }

        info!(
            "Imported {} records and {} blobs from {}",
            summary.records,
            summary.blobs,
            self.root.display()
        );
        Ok(summary)
    }

    /// Rebuild every record into a vector of stream items
    pub fn collect(&self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        self.import(|item| {
            items.push(item);
            Ok(())
        })?;
        Ok(items)
    }
}
