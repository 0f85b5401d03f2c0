// src/section/outbound.rs

//! Outbound (export) sections
//!
//! An [`OutboundSection`] wraps one exported record and pulls its embedded
//! payloads out into [`FileDescriptor`]s:
//! - inline `script` sources
//! - localized template bodies
//! - binary facet assets, matched to their host section through the run registry
//!
//! Extraction never mutates the record. Rewriting extracted nodes into file
//! reference placeholders is the job of the adapter that writes the files.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::classifier::{PathClassifier, record_name};
use super::key::SectionKey;
use super::naming::{extension_for_mime, slugify};
use super::registry::{ExportRun, SectionId};
use super::tree::{
    Ancestor, OUTBOUND_IDENTITY, RefPath, find_nodes, find_owner, first_array, identity_of, is_truthy,
    render_scalar, str_field,
};

/// Extension used for facet assets with an unrecognized MIME type
const FALLBACK_ASSET_EXTENSION: &str = "bin";

/// Kind of extracted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Script,
    Template,
    Asset,
}

impl FileKind {
    /// Folder under the environment root holding files of this kind
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Template => "tpl",
            Self::Asset => "assets",
        }
    }
}

/// Payload of an extracted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileData {
    /// Text taken verbatim from the record
    Text(String),
    /// Base64 encoded bytes carried inline by a facet
    Base64(String),
    /// Location of bytes held by the remote platform
    Remote(String),
}

impl FileData {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Bytes to write; `None` for remote payloads
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Text(text) => Ok(Some(text.as_bytes().to_vec())),
            Self::Base64(encoded) => Ok(Some(STANDARD.decode(encoded.trim())?)),
            Self::Remote(_) => Ok(None),
        }
    }
}

/// Host section owning a facet asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRef {
    pub section_id: SectionId,
    /// Output path of the host when the facet was extracted
    pub output_path: Option<String>,
}

/// One file pulled out of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub kind: FileKind,
    pub name: String,
    pub extension: String,
    pub data: FileData,
    /// Node that receives the file reference: in this section's record for
    /// scripts and templates, in the host record for assets
    pub pointer: RefPath,
    pub host: Option<HostRef>,
    pub etag: Option<String>,
}

impl FileDescriptor {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name.replace('/', "_"), self.extension)
    }
}

/// One exported record being decomposed
#[derive(Debug)]
pub struct OutboundSection {
    id: SectionId,
    content: Value,
    key: SectionKey,
    output_path: Option<String>,
    script_files: Vec<FileDescriptor>,
    template_files: Vec<FileDescriptor>,
    extra_files: Vec<FileDescriptor>,
}

impl OutboundSection {
    /// Wrap a record; writable sections are registered in the run
    pub fn new(run: &mut ExportRun, content: Value, key: SectionKey) -> Self {
        let section = Self {
            id: SectionId::generate(),
            content,
            key,
            output_path: None,
            script_files: Vec::new(),
            template_files: Vec::new(),
            extra_files: Vec::new(),
        };
        if section.is_writable() {
            run.registry_mut()
                .register(section.id, &section.key, &section.name(), &section.content);
        }
        section
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn into_content(self) -> Value {
        self.content
    }

    pub fn is_writable(&self) -> bool {
        self.key.is_writable()
    }

    pub fn is_facet(&self) -> bool {
        self.key.is_facet()
    }

    /// Logical name of the section
    pub fn name(&self) -> String {
        record_name(&self.key, &self.content)
    }

    /// Canonical folder of the section, relative to the run root
    pub fn path(&self) -> String {
        let object = self.content.get("object").and_then(Value::as_str);
        PathClassifier::classify_named(&self.key, object, &self.name())
    }

    /// Output path; `None` until the adapter has placed the section
    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    /// Assign the output path, once per run
    pub fn set_output_path(&mut self, run: &mut ExportRun, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        if let Some(current) = &self.output_path {
            return Err(Error::OutputPathAlreadySet {
                section: self.name(),
                current: current.clone(),
                rejected: path,
            });
        }
        run.registry_mut().update_output_path(self.id, &path);
        self.output_path = Some(path);
        Ok(())
    }

    pub fn script_files(&self) -> &[FileDescriptor] {
        &self.script_files
    }

    pub fn template_files(&self) -> &[FileDescriptor] {
        &self.template_files
    }

    pub fn extra_files(&self) -> &[FileDescriptor] {
        &self.extra_files
    }

    fn resource(&self) -> String {
        self.content
            .get("resource")
            .or_else(|| self.content.get("object"))
            .map(render_scalar)
            .unwrap_or_default()
    }

    /// Extract every inline `script` source
    ///
    /// Files are named `<type>.<slug of owner identity>`, where `type` is
    /// the owner's `type` field or `<resource>.<dotted path>`. Names are not
    /// unique; two scripts under one owner share a name.
    ///
    /// Only string sources are extracted. Number, boolean and object values
    /// under a `script` key stay inline in the record.
    pub fn extract_scripts(&mut self) -> &[FileDescriptor] {
        let resource = self.resource();
        let mut files = Vec::new();

        for (path, value) in find_nodes(&self.content, "script") {
            let Some(source) = value.as_str() else {
                continue;
            };

            let name = match find_owner(&self.content, &path, OUTBOUND_IDENTITY) {
                Ancestor::Found(owner) => {
                    let owner_value = owner.path.get(&self.content);
                    let script_type = owner_value
                        .and_then(|o| o.get("type"))
                        .filter(|t| is_truthy(t))
                        .map(render_scalar)
                        .unwrap_or_else(|| format!("{}.{}", resource, owner.trail.dotted()));
                    let identity = owner_value
                        .and_then(|o| identity_of(o, OUTBOUND_IDENTITY))
                        .unwrap_or_default();
                    format!("{}.{}", script_type, slugify(&identity, '_'))
                }
                Ancestor::NotFound => {
                    debug!("Script at {} has no named owner in {}", path, resource);
                    format!("{}.{}", resource, path.dotted())
                }
            };

            files.push(FileDescriptor {
                kind: FileKind::Script,
                name,
                extension: "js".to_string(),
                data: FileData::Text(source.to_string()),
                pointer: path,
                host: None,
                etag: None,
            });
        }

        debug!("Extracted {} scripts from {}", files.len(), self.name());
        self.script_files = files;
        &self.script_files
    }

    /// Extract localized template bodies
    ///
    /// Applies to template sections with a `localizations` array. Each
    /// localization contributes the blocks of its first `content` array;
    /// block extensions come from the MIME type declared in `spec`.
    pub fn extract_templates(&mut self) -> Result<&[FileDescriptor]> {
        let mut files = Vec::new();

        if self.key.is_template()
            && let Some(localizations) = self.content.get("localizations").and_then(Value::as_array)
        {
            let base_name = format!(
                "{}.{}",
                self.resource(),
                self.content.get("name").map(render_scalar).unwrap_or_default()
            );
            let specs = self.content.get("spec").and_then(Value::as_array);
            let localizations_path = RefPath::root().child_key("localizations");

            for (index, localization) in localizations.iter().enumerate() {
                let Some((relative, blocks)) = first_array(localization, "content") else {
                    continue;
                };
                let locale = localization
                    .get("locale")
                    .filter(|l| is_truthy(l))
                    .map(render_scalar)
                    .unwrap_or_else(|| "default".to_string());
                let content_path = localizations_path.child_index(index).join(&relative);

                for (i, block) in blocks.iter().enumerate() {
                    let Some(data) = block.get("data").and_then(Value::as_str).filter(|d| !d.is_empty())
                    else {
                        continue;
                    };
                    let block_name = block.get("name").map(render_scalar).unwrap_or_default();
                    let extension = template_extension(specs, &block_name, &base_name)?;

                    files.push(FileDescriptor {
                        kind: FileKind::Template,
                        name: format!("{}.{}.{}", base_name, locale, block_name),
                        extension: extension.to_string(),
                        data: FileData::Text(data.to_string()),
                        pointer: content_path.child_index(i).child_key("data"),
                        host: None,
                        etag: None,
                    });
                }
            }
        }

        debug!("Extracted {} template blocks from {}", files.len(), self.name());
        self.template_files = files;
        Ok(&self.template_files)
    }

    /// Extract the binary asset of a facet section
    ///
    /// The facet is matched by `resourceId` against the sections registered
    /// so far. A facet with no match is dropped and counted on the run; a
    /// host registered after the facet is never found.
    pub fn extract_assets(&mut self, run: &mut ExportRun) -> &[FileDescriptor] {
        self.extra_files.clear();
        if !self.is_facet() {
            return &self.extra_files;
        }

        let Some(resource_id) = self.content.get("resourceId").filter(|r| !r.is_null()) else {
            warn!("Facet record without resourceId skipped");
            run.record_unresolved_facet();
            return &self.extra_files;
        };

        let Some(host) = run.registry().find_resource(resource_id, self.id) else {
            warn!(
                "No section holds resourceId {}; facet {} dropped",
                render_scalar(resource_id),
                self.resource()
            );
            run.record_unresolved_facet();
            return &self.extra_files;
        };

        let data = match (
            str_field_of(&self.content, "url"),
            str_field_of(&self.content, "base64"),
        ) {
            (Some(url), _) => FileData::Remote(url.to_string()),
            (None, Some(encoded)) => FileData::Base64(encoded.to_string()),
            (None, None) => {
                warn!("Facet {} carries neither url nor base64 data", self.resource());
                run.record_unresolved_facet();
                return &self.extra_files;
            }
        };

        let mime = str_field_of(&self.content, "mime").unwrap_or_default();
        let extension = extension_for_mime(mime).unwrap_or_else(|| {
            debug!("Unknown facet MIME type '{}', using .{}", mime, FALLBACK_ASSET_EXTENSION);
            FALLBACK_ASSET_EXTENSION
        });
        let name = str_field_of(&self.content, "resource")
            .map(str::to_string)
            .unwrap_or_else(|| render_scalar(resource_id));

        self.extra_files.push(FileDescriptor {
            kind: FileKind::Asset,
            name,
            extension: extension.to_string(),
            data,
            pointer: host.node.with_last_key("filePath"),
            host: Some(HostRef {
                section_id: host.section_id,
                output_path: host.output_path,
            }),
            etag: self.content.get("ETag").filter(|e| is_truthy(e)).map(render_scalar),
        });
        &self.extra_files
    }
}

fn str_field_of<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.as_object().and_then(|map| str_field(map, key))
}

fn template_extension(specs: Option<&Vec<Value>>, block: &str, section: &str) -> Result<&'static str> {
    let mime = specs
        .into_iter()
        .flatten()
        .find(|s| s.get("name").map(render_scalar).as_deref() == Some(block))
        .and_then(|s| s.get("mime"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingMimeType {
            section: section.to_string(),
            block: block.to_string(),
        })?;

    extension_for_mime(mime).ok_or_else(|| Error::UnknownMimeType {
        mime: mime.to_string(),
        name: format!("{}.{}", section, block),
    })
}
