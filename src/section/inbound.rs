// src/section/inbound.rs

//! Inbound (import) sections
//!
//! An [`InboundSection`] wraps one record read back from an exported tree
//! and re-inlines the content its placeholders point at. Binary assets are
//! not inlined; they are handed out as [`FacetBlob`]s correlated to their
//! owner through a fresh `streamId`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::filesystem::path::safe_join;

use super::key::SectionKey;
use super::payload::Payload;
use super::tree::{
    Ancestor, INBOUND_IDENTITY, RefPath, find_nodes, find_owner, first_array, identity_of,
};

/// Reads the files that placeholders refer to
pub trait FileSource {
    /// Bytes of the file behind a placeholder such as `/env/js/a.js`
    fn read(&self, reference: &str) -> Result<Vec<u8>>;

    /// Text of the file behind a placeholder
    fn read_text(&self, reference: &str) -> Result<String> {
        let bytes = self.read(reference)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Resolves placeholders against a directory on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSource for FsSource {
    fn read(&self, reference: &str) -> Result<Vec<u8>> {
        let path = safe_join(&self.root, reference)?;
        debug!("Reading {}", path.display());
        Ok(std::fs::read(path)?)
    }
}

/// Asset bytes loaded for a facet owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetBlob {
    /// Correlation id, also written onto the owning object
    pub stream_id: String,
    pub data: Vec<u8>,
}

impl FacetBlob {
    /// Stream form: `{ "streamId": ..., "data": <base64> }`
    pub fn to_json(&self) -> Value {
        json!({
            "streamId": self.stream_id,
            "data": STANDARD.encode(&self.data),
        })
    }
}

/// One record being reconstructed
pub struct InboundSection<'a> {
    content: Value,
    key: SectionKey,
    source: &'a dyn FileSource,
    blobs: Vec<FacetBlob>,
}

impl<'a> InboundSection<'a> {
    pub fn new(content: Value, key: SectionKey, source: &'a dyn FileSource) -> Self {
        Self {
            content,
            key,
            source,
            blobs: Vec::new(),
        }
    }

    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn blobs(&self) -> &[FacetBlob] {
        &self.blobs
    }

    pub fn into_parts(self) -> (Value, Vec<FacetBlob>) {
        (self.content, self.blobs)
    }

    /// Replace script placeholders with the referenced source text
    ///
    /// Returns the number of scripts loaded. Inline scripts are untouched.
    pub fn load_scripts(&mut self) -> Result<usize> {
        let references: Vec<(RefPath, String)> = find_nodes(&self.content, "script")
            .into_iter()
            .filter_map(|(path, value)| {
                let reference = Payload::classify(value.as_str()?).reference()?;
                Some((path, reference.to_string()))
            })
            .collect();

        for (path, reference) in &references {
            if let Ancestor::Found(owner) = find_owner(&self.content, path, INBOUND_IDENTITY) {
                let identity = owner
                    .path
                    .get(&self.content)
                    .and_then(|o| identity_of(o, INBOUND_IDENTITY));
                debug!("Loading script {} for {}", reference, identity.unwrap_or_default());
            }
            let source = self.source.read_text(reference)?;
            path.set(&mut self.content, Value::String(source));
        }

        Ok(references.len())
    }

    /// Replace template block placeholders with the referenced bodies
    ///
    /// Applies to template sections with a `localizations` array.
    pub fn load_templates(&mut self) -> Result<usize> {
        if !self.key.is_template() {
            return Ok(0);
        }
        let Some(localizations) = self.content.get("localizations").and_then(Value::as_array) else {
            return Ok(0);
        };

        let mut references = Vec::new();
        for (index, localization) in localizations.iter().enumerate() {
            let Some((relative, blocks)) = first_array(localization, "content") else {
                continue;
            };
            let content_path = RefPath::root()
                .child_key("localizations")
                .child_index(index)
                .join(&relative);
            for (i, block) in blocks.iter().enumerate() {
                let reference = block
                    .get("data")
                    .and_then(Value::as_str)
                    .and_then(|data| Payload::classify(data).reference());
                if let Some(reference) = reference {
                    references.push((content_path.child_index(i).child_key("data"), reference.to_string()));
                }
            }
        }

        for (path, reference) in &references {
            let body = self.source.read_text(reference)?;
            path.set(&mut self.content, Value::String(body));
        }

        Ok(references.len())
    }

    /// Tag facet owners with a `streamId` and load their asset bytes
    ///
    /// Every `resourceId` node's owner gets a fresh correlation id. Owners
    /// holding a `filePath` placeholder have the file read into a
    /// [`FacetBlob`] and the `filePath` field removed.
    pub fn load_facets(&mut self) -> Result<usize> {
        let nodes: Vec<RefPath> = find_nodes(&self.content, "resourceId")
            .into_iter()
            .map(|(path, _)| path)
            .collect();

        let mut loaded = 0;
        for node in nodes {
            let owner = match find_owner(&self.content, &node, INBOUND_IDENTITY) {
                Ancestor::Found(owner) => owner,
                Ancestor::NotFound => {
                    debug!("resourceId at {} has no owner; skipped", node);
                    continue;
                }
            };
            let Some(Value::Object(map)) = owner.path.get_mut(&mut self.content) else {
                continue;
            };

            let stream_id = Uuid::new_v4().to_string();
            map.insert("streamId".to_string(), Value::String(stream_id.clone()));

            let reference = match map.get("filePath") {
                Some(Value::String(file_path)) => match Payload::classify(file_path) {
                    Payload::FileReference(reference) => Some(reference.to_string()),
                    Payload::Inline(other) => {
                        warn!("filePath '{}' at {} is not a file reference", other, owner.path);
                        None
                    }
                },
                _ => None,
            };

            if let Some(reference) = reference {
                let data = self.source.read(&reference)?;
                self.blobs.push(FacetBlob {
                    stream_id,
                    data,
                });
                map.remove("filePath");
                loaded += 1;
            }
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    /// In-memory file source keyed by placeholder
    #[derive(Default)]
    struct MemorySource {
        files: HashMap<String, Vec<u8>>,
    }

    impl MemorySource {
        fn with(mut self, reference: &str, data: &[u8]) -> Self {
            self.files.insert(reference.to_string(), data.to_vec());
            self
        }
    }

    impl FileSource for MemorySource {
        fn read(&self, reference: &str) -> Result<Vec<u8>> {
            self.files.get(reference).cloned().ok_or_else(|| {
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, reference.to_string()))
            })
        }
    }

    #[test]
    fn test_load_scripts() {
        let source = MemorySource::default().with("/env/js/trigger.c_a.js", b"return 42");
        let record = json!({
            "object": "script",
            "name": "c_a",
            "script": "/env/js/trigger.c_a.js",
            "hooks": [{ "name": "inline", "script": "return 1" }]
        });
        let mut section = InboundSection::new(record, SectionKey::from("script"), &source);

        assert_eq!(section.load_scripts().unwrap(), 1);
        assert_eq!(section.content()["script"], json!("return 42"));
        assert_eq!(section.content()["hooks"][0]["script"], json!("return 1"));
    }

    #[test]
    fn test_load_scripts_missing_file_is_fatal() {
        let source = MemorySource::default();
        let record = json!({ "name": "c_a", "script": "/env/js/missing.js" });
        let mut section = InboundSection::new(record, SectionKey::from("script"), &source);
        assert!(section.load_scripts().is_err());
    }

    #[test]
    fn test_load_templates() {
        let source = MemorySource::default()
            .with("/env/tpl/t.en.html.html", b"<p>Hi</p>")
            .with("/env/tpl/t.fr.html.html", b"<p>Salut</p>");
        let record = json!({
            "object": "template",
            "name": "t",
            "localizations": [
                { "locale": "en", "content": [
                    { "name": "html", "data": "/env/tpl/t.en.html.html" },
                    { "name": "subject", "data": "Welcome" }
                ]},
                { "locale": "fr", "content": [
                    { "name": "html", "data": "/env/tpl/t.fr.html.html" }
                ]}
            ]
        });
        let mut section = InboundSection::new(record, SectionKey::from("template"), &source);

        assert_eq!(section.load_templates().unwrap(), 2);
        let content = section.content();
        assert_eq!(content["localizations"][0]["content"][0]["data"], json!("<p>Hi</p>"));
        assert_eq!(content["localizations"][0]["content"][1]["data"], json!("Welcome"));
        assert_eq!(content["localizations"][1]["content"][0]["data"], json!("<p>Salut</p>"));
    }

    #[test]
    fn test_load_templates_skips_other_keys() {
        let source = MemorySource::default();
        let record = json!({ "localizations": [{ "content": [{ "data": "/env/tpl/x.html" }] }] });
        let mut section = InboundSection::new(record, SectionKey::from("view"), &source);
        assert_eq!(section.load_templates().unwrap(), 0);
    }

    #[test]
    fn test_load_facets() {
        let source = MemorySource::default().with("/env/assets/app.portal.logo.png", &[0x89, 0x50]);
        let record = json!({
            "object": "app",
            "name": "portal",
            "logo": { "name": "logo", "resourceId": "r1", "filePath": "/env/assets/app.portal.logo.png" },
            "banner": { "name": "banner", "resourceId": "r2" }
        });
        let mut section = InboundSection::new(record, SectionKey::from("app"), &source);

        assert_eq!(section.load_facets().unwrap(), 1);
        assert_eq!(section.blobs().len(), 1);

        let content = section.content().clone();
        let logo = &content["logo"];
        assert!(logo.get("filePath").is_none());
        assert_eq!(logo["streamId"], json!(section.blobs()[0].stream_id));
        assert_eq!(section.blobs()[0].data, vec![0x89, 0x50]);
        assert!(content["banner"]["streamId"].is_string());
        assert_ne!(content["banner"]["streamId"], logo["streamId"]);
    }

    #[test]
    fn test_load_facets_without_owner() {
        let source = MemorySource::default();
        let record = json!({ "a": { "resourceId": "x" } });
        let mut section = InboundSection::new(record.clone(), SectionKey::default(), &source);
        assert_eq!(section.load_facets().unwrap(), 0);
        assert_eq!(section.content(), &record);
    }

    #[test]
    fn test_facet_blob_json() {
        let blob = FacetBlob {
            stream_id: "s".into(),
            data: b"hello".to_vec(),
        };
        assert_eq!(blob.to_json(), json!({ "streamId": "s", "data": "aGVsbG8=" }));
    }
}
