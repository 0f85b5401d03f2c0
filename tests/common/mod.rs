// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::path::Path;

/// PNG signature plus a few bytes that are not valid UTF-8
pub const LOGO_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00, 0xfe];

/// JPEG start-of-image marker followed by filler
pub const PHOTO_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Writable sections in [`fixture_stream`]
pub const DOCUMENT_COUNT: usize = 11;
/// Scripts, template blocks and inline assets extracted from [`fixture_stream`]
pub const EXTRACTED_COUNT: usize = 10;
/// Facets in [`fixture_stream`] that never find a host
pub const UNRESOLVED_FACETS: usize = 2;

/// An export stream exercising every kind of section
///
/// - a facet arriving before its host (dropped)
/// - a facet whose host never appears (dropped)
/// - a remote facet (skipped, not downloaded)
/// - two scripts under one owner and one validator name on two objects,
///   both deriving the same file name
pub fn fixture_stream() -> Vec<Value> {
    vec![
        json!({
            "object": "manifest",
            "resource": "manifest",
            "objects": [ { "name": "c_study", "includes": ["*"] } ]
        }),
        json!({
            "object": "env",
            "resource": "env",
            "locale": "en_US",
            "configuration": { "minPasswordScore": 2 }
        }),
        json!({
            "object": "script",
            "resource": "script.c_before_create",
            "name": "c_before_create",
            "label": "Before Create",
            "type": "trigger",
            "script": "import logger from 'logger'\nlogger.info('creating')\nreturn true\n",
            "configuration": { "object": "c_study", "event": "create.before" }
        }),
        json!({
            "object": "script",
            "resource": "script.c_status_route",
            "name": "c_status_route",
            "label": "Status Route",
            "type": "route",
            "script": "return { status: 'ok' }",
            "configuration": { "method": "get", "path": "status", "script": "return script.arguments" }
        }),
        json!({
            "object": "object",
            "resource": "object.c_study",
            "name": "c_study",
            "label": "Study",
            "properties": [
                {
                    "name": "c_score",
                    "type": "Number",
                    "validators": [
                        { "name": "c_range", "type": "validator", "script": "return value > 0" }
                    ]
                },
                { "name": "c_title", "type": "String", "validators": [] }
            ]
        }),
        json!({
            "object": "object",
            "resource": "object.c_visit",
            "name": "c_visit",
            "label": "Visit",
            "properties": [
                {
                    "name": "c_duration",
                    "type": "Number",
                    "validators": [
                        { "name": "c_range", "type": "validator", "script": "return value < 500" }
                    ]
                }
            ]
        }),
        json!({
            "object": "template",
            "resource": "template.email",
            "name": "welcome",
            "spec": [
                { "name": "html", "mime": "text/html" },
                { "name": "plain", "mime": "text/plain" }
            ],
            "localizations": [
                {
                    "locale": "en_US",
                    "content": [
                        { "name": "html", "data": "<h1>Welcome</h1>" },
                        { "name": "plain", "data": "Welcome" }
                    ]
                },
                {
                    "locale": "fr_FR",
                    "content": [
                        { "name": "html", "data": "<h1>Bienvenue</h1>" }
                    ]
                }
            ]
        }),
        json!({
            "object": "app",
            "resource": "app.portal",
            "name": "portal",
            "label": "Portal",
            "logo": { "name": "logo", "resourceId": "res-logo" },
            "icon": { "name": "icon", "resourceId": "res-icon" }
        }),
        json!({
            "object": "facet",
            "resource": "app.portal.logo",
            "resourceId": "res-logo",
            "mime": "image/png",
            "ETag": "etag-logo",
            "base64": STANDARD.encode(LOGO_BYTES)
        }),
        json!({
            "object": "facet",
            "resource": "app.portal.icon",
            "resourceId": "res-icon",
            "mime": "image/x-icon",
            "url": "https://assets.example.invalid/icon.ico"
        }),
        json!({
            "object": "c_visit",
            "resource": "c_visit.visit1",
            "c_notes": "first visit",
            "c_photo": { "name": "c_photo", "resourceId": "res-photo" }
        }),
        json!({
            "object": "facet",
            "resource": "c_visit.visit1.c_photo",
            "resourceId": "res-photo",
            "mime": "image/jpeg",
            "base64": STANDARD.encode(PHOTO_BYTES)
        }),
        json!({
            "object": "facet",
            "resource": "c_visit.visit2.c_photo",
            "resourceId": "res-late",
            "mime": "image/jpeg",
            "base64": STANDARD.encode(PHOTO_BYTES)
        }),
        json!({
            "object": "c_visit",
            "resource": "c_visit.visit2",
            "c_notes": "second visit",
            "c_photo": { "name": "c_photo", "resourceId": "res-late" }
        }),
        json!({
            "object": "facet",
            "resource": "c_visit.gone.c_photo",
            "resourceId": "res-orphan",
            "mime": "image/jpeg",
            "base64": STANDARD.encode(PHOTO_BYTES)
        }),
        json!({
            "object": "account",
            "resource": "account.a1",
            "email": "someone@example.invalid",
            "roles": ["administrator"]
        }),
    ]
}

/// The records of [`fixture_stream`] that come back from an import
pub fn non_facet_records() -> Vec<Value> {
    fixture_stream()
        .into_iter()
        .filter(|r| r.get("object").and_then(Value::as_str) != Some("facet"))
        .collect()
}

/// Drop every `streamId` field added during import
pub fn strip_stream_ids(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("streamId");
            map.values_mut().for_each(strip_stream_ids);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_stream_ids),
        _ => {}
    }
}

/// Count files under `root` with any of the given extensions
pub fn count_files(root: &Path, extensions: &[&str]) -> usize {
    extensions
        .iter()
        .map(|ext| {
            let pattern = format!("{}/**/*.{}", root.display(), ext);
            glob::glob(&pattern)
                .unwrap()
                .filter_map(|entry| entry.ok())
                .filter(|path| path.is_file())
                .count()
        })
        .sum()
}

/// Extensions the fixture produces
pub const OUTPUT_EXTENSIONS: &[&str] = &["yaml", "json", "js", "html", "txt", "png", "jpeg", "ico"];
