// src/section/naming.rs

//! Naming helpers for extracted files and folders
//!
//! Small, deterministic string transforms: slugs for identities, plural
//! folder names for object types, and file extensions for MIME types.

use regex::Regex;
use std::sync::LazyLock;

/// Custom object names: `c_` prefixed or namespaced with `ns__`
static CUSTOM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:c_|[A-Za-z0-9]+__)[A-Za-z0-9_]+$").unwrap());

/// Nouns that keep their form in the plural
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "information",
    "media",
    "metadata",
    "news",
    "series",
    "species",
];

/// Irregular plurals (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("index", "indices"),
    ("man", "men"),
    ("person", "people"),
    ("woman", "women"),
];

/// MIME type to preferred file extension
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("application/javascript", "js"),
    ("application/json", "json"),
    ("application/octet-stream", "bin"),
    ("application/pdf", "pdf"),
    ("application/x-yaml", "yaml"),
    ("application/xml", "xml"),
    ("application/zip", "zip"),
    ("audio/mpeg", "mp3"),
    ("image/bmp", "bmp"),
    ("image/gif", "gif"),
    ("image/jpeg", "jpeg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/vnd.microsoft.icon", "ico"),
    ("image/webp", "webp"),
    ("image/x-icon", "ico"),
    ("text/css", "css"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("text/javascript", "js"),
    ("text/markdown", "md"),
    ("text/plain", "txt"),
    ("text/xml", "xml"),
    ("text/yaml", "yaml"),
    ("video/mp4", "mp4"),
];

/// Whether an object name is a custom (tenant defined) object
pub fn is_custom_name(name: &str) -> bool {
    CUSTOM_NAME.is_match(name)
}

/// Pluralize an object name for use as a leaf folder
///
/// Rules apply to the end of the name, so `c_study` becomes `c_studies`.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.iter().any(|u| lower.ends_with(u)) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        if lower == *singular || lower.ends_with(&format!("_{}", singular)) {
            return format!("{}{}", &word[..word.len() - singular.len()], plural);
        }
    }

    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Turn an identity into a file-name friendly slug
///
/// Characters outside the allowed set are dropped, then runs of whitespace
/// or the replacement character collapse into a single replacement.
pub fn slugify(input: &str, replacement: char) -> String {
    let kept: String = input.chars().filter(|c| is_slug_char(*c)).collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_run = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() || c == replacement {
            if !in_run {
                slug.push(replacement);
                in_run = true;
            }
        } else {
            slug.push(c);
            in_run = false;
        }
    }
    slug
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '_' | '$' | '*' | '+' | '~' | '.' | '(' | ')' | '\'' | '"' | '!' | '-' | ':' | '@'
        )
}

/// Preferred file extension for a MIME type
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == essence)
        .map(|(_, ext)| *ext)
}
