// src/filesystem/path.rs

//! Path handling for file reference placeholders
//!
//! Placeholders in records look like absolute paths (`/env/js/a.js`) but are
//! always relative to the run root. These helpers turn them into real paths
//! without letting a crafted record escape that root.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Normalize a placeholder into a relative path
///
/// Leading slashes and `.` components are dropped; `..` is rejected.
///
/// # Examples
///
/// ```
/// use envtree::filesystem::path::sanitize_path;
/// use std::path::PathBuf;
///
/// assert_eq!(sanitize_path("/env/js/a.js").unwrap(), PathBuf::from("env/js/a.js"));
/// assert!(sanitize_path("/env/../../etc/passwd").is_err());
/// ```
pub fn sanitize_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();
    let relative = path_str.trim_start_matches('/');

    let mut normalized = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::PathTraversal(path_str.to_string()));
            }
            Component::Prefix(_) | Component::RootDir => {}
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::InvalidPath(format!("Empty path after sanitization: '{}'", path_str)));
    }

    Ok(normalized)
}

/// Join a placeholder onto the run root
///
/// ```
/// use envtree::filesystem::path::safe_join;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     safe_join(Path::new("/tmp/run"), "/env/assets/logo.png").unwrap(),
///     PathBuf::from("/tmp/run/env/assets/logo.png")
/// );
/// ```
pub fn safe_join(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf> {
    let root = root.as_ref();
    let joined = root.join(sanitize_path(path.as_ref())?);

    // Symlinks inside the tree may still point outside of it
    if let (Ok(canonical_root), Ok(canonical_joined)) = (root.canonicalize(), joined.canonicalize())
        && !canonical_joined.starts_with(&canonical_root)
    {
        return Err(Error::PathTraversal(format!(
            "Path {} escapes root {}",
            joined.display(),
            root.display()
        )));
    }

    Ok(joined)
}

/// Turn an extracted name into a single path component
///
/// Separators become `_`; names that would be `.`, `..` or empty are rejected.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let cleaned = name.replace(['/', '\\'], "_");
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(Error::InvalidPath(format!("Invalid file name: '{}'", name)));
    }
    Ok(cleaned)
}

/// Relative output path (`/env/scripts/x.yaml`) for a file inside a folder
pub fn output_path(folder: &str, file_name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("/{}", file_name)
    } else {
        format!("/{}/{}", folder, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_strips_marker_slash() {
        assert_eq!(
            sanitize_path("/env/tpl/a.html").unwrap(),
            PathBuf::from("env/tpl/a.html")
        );
        assert_eq!(
            sanitize_path("///env/./js/b.js").unwrap(),
            PathBuf::from("env/js/b.js")
        );
    }

    #[test]
    fn test_sanitize_path_traversal_rejected() {
        assert!(sanitize_path("..").is_err());
        assert!(sanitize_path("/env/../../secret").is_err());
        assert!(sanitize_path("env/js/../../../x").is_err());
    }

    #[test]
    fn test_sanitize_path_empty_rejected() {
        assert!(sanitize_path("").is_err());
        assert!(sanitize_path("/").is_err());
        assert!(sanitize_path("./").is_err());
    }

    #[test]
    fn test_safe_join() {
        let root = PathBuf::from("/tmp/envtree-run");
        assert_eq!(
            safe_join(&root, "/env/js/a.js").unwrap(),
            PathBuf::from("/tmp/envtree-run/env/js/a.js")
        );
        assert!(safe_join(&root, "/env/../../etc/passwd").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("app.portal.logo").unwrap(), "app.portal.logo");
        assert_eq!(sanitize_filename("a/b").unwrap(), "a_b");
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("").is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("env/scripts", "a.yaml"), "/env/scripts/a.yaml");
        assert_eq!(output_path("", "manifest.yaml"), "/manifest.yaml");
    }
}
