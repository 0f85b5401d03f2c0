// src/commands/mod.rs
//! Command handlers for the envtree CLI

mod classify;
mod export;
mod import;

pub use classify::cmd_classify;
pub use export::cmd_export;
pub use import::cmd_import;

use anyhow::{Context, Result};
use envtree::{EnvtreeConfig, Format, Layout, load_config};
use std::path::Path;

/// Load the configuration file, attaching the path to any error
fn read_config(path: Option<&Path>) -> Result<EnvtreeConfig> {
    load_config(path).with_context(|| match path {
        Some(p) => format!("Failed to load config {}", p.display()),
        None => format!("Failed to load {}", envtree::DEFAULT_CONFIG_PATH),
    })
}

/// A `--format` flag wins over the configured value
fn resolve_format(flag: Option<&str>, configured: Format) -> Result<Format> {
    match flag {
        Some(s) => Format::parse(s).with_context(|| format!("Invalid --format '{}'", s)),
        None => Ok(configured),
    }
}

fn resolve_layout(flag: Option<&str>, configured: Layout) -> Result<Layout> {
    match flag {
        Some(s) => Layout::parse(s).with_context(|| format!("Invalid --layout '{}'", s)),
        None => Ok(configured),
    }
}
