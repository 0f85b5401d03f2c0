// src/commands/import.rs

//! Import command: file tree to NDJSON stream

use anyhow::{Context, Result};
use envtree::{ImportFileAdapter, write_record};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{read_config, resolve_format};

/// Rebuild the record stream from the tree at `input`
pub fn cmd_import(input: &Path, output: &str, format: Option<&str>, config: Option<PathBuf>) -> Result<()> {
    let config = read_config(config.as_deref())?;
    let format = resolve_format(format, config.import.format)?;

    let writer: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
        Box::new(file)
    };
    let mut writer = BufWriter::new(writer);

    info!("Importing {} ({})", input.display(), format);
    let adapter = ImportFileAdapter::new(input, format);
    let summary = adapter
        .import(|item| write_record(&mut writer, &item))
        .with_context(|| format!("Import from {} failed", input.display()))?;
    writer.flush().context("Failed to flush output")?;

    info!(
        "Wrote {} records and {} blobs ({} scripts, {} templates restored)",
        summary.records, summary.blobs, summary.scripts, summary.templates
    );
    Ok(())
}
