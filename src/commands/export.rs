// src/commands/export.rs

//! Export command: NDJSON stream to file tree

use anyhow::{Context, Result};
use envtree::{ExportFileAdapter, RecordReader};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{read_config, resolve_format, resolve_layout};

/// Split the record stream at `input` into a tree under `output`
pub fn cmd_export(
    input: &str,
    output: &Path,
    format: Option<&str>,
    layout: Option<&str>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = read_config(config.as_deref())?;
    let format = resolve_format(format, config.export.format)?;
    let layout = resolve_layout(layout, config.export.layout)?;

    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin().lock()))
    } else {
        let file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
        Box::new(BufReader::new(file))
    };

    info!("Exporting to {} ({}, {} layout)", output.display(), format, layout);
    let adapter = ExportFileAdapter::new(output, format, layout);
    let summary = adapter
        .export(RecordReader::new(reader))
        .with_context(|| format!("Export to {} failed", output.display()))?;

    println!(
        "Exported {} records: {} documents, {} extracted files",
        summary.records, summary.documents, summary.files
    );
    if summary.unresolved_facets > 0 {
        println!("  {} facet(s) dropped: no section held their resourceId", summary.unresolved_facets);
    }
    if summary.remote_assets_skipped > 0 {
        println!("  {} remote asset(s) not downloaded", summary.remote_assets_skipped);
    }
    if summary.unplaced_assets > 0 {
        println!("  {} asset(s) skipped, host has no document", summary.unplaced_assets);
    }
    Ok(())
}
