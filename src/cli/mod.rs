// src/cli/mod.rs
//! CLI definitions for envtree
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.
//!
//! - `export` - Split an NDJSON record stream into a file tree
//! - `import` - Rebuild the record stream from a file tree
//! - `classify` - Show the folder a section key maps to
//! - `completions` - Generate shell completions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envtree")]
#[command(version)]
#[command(about = "Decompose environment exports into file trees and back", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an NDJSON record stream into a directory tree
    Export {
        /// Input stream file (`-` reads stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Document format (yaml, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Layout (default: one document per section, blob: single document)
        #[arg(short, long)]
        layout: Option<String>,

        /// Configuration file (default: ./envtree.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Read a directory tree back into an NDJSON record stream
    Import {
        /// Input directory
        #[arg(short, long)]
        input: PathBuf,

        /// Output stream file (`-` writes stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Document format (yaml, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Configuration file (default: ./envtree.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the relative folder a section is written to
    Classify {
        /// Section key (e.g. script, object, manifest-dependencies)
        key: String,

        /// Value of the record's `object` field
        #[arg(short, long)]
        object: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
