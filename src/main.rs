// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::io;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr; stdout may carry the record stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            layout,
            config,
        } => commands::cmd_export(&input, &output, format.as_deref(), layout.as_deref(), config),

        Commands::Import {
            input,
            output,
            format,
            config,
        } => commands::cmd_import(&input, &output, format.as_deref(), config),

        Commands::Classify { key, object } => commands::cmd_classify(&key, object.as_deref()),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "envtree", &mut io::stdout());
            Ok(())
        }
    }
}
