// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: document format
fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_parser(["yaml", "json"])
        .help("Document format")
}

/// Common argument: configuration file
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Configuration file (default: ./envtree.toml when present)")
}

fn build_cli() -> Command {
    Command::new("envtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decompose environment exports into file trees and back")
        .subcommand_required(true)
        .subcommand(
            Command::new("export")
                .about("Write an NDJSON record stream into a directory tree")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .default_value("-")
                        .help("Input stream file (- reads stdin)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .required(true)
                        .help("Output directory"),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("layout")
                        .short('l')
                        .long("layout")
                        .value_parser(["default", "blob"])
                        .help("One document per section, or a single blob document"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Read a directory tree back into an NDJSON record stream")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .required(true)
                        .help("Input directory"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value("-")
                        .help("Output stream file (- writes stdout)"),
                )
                .arg(format_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("classify")
                .about("Print the relative folder a section is written to")
                .arg(Arg::new("key").required(true).help("Section key"))
                .arg(
                    Arg::new("object")
                        .short('o')
                        .long("object")
                        .help("Value of the record's object field"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("envtree.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
