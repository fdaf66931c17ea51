//! Strata - asset pipeline for static-site builds.

#![allow(dead_code)]

mod cli;
mod config;
mod fingerprint;
mod handler;
mod logger;
mod manifest;
mod minify;
mod pipeline;
mod publish;
mod source;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Commands::Build { build_args } = &cli.command {
        logger::set_verbose(build_args.verbose);
    }

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Build { build_args } => run_build(&config, build_args.quiet),
        Commands::Hash { file } => print_fingerprint(file),
    }
}

/// Process the asset tree and report the outcome.
fn run_build(config: &Config, quiet: bool) -> Result<()> {
    manifest::clear();
    let count = pipeline::build_tree(config, quiet)?;

    if count == 0 {
        log!("warning"; "no source files in {}", config.root_relative(&config.build.source).display());
    } else {
        log!("build"; "done, {} file{}", count, if count == 1 { "" } else { "s" });
    }
    Ok(())
}

/// Print the fingerprinted filename for a single file.
fn print_fingerprint(file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read: {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", file.display()))?;

    let hash = fingerprint::fingerprint(&bytes);
    println!("{}", fingerprint::fingerprinted_path(name, &hash));
    Ok(())
}
