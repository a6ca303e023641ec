//! Baler - an asset bundling and minification pipeline for microservice
//! front-ends.

#![allow(dead_code)]

mod asset;
mod cli;
mod config;
mod logger;
mod pipeline;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = config::load(&cli.config)?;
    debug!("config"; "loaded `{}`", cli.config.display());

    match &cli.command {
        Commands::Build { assets, out } => cli::build::run(assets, out, &config),
        Commands::Hash { file } => cli::hash::run(file),
    }
}
