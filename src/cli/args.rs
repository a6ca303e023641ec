//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Baler asset bundling CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: baler.toml)
    #[arg(short = 'C', long, default_value = "baler.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Bundle and minify a discovered asset collection
    #[command(visible_alias = "b")]
    Build {
        /// Asset collection JSON produced by the discovery step
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        assets: PathBuf,

        /// Output directory for bundled assets
        #[arg(short, long, default_value = "dist", value_hint = clap::ValueHint::DirPath)]
        out: PathBuf,
    },

    /// Print the content hash of a file
    Hash {
        /// File to hash
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}
