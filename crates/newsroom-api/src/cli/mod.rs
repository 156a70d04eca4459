//! CLI command definitions and dispatch for the `newsroom` binary.
//!
//! Uses clap derive macros for argument parsing. Every command takes a
//! global `--json` flag for machine-readable output.

pub mod publish;
pub mod research;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Research a topic and publish it as an essay, illustration, and video.
#[derive(Parser)]
#[command(name = "newsroom", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: research, essay, illustration, storyboard,
    /// video.
    Publish {
        /// Topic to research and publish.
        topic: String,

        /// Stop after writing the essay; skip illustration, storyboard,
        /// and video.
        #[arg(long)]
        essay_only: bool,

        /// Research deadline in seconds (overrides the config file).
        #[arg(long)]
        timeout: Option<u64>,

        /// Directory for the publication artifacts (overrides the config
        /// file).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Editor feedback rounds before publishing (overrides the config
        /// file).
        #[arg(long)]
        refine_rounds: Option<u32>,
    },

    /// Research a topic and print the essay.
    Research {
        /// Topic to research.
        topic: String,

        /// Save the essay into the output directory instead of printing it.
        #[arg(long)]
        save: bool,
    },

    /// Show configuration, collaborator endpoints, and key status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}
