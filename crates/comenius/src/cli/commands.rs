//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Comenius - progressive tutorial generation over streaming LLM backends
#[derive(Parser, Debug)]
#[command(name = "comenius")]
#[command(about = "Generate hierarchical tutorials from a topic, streaming events as JSON lines", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a tutorial, streaming events to stdout as JSON lines
    Generate(GenerateArgs),

    /// Check that a configured provider answers its health probe
    Check {
        /// Provider to check (defaults to the configured default)
        #[arg(long)]
        provider: Option<String>,
    },
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Topic to build the tutorial around
    pub topic: String,

    /// Session identifier, the handle for cancellation
    #[arg(long, default_value = "cli")]
    pub session: String,

    /// Provider to generate with (defaults to the configured default)
    #[arg(long)]
    pub provider: Option<String>,

    /// Resume from a previously saved tutorial JSON file
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Save the finished tutorial to a JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Run a web search for background context before generating
    #[arg(long)]
    pub search: bool,

    /// Give up on a stage unit after this many attempts (default: retry forever)
    #[arg(long)]
    pub max_attempts: Option<u32>,
}
