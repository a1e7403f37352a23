//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchArgs, completions::CompletionsArgs, gdt::GdtCommands, params::ParamsCommands,
    sketch::SketchCommands,
};

#[derive(Parser)]
#[command(name = "dint")]
#[command(author, version, about = "Design-intent normalization and resolution toolkit")]
#[command(long_about = "Normalize GD&T callouts and sketch constraint phrases, resolve parameter spaces, and emit CAD automation code.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of the global and project layers
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// GD&T feature control frames
    #[command(subcommand)]
    Gdt(GdtCommands),

    /// Sketch constraints, dimensions and DOF checks
    #[command(subcommand)]
    Sketch(SketchCommands),

    /// Parameter spaces (list, inspect, resolve)
    #[command(subcommand)]
    Params(ParamsCommands),

    /// Process a file of GD&T or sketch inputs, one per line
    Batch(BatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Text for interactive use; config `default_format` can change it
    #[default]
    Auto,
    /// Human-readable text
    Text,
    /// YAML format
    Yaml,
    /// JSON format (for programming)
    Json,
}
