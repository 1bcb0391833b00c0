//! CLI definitions for stencil.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    version,
    about = "Structural checks for directive-based templates",
    after_help = "Examples:\n  stencil check resources/views\n  stencil check 'views/**/*.edge' --format json\n  stencil context views/home.edge --line 4 --column 12"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report structural diagnostics for template files.
    Check {
        /// Files, directories, or glob patterns.
        #[arg(required = true)]
        paths: Vec<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Configuration file (defaults to stencil.toml in the current directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the construct surrounding a position.
    Context {
        /// Template file.
        file: PathBuf,
        /// One-based line.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        line: u32,
        /// One-based column, in characters.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        column: u32,
        /// Skip the syntax tree and scan the text only.
        #[arg(long)]
        text_only: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
