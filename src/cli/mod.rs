//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Statechart Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "statechart-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a statechart description to a diagram source
    Render {
        /// Path to the statechart description file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "dot")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How many nesting levels of file-sourced sub-statecharts to expand
        #[arg(short, long)]
        depth: Option<usize>,

        /// Draw compound states as single nodes
        #[arg(long)]
        collapse_compounds: bool,

        /// Length of the XML namespace prefix to strip from element names
        #[arg(long)]
        ns_prefix_len: Option<usize>,
    },

    /// Print structural statistics for a statechart description
    Stats {
        /// Path to the statechart description file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: StatsFormat,

        /// How many nesting levels of file-sourced sub-statecharts to expand
        #[arg(short, long)]
        depth: Option<usize>,

        /// Length of the XML namespace prefix to strip from element names
        #[arg(long)]
        ns_prefix_len: Option<usize>,
    },

    /// Validate a statechart description without rendering it
    Check {
        /// Path to the statechart description file
        input: PathBuf,

        /// How many nesting levels of file-sourced sub-statecharts to expand
        #[arg(short, long)]
        depth: Option<usize>,

        /// Length of the XML namespace prefix to strip from element names
        #[arg(long)]
        ns_prefix_len: Option<usize>,
    },
}

/// Output format types for `render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// DOT format (Graphviz)
    Dot,
    /// JSON document model
    Json,
}

/// Output format types for `stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    /// Plain text table
    Table,
    /// JSON output
    Json,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Render { .. } => commands::render::execute(args, config),
        Commands::Stats { .. } => commands::stats::execute(args, config),
        Commands::Check { .. } => commands::check::execute(args, config),
    }
}
