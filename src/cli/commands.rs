//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::config::Config;
use crate::source::FileSource;
use crate::statechart::Statechart;
use std::path::Path;

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(
    config: &mut Config,
    depth: Option<usize>,
    ns_prefix_len: Option<usize>,
) {
    if let Some(depth) = depth {
        config.expansion.source_depth = depth;
    }
    if let Some(len) = ns_prefix_len {
        config.expansion.namespace_prefix_len = len;
    }
}

/// Build the statechart model for an input file
fn build_statechart(input: &Path, config: &Config) -> crate::Result<Statechart> {
    let source = FileSource::new(config.expansion.namespace_prefix_len);
    Statechart::build(input, config, &source)
}

/// Render command implementation
pub mod render {
    use super::*;
    use crate::cli::{Cli, Commands, OutputFormat};
    use crate::render::render_statechart;
    use crate::Result;
    use std::fs::File;
    use std::io::Write;

    /// Execute the render command
    pub fn execute(args: Cli, mut config: Config) -> Result<()> {
        let (input, format, output, depth, collapse_compounds, ns_prefix_len) = match args.command
        {
            Commands::Render {
                input,
                format,
                output,
                depth,
                collapse_compounds,
                ns_prefix_len,
            } => (input, format, output, depth, collapse_compounds, ns_prefix_len),
            _ => unreachable!("render::execute called with wrong command"),
        };

        apply_overrides(&mut config, depth, ns_prefix_len);
        if collapse_compounds {
            config.expansion.collapse_compounds = true;
        }

        tracing::info!("Rendering {:?}", input);
        let chart = build_statechart(&input, &config)?;
        let graph = render_statechart(&chart, &config)?;

        let rendered = match format {
            OutputFormat::Dot => graph.to_dot(),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(&graph)?;
                json.push('\n');
                json
            }
        };

        match output {
            Some(path) => {
                let mut file = File::create(&path)?;
                file.write_all(rendered.as_bytes())?;
                tracing::info!("Wrote output to {:?}", path);
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }
}

/// Stats command implementation
pub mod stats {
    use super::*;
    use crate::cli::{Cli, Commands, StatsFormat};
    use crate::statechart::{analyzer, FlatGraph};
    use crate::Result;

    /// Execute the stats command
    pub fn execute(args: Cli, mut config: Config) -> Result<()> {
        let (input, format, depth, ns_prefix_len) = match args.command {
            Commands::Stats {
                input,
                format,
                depth,
                ns_prefix_len,
            } => (input, format, depth, ns_prefix_len),
            _ => unreachable!("stats::execute called with wrong command"),
        };

        apply_overrides(&mut config, depth, ns_prefix_len);

        let chart = build_statechart(&input, &config)?;
        let flat = FlatGraph::from_statechart(&chart);
        let report = analyzer::detect_pattern(&flat);

        match format {
            StatsFormat::Table => {
                crate::cli::output::output_stats_table(
                    &mut std::io::stdout(),
                    &chart,
                    &flat,
                    &report,
                )?;
            }
            StatsFormat::Json => {
                crate::cli::output::output_stats_json(
                    &mut std::io::stdout(),
                    &chart,
                    &flat,
                    &report,
                )?;
            }
        }

        Ok(())
    }
}

/// Check command implementation
pub mod check {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::Result;

    /// Execute the check command
    pub fn execute(args: Cli, mut config: Config) -> Result<()> {
        let (input, depth, ns_prefix_len) = match args.command {
            Commands::Check {
                input,
                depth,
                ns_prefix_len,
            } => (input, depth, ns_prefix_len),
            _ => unreachable!("check::execute called with wrong command"),
        };

        apply_overrides(&mut config, depth, ns_prefix_len);

        tracing::info!("Checking {:?}", input);
        let chart = match build_statechart(&input, &config) {
            Ok(chart) => chart,
            Err(e) => {
                eprintln!("❌ {:?}: {}", input, e);
                return Err(e);
            }
        };

        let stats = chart.stats();
        println!("📋 Statechart Check Report");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("File: {}", chart.file_label);
        println!("States:      {}", stats.total_states);
        println!("Transitions: {}", stats.total_transitions);
        println!();

        if chart.orphans.is_empty() {
            println!("✅ No dead-end states");
        } else {
            println!("⚠️  Dead-end states (no outgoing transition):");
            for orphan in &chart.orphans {
                println!("   {}", orphan);
            }
        }

        Ok(())
    }
}
