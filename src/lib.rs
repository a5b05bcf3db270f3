//! Statechart Visualizer
//!
//! A tool for rendering hierarchical statechart descriptions as directed
//! graphs.
//!
//! This library provides functionality for:
//! - Parsing XML statechart descriptions, including file-sourced
//!   sub-statecharts
//! - Building a nested scope-tree model with composite-target resolution
//! - Collapsing sub-statecharts beyond a configurable nesting depth
//! - Detecting unreachable states and structural graph patterns
//! - Serializing the model as Graphviz DOT or JSON

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod source;
pub mod statechart;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
