//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub expansion: ExpansionConfig,

    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings controlling how composite states are expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Maximum nesting level at which file-sourced sub-statecharts are still
    /// expanded; a sourced state at or beyond this level is collapsed into a
    /// single node
    #[serde(default = "default_source_depth")]
    pub source_depth: usize,

    /// Collapse compound states into single filled nodes instead of nested
    /// sub-graphs
    #[serde(default)]
    pub collapse_compounds: bool,

    /// Length of the namespace prefix stripped from tag names before
    /// comparison (e.g. an expanded `{uri}` qualifier)
    #[serde(default)]
    pub namespace_prefix_len: usize,
}

/// Edge and scope styling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Keyword rules applied to transition event names, first match wins
    #[serde(default = "default_event_colors")]
    pub event_colors: Vec<EventColorRule>,

    /// Color used for send-event edges and cross-boundary proxy edges
    #[serde(default = "default_send_event_color")]
    pub send_event_color: String,

    /// Border color of expanded compound-state sub-graphs
    #[serde(default = "default_compound_border_color")]
    pub compound_border_color: String,

    /// Highlight color for states with no outgoing transition
    #[serde(default = "default_orphan_color")]
    pub orphan_color: String,
}

/// A substring-match rule coloring transition events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventColorRule {
    pub keyword: String,
    pub color: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_source_depth() -> usize {
    0
}

fn default_event_colors() -> Vec<EventColorRule> {
    let rule = |keyword: &str, color: &str| EventColorRule {
        keyword: keyword.to_string(),
        color: color.to_string(),
    };
    vec![
        rule("fatal", "red"),
        rule("error", "red"),
        rule("success", "green"),
        rule("Timeout", "blue"),
    ]
}

fn default_send_event_color() -> String {
    "blue".to_string()
}

fn default_compound_border_color() -> String {
    "black".to_string()
}

fn default_orphan_color() -> String {
    "deeppink".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            source_depth: default_source_depth(),
            collapse_compounds: false,
            namespace_prefix_len: 0,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            event_colors: default_event_colors(),
            send_event_color: default_send_event_color(),
            compound_border_color: default_compound_border_color(),
            orphan_color: default_orphan_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl StyleConfig {
    /// Color for a transition event, from the first matching keyword rule.
    /// Events matching no rule keep the renderer's default color.
    pub fn event_color(&self, event: &str) -> Option<&str> {
        self.event_colors
            .iter()
            .find(|rule| event.contains(&rule.keyword))
            .map(|rule| rule.color.as_str())
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./statechart-viz.toml
    /// 2. ~/.statechart-viz/config.toml
    /// 3. /etc/statechart-viz/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("statechart-viz.toml"),
            dirs::home_dir()
                .map(|h| h.join(".statechart-viz").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/statechart-viz/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}
