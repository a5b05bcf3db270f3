//! Edge representation

use serde::{Deserialize, Serialize};

/// A transition or send-event between states
///
/// `target` is `None` only while the edge represents a pending send-event;
/// splicing or root finishing assigns a target before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub start: String,
    pub target: Option<String>,
    /// Event name; empty for best-effort edges recovered from defective input
    pub label: String,
    /// Guard condition, rendered as a `" (cond)"` label suffix
    pub cond: Option<String>,
    pub color: Option<String>,
    pub font_color: Option<String>,
}

impl Edge {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    /// A pending send-event that has not been spliced to a target yet
    pub fn is_pending(&self) -> bool {
        self.target.is_none()
    }

    /// Get display label for the edge, with the guard condition appended
    pub fn display_label(&self) -> String {
        match &self.cond {
            Some(cond) => format!("{} ({})", self.label, cond),
            None => self.label.clone(),
        }
    }

    /// Identity used by the dedup pass
    pub fn dedup_key(&self) -> (&str, Option<&str>, &str, Option<&str>) {
        (
            self.start.as_str(),
            self.target.as_deref(),
            self.label.as_str(),
            self.color.as_deref(),
        )
    }
}
