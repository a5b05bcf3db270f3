//! Parser module - raw statechart description model
//!
//! The XML reader in [`xml`] produces the raw model defined here. Each state
//! node is classified exactly once into a [`NodeKind`]; everything downstream
//! pattern-matches on that tag instead of re-testing attribute presence.

use serde::{Deserialize, Serialize};

pub mod xml;

pub use xml::parse_document;

/// A raw statechart description, one per file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Id of the state entered on arrival, from the root `initial` attribute
    pub initial: String,
    /// Direct child states of the document root
    pub states: Vec<RawNode>,
}

/// A raw state node before scope-tree construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub kind: NodeKind,
    /// `initial` attribute; present exactly on compound states
    pub initial: Option<String>,
    /// `src` attribute; present exactly on sourced states
    pub src: Option<String>,
    /// Transitions declared directly on this node (proxy transitions, for a
    /// sourced state)
    pub transitions: Vec<RawTransition>,
    /// Nested state nodes (populated for compound states)
    pub children: Vec<RawNode>,
}

/// A raw transition or send-event declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransition {
    pub event: Option<String>,
    pub target: Option<String>,
    pub cond: Option<String>,
    /// Event names of nested `send` children (send-events emitted outward)
    pub send_events: Vec<String>,
}

/// Classification of a state node, decided once at parse time:
/// `parallel` tag wins, then `initial` makes a compound, `src` a sourced
/// state, and anything else is a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf,
    Compound,
    Sourced,
    Parallel,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Leaf => "leaf",
            NodeKind::Compound => "compound",
            NodeKind::Sourced => "sourced",
            NodeKind::Parallel => "parallel",
        }
    }
}

/// Strip the leading `"<qualifier>."` segment from an event name, turning
/// e.g. `"player.stop"` into `"stop"`. Events without a qualifier pass
/// through unchanged.
pub fn reduce_event(event: &str) -> &str {
    match event.split_once('.') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => event,
    }
}
