//! Scope-tree representation
//!
//! One [`ScopeNode`] per nesting level of the statechart: the root document,
//! each compound state, and each expanded file-sourced sub-statechart. All
//! scopes live in a [`ScopeTree`] arena and reference each other through
//! [`ScopeId`] indices; the `father` back-reference is a plain index that is
//! never traversed during teardown.

use super::edge::Edge;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Arena index of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub usize);

/// Fill/border styling of a scope's sub-graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeStyle {
    /// Root graph, no fill
    Plain,
    /// Sourced sub-scope: filled grey or white depending on level parity
    LevelFill,
    /// Compound state: bordered, unfilled
    CompoundBorder,
}

/// An explicitly styled node declared in a scope (collapsed composites and
/// the root sentinels); ordinary leaf states are declared implicitly by the
/// edges that reference them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub id: String,
    pub shape: Option<String>,
    pub style: Option<String>,
    /// Fill color; `None` renders with the default fill
    pub color: Option<String>,
}

impl StateNode {
    pub fn filled(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: None,
            style: Some("filled".to_string()),
            color: None,
        }
    }

    pub fn shaped(id: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: Some(shape.into()),
            style: None,
            color: None,
        }
    }

    pub fn filled_shaped(id: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: Some(shape.into()),
            style: Some("filled".to_string()),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// One nesting level of the statechart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeNode {
    /// Depth, 0 at root
    pub level: usize,
    /// Caption of the sub-graph (state id or source filename)
    pub label: String,
    /// Graph name; nested scopes carry the renderer's `cluster_` prefix
    pub graph_name: String,
    /// Id of the state entered on arrival; must name a direct child
    pub initial_state: String,
    /// `false` collapses the whole scope into a single node
    pub draw: bool,
    pub style: ScopeStyle,
    /// Edges whose start is inside this scope and whose target is known
    pub in_edges: Vec<Edge>,
    /// Pending send-events, spliced or rerouted by the enclosing scope
    pub out_edges: Vec<Edge>,
    /// Compound-state children by state id
    pub compounds: IndexMap<String, ScopeId>,
    /// Expanded file-sourced children by state id
    pub sources: IndexMap<String, ScopeId>,
    /// Parallel-state children by state id (never populated, see builder)
    pub parallels: IndexMap<String, ScopeId>,
    /// Explicitly styled nodes declared in this scope
    pub nodes: Vec<StateNode>,
    /// Leaf state ids declared directly in this scope
    pub leaf_ids: Vec<String>,
    /// Enclosing scope; upward lookup only
    pub father: Option<ScopeId>,
}

impl ScopeNode {
    pub fn new(
        level: usize,
        label: impl Into<String>,
        graph_name: impl Into<String>,
        initial_state: impl Into<String>,
        style: ScopeStyle,
        father: Option<ScopeId>,
    ) -> Self {
        Self {
            level,
            label: label.into(),
            graph_name: graph_name.into(),
            initial_state: initial_state.into(),
            draw: true,
            style,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            compounds: IndexMap::new(),
            sources: IndexMap::new(),
            parallels: IndexMap::new(),
            nodes: Vec::new(),
            leaf_ids: Vec::new(),
            father,
        }
    }

    /// Look up a composite (compound, sourced, or parallel) child by id
    pub fn composite_child(&self, id: &str) -> Option<ScopeId> {
        self.compounds
            .get(id)
            .or_else(|| self.sources.get(id))
            .or_else(|| self.parallels.get(id))
            .copied()
    }

    /// Composite children in insertion order (compounds before sources,
    /// matching the embedding order of the renderer)
    pub fn composite_children(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.compounds
            .values()
            .chain(self.sources.values())
            .copied()
    }
}

/// Arena owning every scope of one statechart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeTree {
    scopes: Vec<ScopeNode>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, scope: ScopeNode) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeNode> {
        self.scopes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ScopeNode> {
        self.scopes.iter_mut()
    }
}

impl Index<ScopeId> for ScopeTree {
    type Output = ScopeNode;

    fn index(&self, id: ScopeId) -> &ScopeNode {
        &self.scopes[id.0]
    }
}

impl IndexMut<ScopeId> for ScopeTree {
    fn index_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.scopes[id.0]
    }
}
