//! Statechart analyzer
//!
//! Flattens a finished scope tree into a plain directed graph and derives
//! structural metrics from it: state/transition counts, entry and terminal
//! states, and a coarse shape classification (linear, branching, cyclic).

use super::Statechart;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::HashMap;

/// A flattened view of a statechart: scope boundaries are discarded, every
/// renderable state becomes a node and every resolved edge a labeled edge.
pub struct FlatGraph {
    pub graph: StableGraph<String, String>,
    /// State id to graph index; one node per unique id
    pub node_index: HashMap<String, NodeIndex>,
}

impl FlatGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    pub fn from_statechart(chart: &Statechart) -> Self {
        let mut flat = Self::new();
        for scope in chart.tree.iter() {
            if !scope.draw {
                continue;
            }
            for id in &scope.leaf_ids {
                flat.intern(id);
            }
            for node in &scope.nodes {
                flat.intern(&node.id);
            }
            for edge in &scope.in_edges {
                let Some(target) = &edge.target else { continue };
                let from = flat.intern(&edge.start);
                let to = flat.intern(target);
                flat.graph.add_edge(from, to, edge.label.clone());
            }
        }
        flat
    }

    fn intern(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.to_string());
        self.node_index.insert(id.to_string(), index);
        index
    }

    /// States with no incoming edges
    pub fn find_initial_states(&self) -> Vec<&str> {
        self.states_with_degree(Direction::Incoming, 0)
    }

    /// States with no outgoing edges
    pub fn find_terminal_states(&self) -> Vec<&str> {
        self.states_with_degree(Direction::Outgoing, 0)
    }

    fn states_with_degree(&self, direction: Direction, count: usize) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, direction).count() == count)
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(String::as_str)
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_states: self.graph.node_count(),
            total_transitions: self.graph.edge_count(),
            initial_states: self.find_initial_states().len(),
            terminal_states: self.find_terminal_states().len(),
        }
    }
}

impl Default for FlatGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub initial_states: usize,
    pub terminal_states: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphPattern {
    /// A -> B -> C -> D
    Linear,

    /// A -> B
    ///   -> C
    Branching,

    /// A -> B -> A
    Cyclic,

    /// Mixed or Unrecognized
    Unknown,
}

impl GraphPattern {
    pub fn display_name(&self) -> &'static str {
        match self {
            GraphPattern::Linear => "Linear",
            GraphPattern::Branching => "Branching",
            GraphPattern::Cyclic => "Cyclic",
            GraphPattern::Unknown => "Complex/Unknown",
        }
    }
}

/// Analysis report containing pattern and metrics
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub pattern: GraphPattern,
    pub branching_factor: f64,
    pub has_cycles: bool,
}

/// Detect the shape of a flattened statechart
pub fn detect_pattern(flat: &FlatGraph) -> AnalysisReport {
    let node_count = flat.graph.node_count();

    if node_count == 0 {
        return AnalysisReport {
            pattern: GraphPattern::Unknown,
            branching_factor: 0.0,
            has_cycles: false,
        };
    }

    let has_cycles = petgraph::algo::is_cyclic_directed(&flat.graph);

    let out_degrees: Vec<usize> = flat
        .graph
        .node_indices()
        .map(|idx| flat.graph.edges_directed(idx, Direction::Outgoing).count())
        .collect();
    let branching_factor = out_degrees.iter().sum::<usize>() as f64 / node_count as f64;

    let pattern = if has_cycles {
        GraphPattern::Cyclic
    } else if out_degrees.iter().all(|&degree| degree <= 1) {
        GraphPattern::Linear
    } else {
        GraphPattern::Branching
    };

    AnalysisReport {
        pattern,
        branching_factor,
        has_cycles,
    }
}
