//! Statechart model
//!
//! Turns a raw hierarchical description into a renderable scope tree:
//!
//! 1. [`builder`] walks the description top-down, collecting edges per scope,
//!    recursing into compound states and file-sourced sub-statecharts, and
//!    collapsing sub-statecharts once the depth budget runs out
//! 2. [`resolver`] redirects edges aimed at composite states onto their
//!    effective leaf initial state (runs per scope during the build)
//! 3. [`finish`] deduplicates, validates targets, flags orphaned states, and
//!    attaches the Start/Finish sentinels at the root
//!
//! [`analyzer`] offers a flattened [`petgraph`] view for statistics and
//! shape detection on the finished model.

pub mod analyzer;
pub mod builder;
pub mod edge;
pub mod finish;
pub mod node;
pub mod resolver;

pub use analyzer::{AnalysisReport, FlatGraph, GraphPattern, GraphStats};
pub use builder::TreeBuilder;
pub use edge::Edge;
pub use finish::{FINISH_NODE, START_NODE};
pub use node::{ScopeId, ScopeNode, ScopeStyle, ScopeTree, StateNode};

use crate::config::Config;
use crate::error::Result;
use crate::source::DocumentSource;
use std::path::Path;

/// A fully built and finished statechart, ready to render
#[derive(Debug)]
pub struct Statechart {
    pub tree: ScopeTree,
    pub root: ScopeId,
    /// Filename shown in the root caption
    pub file_label: String,
    /// State ids with no outgoing transition
    pub orphans: Vec<String>,
}

impl Statechart {
    /// Build the complete model for the description at `input`
    pub fn build(input: &Path, config: &Config, source: &dyn DocumentSource) -> Result<Self> {
        let document = source.load(input)?;
        let base_dir = input.parent().unwrap_or_else(|| Path::new(""));
        let file_label = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());

        tracing::info!("Building statechart model for {}", file_label);
        let (mut tree, root) =
            TreeBuilder::new(config, source).build_root(&document, base_dir, "main")?;
        let orphans = finish::finish_root(&mut tree, root, &config.style)?;

        Ok(Self {
            tree,
            root,
            file_label,
            orphans,
        })
    }

    pub fn stats(&self) -> GraphStats {
        FlatGraph::from_statechart(self).stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{NodeKind, RawDocument, RawNode, RawTransition};
    use crate::source::MockSource;

    fn leaf(id: &str, transitions: Vec<RawTransition>) -> RawNode {
        RawNode {
            id: id.to_string(),
            kind: NodeKind::Leaf,
            initial: None,
            src: None,
            transitions,
            children: Vec::new(),
        }
    }

    fn transition(event: &str, target: &str) -> RawTransition {
        RawTransition {
            event: Some(event.to_string()),
            target: Some(target.to_string()),
            cond: None,
            send_events: Vec::new(),
        }
    }

    fn send(events: &[&str]) -> RawTransition {
        RawTransition {
            event: None,
            target: None,
            cond: None,
            send_events: events.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_pipeline_end_to_end() {
        // Idle --start--> C (compound, initial Working); Working emits done
        let mut source = MockSource::new();
        source.insert(
            "machine.xml",
            RawDocument {
                initial: "Idle".to_string(),
                states: vec![
                    leaf("Idle", vec![transition("start", "C")]),
                    RawNode {
                        id: "C".to_string(),
                        kind: NodeKind::Compound,
                        initial: Some("Working".to_string()),
                        src: None,
                        transitions: Vec::new(),
                        children: vec![leaf("Working", vec![send(&["done"])])],
                    },
                ],
            },
        );

        let config = Config::default();
        let chart = Statechart::build(Path::new("machine.xml"), &config, &source).unwrap();

        assert_eq!(chart.file_label, "machine.xml");
        assert!(chart.orphans.is_empty());

        let root = &chart.tree[chart.root];
        // the edge into C resolved onto its initial leaf
        assert!(root.in_edges.iter().any(|e| {
            e.start == "Idle" && e.target.as_deref() == Some("Working") && e.label == "start"
        }));
        // the unreceived send-event was routed into Finish
        assert!(root.in_edges.iter().any(|e| {
            e.start == "Working" && e.target.as_deref() == Some(FINISH_NODE) && e.label == "done"
        }));
        assert!(root.in_edges.iter().any(|e| {
            e.start == START_NODE && e.target.as_deref() == Some("Idle")
        }));

        let stats = chart.stats();
        assert_eq!(stats.total_transitions, 3);
    }

    #[test]
    fn test_sourced_sub_statechart_expansion() {
        // depth budget 2: the sub-file at level 1 is embedded, not collapsed
        let mut source = MockSource::new();
        source.insert(
            "main.xml",
            RawDocument {
                initial: "S".to_string(),
                states: vec![
                    RawNode {
                        id: "S".to_string(),
                        kind: NodeKind::Sourced,
                        initial: None,
                        src: Some("sub.xml".to_string()),
                        transitions: vec![transition("S.finished", "End")],
                        children: Vec::new(),
                    },
                    leaf("End", vec![]),
                ],
            },
        );
        source.insert(
            "sub.xml",
            RawDocument {
                initial: "Inner".to_string(),
                states: vec![leaf("Inner", vec![send(&["finished"])])],
            },
        );

        let mut config = Config::default();
        config.expansion.source_depth = 2;

        let chart = Statechart::build(Path::new("main.xml"), &config, &source).unwrap();
        let root = &chart.tree[chart.root];
        let sub = chart.tree[chart.root].sources.get("S").copied().unwrap();
        assert_eq!(chart.tree[sub].label, "sub.xml");
        assert!(root.in_edges.iter().any(|e| {
            e.start == "Inner" && e.target.as_deref() == Some("End") && e.label == "finished"
        }));
    }

    #[test]
    fn test_unknown_target_surfaces_from_build() {
        let mut source = MockSource::new();
        source.insert(
            "machine.xml",
            RawDocument {
                initial: "A".to_string(),
                states: vec![leaf("A", vec![transition("go", "Missing")])],
            },
        );

        let config = Config::default();
        let err = Statechart::build(Path::new("machine.xml"), &config, &source).unwrap_err();
        assert!(err.is_resolution_error());
    }

    #[test]
    fn test_dead_end_states_reported() {
        let mut source = MockSource::new();
        source.insert(
            "machine.xml",
            RawDocument {
                initial: "A".to_string(),
                states: vec![leaf("A", vec![transition("go", "B")]), leaf("B", vec![])],
            },
        );

        let config = Config::default();
        let chart = Statechart::build(Path::new("machine.xml"), &config, &source).unwrap();
        assert_eq!(chart.orphans, vec!["B"]);
        let root = &chart.tree[chart.root];
        assert!(root.in_edges.iter().any(|e| {
            e.start == "B"
                && e.target.as_deref() == Some(FINISH_NODE)
                && e.label == finish::ORPHAN_LABEL
        }));
    }
}
