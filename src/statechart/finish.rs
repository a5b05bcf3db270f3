//! Root finishing pass
//!
//! Runs once, after the whole scope tree is built: removes duplicate edges,
//! validates every remaining target against the set of renderable state ids,
//! detects dead-end states, and attaches the Start/Finish sentinels. Pending
//! send-events that survived to the root and dead-end states are wired into
//! the Finish sentinel here.

use super::edge::Edge;
use super::node::{ScopeId, ScopeTree, StateNode};
use super::resolver;
use crate::config::StyleConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Entry sentinel pointing at the root initial state
pub const START_NODE: &str = "Start";
/// Exit sentinel absorbing unrouted send-events and dead-end states
pub const FINISH_NODE: &str = "Finish";

/// Label of the synthetic edge marking a dead-end state
pub const ORPHAN_LABEL: &str = "unaccounted";

/// Finish the root scope in place; returns the ids flagged as orphaned
pub fn finish_root(tree: &mut ScopeTree, root: ScopeId, style: &StyleConfig) -> Result<Vec<String>> {
    dedup_all(tree);
    validate_targets(tree)?;
    let orphans = orphaned_states(tree);

    // the root initial may name a composite; the Start edge needs the
    // effective leaf like any other edge
    let entry = resolver::resolve_target(tree, root, tree[root].initial_state.clone())?;
    tree[root]
        .nodes
        .push(StateNode::shaped(START_NODE, "Mdiamond"));
    tree[root]
        .nodes
        .push(StateNode::shaped(FINISH_NODE, "Msquare"));
    tree[root]
        .in_edges
        .push(Edge::new(START_NODE).with_target(entry));

    let pending: Vec<Edge> = tree[root].out_edges.drain(..).collect();
    for edge in pending {
        tree[root].in_edges.push(
            edge.with_target(FINISH_NODE)
                .with_color(&style.send_event_color)
                .with_font_color(&style.send_event_color),
        );
    }

    for id in &orphans {
        tracing::warn!("state '{}' has no outgoing transition", id);
        tree[root].in_edges.push(
            Edge::new(id)
                .with_target(FINISH_NODE)
                .with_label(ORPHAN_LABEL)
                .with_color(&style.orphan_color)
                .with_font_color(&style.orphan_color),
        );
    }

    Ok(orphans)
}

/// Drop duplicate edges in every scope, keeping the first occurrence
pub fn dedup_all(tree: &mut ScopeTree) {
    for scope in tree.iter_mut() {
        dedup_edges(&mut scope.in_edges);
        dedup_edges(&mut scope.out_edges);
    }
}

fn dedup_edges(edges: &mut Vec<Edge>) {
    let mut seen: HashSet<(String, Option<String>, String, Option<String>)> = HashSet::new();
    edges.retain(|edge| {
        let (start, target, label, color) = edge.dedup_key();
        seen.insert((
            start.to_string(),
            target.map(str::to_string),
            label.to_string(),
            color.map(str::to_string),
        ))
    });
}

/// Every resolved target must name a renderable state somewhere in the tree
fn validate_targets(tree: &ScopeTree) -> Result<()> {
    let known = renderable_ids(tree);
    for scope in tree.iter() {
        if !scope.draw {
            continue;
        }
        for edge in &scope.in_edges {
            if let Some(target) = &edge.target
                && !known.contains(target.as_str())
            {
                return Err(Error::UnknownTarget(target.clone()));
            }
        }
    }
    Ok(())
}

/// Ids a rendered graph will contain a node for: declared leaves, explicitly
/// styled nodes (collapsed composites), and every edge start
fn renderable_ids(tree: &ScopeTree) -> HashSet<&str> {
    let mut ids: HashSet<&str> = HashSet::new();
    for scope in tree.iter() {
        if !scope.draw {
            continue;
        }
        ids.extend(scope.leaf_ids.iter().map(String::as_str));
        ids.extend(scope.nodes.iter().map(|node| node.id.as_str()));
        ids.extend(scope.in_edges.iter().map(|edge| edge.start.as_str()));
    }
    ids
}

/// States that appear as an edge target but never as an edge start: nothing
/// leaves them, which usually flags an authoring mistake
fn orphaned_states(tree: &ScopeTree) -> Vec<String> {
    let mut starts: HashSet<&str> = HashSet::new();
    for scope in tree.iter() {
        if !scope.draw {
            continue;
        }
        starts.extend(scope.in_edges.iter().map(|edge| edge.start.as_str()));
        starts.extend(scope.out_edges.iter().map(|edge| edge.start.as_str()));
    }

    let mut orphans = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for scope in tree.iter() {
        if !scope.draw {
            continue;
        }
        for edge in &scope.in_edges {
            let Some(target) = &edge.target else { continue };
            if !starts.contains(target.as_str()) && seen.insert(target.as_str()) {
                orphans.push(target.clone());
            }
        }
    }
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statechart::node::{ScopeNode, ScopeStyle};

    fn root_tree(initial: &str) -> (ScopeTree, ScopeId) {
        let mut tree = ScopeTree::new();
        let root = tree.alloc(ScopeNode::new(
            0,
            "",
            "main",
            initial,
            ScopeStyle::Plain,
            None,
        ));
        (tree, root)
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let (mut tree, root) = root_tree("A");
        let edge = Edge::new("A").with_target("B").with_label("go");
        let mut guarded = edge.clone();
        guarded.cond = Some("armed".to_string());
        tree[root].in_edges.push(edge);
        tree[root].in_edges.push(guarded);
        tree[root]
            .in_edges
            .push(Edge::new("A").with_target("B").with_label("stop"));

        dedup_all(&mut tree);
        assert_eq!(tree[root].in_edges.len(), 2);
        // the surviving go-edge is the unguarded first one
        assert_eq!(tree[root].in_edges[0].cond, None);
        assert_eq!(tree[root].in_edges[1].label, "stop");

        // a second pass changes nothing
        dedup_all(&mut tree);
        assert_eq!(tree[root].in_edges.len(), 2);
    }

    #[test]
    fn test_unknown_target_is_fatal() {
        let (mut tree, root) = root_tree("A");
        tree[root].leaf_ids.push("A".to_string());
        tree[root]
            .in_edges
            .push(Edge::new("A").with_target("Nowhere").with_label("go"));

        let err = finish_root(&mut tree, root, &StyleConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownTarget(t) if t == "Nowhere"));
    }

    #[test]
    fn test_dead_end_state_routed_to_finish() {
        // A --go--> B; nothing leaves B
        let (mut tree, root) = root_tree("A");
        tree[root]
            .leaf_ids
            .extend(["A".to_string(), "B".to_string()]);
        tree[root]
            .in_edges
            .push(Edge::new("A").with_target("B").with_label("go"));

        let orphans = finish_root(&mut tree, root, &StyleConfig::default()).unwrap();
        assert_eq!(orphans, vec!["B"]);

        let unaccounted = tree[root]
            .in_edges
            .iter()
            .find(|e| e.label == ORPHAN_LABEL)
            .unwrap();
        assert_eq!(unaccounted.start, "B");
        assert_eq!(unaccounted.target.as_deref(), Some(FINISH_NODE));
        assert_eq!(unaccounted.color.as_deref(), Some("deeppink"));
        // label text matches the edge color
        assert_eq!(unaccounted.font_color.as_deref(), Some("deeppink"));
    }

    #[test]
    fn test_untargeted_state_is_not_orphaned() {
        // C is declared but no edge touches it; only target-but-never-start
        // states count as dead ends
        let (mut tree, root) = root_tree("A");
        tree[root].leaf_ids.extend([
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
        ]);
        tree[root]
            .in_edges
            .push(Edge::new("A").with_target("B").with_label("go"));
        tree[root].out_edges.push(Edge::new("B").with_label("done"));

        let orphans = finish_root(&mut tree, root, &StyleConfig::default()).unwrap();
        assert!(orphans.is_empty());
    }

    #[test]
    fn test_sentinels_and_pending_routing() {
        let (mut tree, root) = root_tree("A");
        tree[root].leaf_ids.push("A".to_string());
        tree[root]
            .out_edges
            .push(Edge::new("A").with_label("shutdown"));

        finish_root(&mut tree, root, &StyleConfig::default()).unwrap();

        let start = tree[root].nodes.iter().find(|n| n.id == START_NODE).unwrap();
        assert_eq!(start.shape.as_deref(), Some("Mdiamond"));
        let finish = tree[root].nodes.iter().find(|n| n.id == FINISH_NODE).unwrap();
        assert_eq!(finish.shape.as_deref(), Some("Msquare"));

        assert!(tree[root].out_edges.is_empty());
        assert!(tree[root].in_edges.iter().any(|e| {
            e.start == START_NODE && e.target.as_deref() == Some("A")
        }));
        let routed = tree[root]
            .in_edges
            .iter()
            .find(|e| e.label == "shutdown")
            .unwrap();
        assert_eq!(routed.target.as_deref(), Some(FINISH_NODE));
        assert_eq!(routed.color.as_deref(), Some("blue"));
        assert_eq!(routed.font_color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_start_edge_resolves_composite_initial() {
        // root initial names a compound; Start must point at its leaf
        let (mut tree, root) = root_tree("C");
        let c = tree.alloc(ScopeNode::new(
            1,
            "C",
            "cluster_C",
            "C1",
            ScopeStyle::CompoundBorder,
            Some(root),
        ));
        tree[root].compounds.insert("C".to_string(), c);
        tree[c].leaf_ids.push("C1".to_string());
        tree[c]
            .in_edges
            .push(Edge::new("C1").with_target("C1").with_label("tick"));

        finish_root(&mut tree, root, &StyleConfig::default()).unwrap();
        assert!(tree[root].in_edges.iter().any(|e| {
            e.start == START_NODE && e.target.as_deref() == Some("C1")
        }));
    }
}
