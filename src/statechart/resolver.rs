//! Target resolver
//!
//! Edges targeting a composite state are redirected onto that composite's
//! effective leaf initial state: the target is replaced by the child's
//! `initial_state` and resolution descends into the child, repeating until
//! the target names a leaf or nothing known in the current scope. Collapsed
//! (non-drawn) composites are rendered as single nodes, so resolution stops
//! at their id instead of descending.

use super::node::{ScopeId, ScopeTree};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Redirect every inbound edge of `scope` onto its effective target.
///
/// Chain length is bounded by nesting depth; a revisited `(scope, target)`
/// pair or a target naming a composite already on the descent path is a
/// fatal `CyclicInitialState`.
pub fn resolve_scope(tree: &mut ScopeTree, scope: ScopeId) -> Result<()> {
    for index in 0..tree[scope].in_edges.len() {
        let Some(target) = tree[scope].in_edges[index].target.clone() else {
            continue;
        };
        let resolved = resolve_target(tree, scope, target)?;
        tree[scope].in_edges[index].target = Some(resolved);
    }
    Ok(())
}

/// Resolve a single target id starting from `scope`
pub fn resolve_target(tree: &ScopeTree, scope: ScopeId, mut target: String) -> Result<String> {
    let mut current = scope;
    let mut visited: HashSet<(ScopeId, String)> = HashSet::new();
    let mut descended: HashSet<String> = HashSet::new();

    while let Some(child) = drawn_composite_child(tree, current, &target) {
        if !visited.insert((current, target.clone())) {
            return Err(Error::CyclicInitialState(target));
        }
        descended.insert(target);
        target = tree[child].initial_state.clone();
        if descended.contains(&target) {
            // the initial chain points back at a composite we already
            // entered, so it can never reach a leaf
            return Err(Error::CyclicInitialState(target));
        }
        current = child;
    }

    Ok(target)
}

fn drawn_composite_child(tree: &ScopeTree, scope: ScopeId, id: &str) -> Option<ScopeId> {
    tree[scope]
        .composite_child(id)
        .filter(|&child| tree[child].draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statechart::edge::Edge;
    use crate::statechart::node::{ScopeNode, ScopeStyle};

    fn scope(level: usize, label: &str, initial: &str, father: Option<ScopeId>) -> ScopeNode {
        ScopeNode::new(
            level,
            label,
            format!("cluster_{}", label),
            initial,
            ScopeStyle::CompoundBorder,
            father,
        )
    }

    #[test]
    fn test_resolves_through_nested_compounds() {
        // root -> compound C (initial C1) -> compound C1 (initial L), L leaf
        let mut tree = ScopeTree::new();
        let root = tree.alloc(scope(0, "root", "C", None));
        let c = tree.alloc(scope(1, "C", "C1", Some(root)));
        let c1 = tree.alloc(scope(2, "C1", "L", Some(c)));
        tree[root].compounds.insert("C".to_string(), c);
        tree[c].compounds.insert("C1".to_string(), c1);
        tree[c1].leaf_ids.push("L".to_string());

        tree[root].in_edges.push(Edge::new("X").with_target("C"));
        resolve_scope(&mut tree, root).unwrap();

        assert_eq!(tree[root].in_edges[0].target.as_deref(), Some("L"));
    }

    #[test]
    fn test_leaf_and_unknown_targets_terminate() {
        let mut tree = ScopeTree::new();
        let root = tree.alloc(scope(0, "root", "A", None));
        tree[root].in_edges.push(Edge::new("A").with_target("B"));
        resolve_scope(&mut tree, root).unwrap();
        assert_eq!(tree[root].in_edges[0].target.as_deref(), Some("B"));
    }

    #[test]
    fn test_collapsed_child_stops_resolution() {
        let mut tree = ScopeTree::new();
        let root = tree.alloc(scope(0, "root", "C", None));
        let c = tree.alloc(scope(1, "C", "C1", Some(root)));
        tree[c].draw = false;
        tree[root].compounds.insert("C".to_string(), c);

        let resolved = resolve_target(&tree, root, "C".to_string()).unwrap();
        assert_eq!(resolved, "C");
    }

    #[test]
    fn test_initial_chain_back_to_ancestor_is_cyclic() {
        // C.initial = C1, C1.initial = C: can never reach a leaf
        let mut tree = ScopeTree::new();
        let root = tree.alloc(scope(0, "root", "C", None));
        let c = tree.alloc(scope(1, "C", "C1", Some(root)));
        let c1 = tree.alloc(scope(2, "C1", "C", Some(c)));
        tree[root].compounds.insert("C".to_string(), c);
        tree[c].compounds.insert("C1".to_string(), c1);

        let err = resolve_target(&tree, root, "C".to_string()).unwrap_err();
        assert!(matches!(err, Error::CyclicInitialState(_)));
    }

    #[test]
    fn test_revisited_pair_is_cyclic_not_endless() {
        // malformed arena where a child map points back to an ancestor
        let mut tree = ScopeTree::new();
        let root = tree.alloc(scope(0, "root", "C", None));
        let c = tree.alloc(scope(1, "C", "D", Some(root)));
        tree[root].compounds.insert("C".to_string(), c);
        tree[c].compounds.insert("D".to_string(), root);
        tree[root].compounds.insert("D".to_string(), c);

        let err = resolve_target(&tree, root, "C".to_string()).unwrap_err();
        assert!(matches!(err, Error::CyclicInitialState(_)));
    }
}
