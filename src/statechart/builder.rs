//! Scope-tree builder
//!
//! Builds the nested scope tree from a raw description in a single top-down,
//! depth-first pass: leaves contribute inbound edges (targeted transitions)
//! and outbound edges (pending send-events), compound states recurse in the
//! same file, and sourced states load their sub-statechart through the
//! document source — either embedding it fully or collapsing it into a
//! single node once the recursion-depth budget is exhausted.

use super::edge::Edge;
use super::node::{ScopeId, ScopeNode, ScopeStyle, ScopeTree, StateNode};
use super::resolver;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{NodeKind, RawDocument, RawNode, RawTransition, reduce_event};
use crate::source::DocumentSource;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct TreeBuilder<'a> {
    config: &'a Config,
    source: &'a dyn DocumentSource,
    tree: ScopeTree,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a Config, source: &'a dyn DocumentSource) -> Self {
        Self {
            config,
            source,
            tree: ScopeTree::new(),
        }
    }

    /// Build the root scope and everything nested inside it
    pub fn build_root(
        mut self,
        document: &RawDocument,
        base_dir: &Path,
        graph_name: &str,
    ) -> Result<(ScopeTree, ScopeId)> {
        let root = self.tree.alloc(ScopeNode::new(
            0,
            "",
            graph_name,
            document.initial.clone(),
            ScopeStyle::Plain,
            None,
        ));
        self.build_scope(root, &document.states, base_dir)?;
        Ok((self.tree, root))
    }

    /// Classify and process every child of one scope, then resolve its
    /// inbound edge targets
    fn build_scope(&mut self, scope: ScopeId, nodes: &[RawNode], base_dir: &Path) -> Result<()> {
        for node in nodes {
            match node.kind {
                NodeKind::Leaf => self.collect_leaf_edges(scope, node),
                NodeKind::Compound => self.build_compound(scope, node, base_dir)?,
                NodeKind::Sourced => self.build_sourced(scope, node, base_dir)?,
                NodeKind::Parallel => {
                    tracing::warn!(
                        "parallel state '{}' is not supported, skipping its region contents",
                        node.id
                    );
                }
            }
        }
        resolver::resolve_scope(&mut self.tree, scope)
    }

    /// Leaf state: one inbound edge per targeted transition, one outbound
    /// edge per pending send-event
    fn collect_leaf_edges(&mut self, scope: ScopeId, node: &RawNode) {
        self.tree[scope].leaf_ids.push(node.id.clone());

        for transition in &node.transitions {
            if let Some(target) = &transition.target {
                let mut edge = Edge::new(&node.id).with_target(target);
                edge.cond = transition.cond.clone();
                match &transition.event {
                    Some(event) => {
                        edge.label = reduce_event(event).to_string();
                        edge.color = self
                            .config
                            .style
                            .event_color(event)
                            .map(str::to_string);
                    }
                    None => {
                        tracing::warn!("state '{}' lacks an event in a transition", node.id);
                    }
                }
                self.tree[scope].in_edges.push(edge);
            } else if !transition.send_events.is_empty() {
                for event in &transition.send_events {
                    let mut edge = Edge::new(&node.id).with_label(event);
                    edge.cond = transition.cond.clone();
                    self.tree[scope].out_edges.push(edge);
                }
            } else if let Some(event) = &transition.event {
                // no target and no nested send: treat the event itself as
                // a pending send-event
                let mut edge = Edge::new(&node.id).with_label(event);
                edge.cond = transition.cond.clone();
                self.tree[scope].out_edges.push(edge);
            } else {
                tracing::warn!(
                    "state '{}' has a transition with no target, send-event, or event",
                    node.id
                );
                self.tree[scope].out_edges.push(Edge::new(&node.id));
            }
        }
    }

    /// Compound state: recurse into a nested scope in the same file, then
    /// reclassify the edges that escape it
    fn build_compound(&mut self, parent: ScopeId, node: &RawNode, base_dir: &Path) -> Result<()> {
        let initial = node
            .initial
            .as_ref()
            .ok_or_else(|| Error::missing_attribute("state", "initial"))?;

        let level = self.tree[parent].level + 1;
        let child = self.tree.alloc(ScopeNode::new(
            level,
            &node.id,
            format!("cluster_{}", node.id),
            initial,
            ScopeStyle::CompoundBorder,
            Some(parent),
        ));
        self.tree[parent].compounds.insert(node.id.clone(), child);

        self.build_scope(child, &node.children, base_dir)?;

        // edges whose target lies outside the compound's own child-id set
        // leave the compound together with its pending send-events
        let child_ids: HashSet<&str> = node.children.iter().map(|c| c.id.as_str()).collect();
        let (kept, mut moved): (Vec<Edge>, Vec<Edge>) = self.tree[child]
            .in_edges
            .drain(..)
            .partition(|edge| {
                edge.target
                    .as_deref()
                    .is_some_and(|target| child_ids.contains(target))
            });
        self.tree[child].in_edges = kept;
        let pending: Vec<Edge> = self.tree[child].out_edges.drain(..).collect();
        moved.extend(pending);

        let collapse = self.config.expansion.collapse_compounds;
        if collapse {
            self.tree[child].draw = false;
            self.tree[parent].nodes.push(StateNode::filled(&node.id));
        }

        for mut edge in moved {
            if collapse {
                edge.start = node.id.clone();
            }
            if edge.target.is_some() {
                self.tree[parent].in_edges.push(edge);
            } else {
                self.tree[parent].out_edges.push(edge);
            }
        }

        Ok(())
    }

    /// Sourced state: load the referenced file and embed it as a nested
    /// scope, or collapse it to one node when the depth budget is exhausted
    fn build_sourced(&mut self, parent: ScopeId, node: &RawNode, base_dir: &Path) -> Result<()> {
        let src = node
            .src
            .as_ref()
            .ok_or_else(|| Error::missing_attribute("state", "src"))?;
        let level = self.tree[parent].level + 1;

        if level >= self.config.expansion.source_depth {
            // collapsed sources are never parsed, but a dangling reference
            // should still show up in the log
            let path = base_dir.join(src);
            if !path.is_file() {
                tracing::warn!(
                    "collapsed source '{}' references missing file {:?}",
                    node.id,
                    path
                );
            }
            self.collapse_sourced(parent, node);
            return Ok(());
        }

        let path = base_dir.join(src);
        let sub_dir: PathBuf = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| src.clone());

        let document = self.source.load(&path)?;
        let child = self.tree.alloc(ScopeNode::new(
            level,
            &file_label,
            format!("cluster_{}", file_label),
            document.initial.clone(),
            ScopeStyle::LevelFill,
            Some(parent),
        ));
        self.tree[parent].sources.insert(node.id.clone(), child);

        self.build_scope(child, &document.states, &sub_dir)?;
        self.splice_sourced(parent, child, node)?;
        Ok(())
    }

    /// Connect a fully expanded sub-scope's send-events to the enclosing
    /// scope through the transitions declared on the sourcing node
    fn splice_sourced(&mut self, parent: ScopeId, child: ScopeId, node: &RawNode) -> Result<()> {
        let pending: Vec<Edge> = self.tree[child].out_edges.drain(..).collect();
        for mut edge in pending {
            let pattern = format!("{}.{}", node.id, edge.label);
            match node
                .transitions
                .iter()
                .find(|t| t.event.as_deref() == Some(pattern.as_str()))
            {
                Some(transition) if transition.target.is_some() => {
                    edge.target = transition.target.clone();
                    edge.color = Some(self.config.style.send_event_color.clone());
                    self.tree[parent].in_edges.push(edge);
                }
                Some(_) => self.tree[parent].out_edges.push(edge),
                None => {
                    tracing::warn!(
                        "no transition on '{}' matches send-event '{}', dropping edge",
                        node.id,
                        edge.label
                    );
                }
            }
        }

        // spliced edges may target composites of the enclosing scope
        resolver::resolve_scope(&mut self.tree, parent)
    }

    /// Depth budget exhausted: one double-bordered node stands in for the
    /// whole sub-statechart, with edges re-derived from the proxy
    /// transitions on the sourcing node (the file itself is not loaded)
    fn collapse_sourced(&mut self, parent: ScopeId, node: &RawNode) {
        self.tree[parent]
            .nodes
            .push(StateNode::filled_shaped(&node.id, "doublecircle"));

        for transition in &node.transitions {
            if let Some(target) = &transition.target {
                let mut edge = Edge::new(&node.id).with_target(target);
                edge.cond = transition.cond.clone();
                edge.color = Some(self.config.style.send_event_color.clone());
                match &transition.event {
                    Some(event) => edge.label = reduce_event(event).to_string(),
                    None => {
                        tracing::warn!("state '{}' lacks an event in a transition", node.id);
                    }
                }
                self.tree[parent].in_edges.push(edge);
            } else {
                self.forward_send_events(parent, node, transition);
            }
        }
    }

    fn forward_send_events(&mut self, parent: ScopeId, node: &RawNode, transition: &RawTransition) {
        if transition.send_events.is_empty() {
            if let Some(event) = &transition.event {
                self.tree[parent]
                    .out_edges
                    .push(Edge::new(&node.id).with_label(reduce_event(event)));
            }
            return;
        }
        for event in &transition.send_events {
            self.tree[parent]
                .out_edges
                .push(Edge::new(&node.id).with_label(event));
        }
    }
}
