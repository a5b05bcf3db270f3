//! Graph rendering
//!
//! Converts a finished statechart into an ordered DOT document model and
//! serializes it. Scopes are rendered post-order: a child sub-graph is fully
//! populated before it is embedded, and once a parent has embedded a child
//! it accepts no further statements of its own.

use crate::config::Config;
use crate::error::Result;
use crate::statechart::{ScopeId, ScopeStyle, Statechart};
use serde::Serialize;

/// One DOT statement, in emission order
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    Attr {
        key: String,
        value: String,
    },
    Node {
        id: String,
        attrs: Vec<(String, String)>,
    },
    Edge {
        from: String,
        to: String,
        attrs: Vec<(String, String)>,
    },
    Subgraph(Graph),
}

/// An ordered DOT graph or cluster sub-graph
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    pub name: String,
    pub statements: Vec<Statement>,
    #[serde(skip)]
    sealed: bool,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
            sealed: false,
        }
    }

    pub fn attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        debug_assert!(!self.sealed, "graph already embedded a sub-graph");
        self.statements.push(Statement::Attr {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn node(&mut self, id: impl Into<String>, attrs: Vec<(String, String)>) {
        debug_assert!(!self.sealed, "graph already embedded a sub-graph");
        self.statements.push(Statement::Node {
            id: id.into(),
            attrs,
        });
    }

    pub fn edge(&mut self, from: impl Into<String>, to: impl Into<String>, attrs: Vec<(String, String)>) {
        debug_assert!(!self.sealed, "graph already embedded a sub-graph");
        self.statements.push(Statement::Edge {
            from: from.into(),
            to: to.into(),
            attrs,
        });
    }

    /// Embed a fully populated child; own statements are closed afterwards
    pub fn subgraph(&mut self, child: Graph) {
        self.sealed = true;
        self.statements.push(Statement::Subgraph(child));
    }

    /// Serialize to DOT source
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph \"{}\" {{\n", escape(&self.name)));
        self.write_statements(&mut out, 1);
        out.push_str("}\n");
        out
    }

    fn write_statements(&self, out: &mut String, depth: usize) {
        let indent = "    ".repeat(depth);
        for statement in &self.statements {
            match statement {
                Statement::Attr { key, value } => {
                    out.push_str(&format!("{}{}=\"{}\";\n", indent, key, escape(value)));
                }
                Statement::Node { id, attrs } => {
                    out.push_str(&format!(
                        "{}\"{}\"{};\n",
                        indent,
                        escape(id),
                        attr_list(attrs)
                    ));
                }
                Statement::Edge { from, to, attrs } => {
                    out.push_str(&format!(
                        "{}\"{}\" -> \"{}\"{};\n",
                        indent,
                        escape(from),
                        escape(to),
                        attr_list(attrs)
                    ));
                }
                Statement::Subgraph(child) => {
                    out.push_str(&format!("{}subgraph \"{}\" {{\n", indent, escape(&child.name)));
                    child.write_statements(out, depth + 1);
                    out.push_str(&format!("{}}}\n", indent));
                }
            }
        }
    }
}

fn attr_list(attrs: &[(String, String)]) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let inner = attrs
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, escape(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" [{}]", inner)
}

/// Escape a value for a double-quoted DOT string. Backslashes are kept as-is
/// so graphviz escape sequences like `\n` in captions pass through.
fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Render a finished statechart into a DOT document model
pub fn render_statechart(chart: &Statechart, config: &Config) -> Result<Graph> {
    Ok(build_scope_graph(chart, chart.root, config))
}

fn build_scope_graph(chart: &Statechart, scope: ScopeId, config: &Config) -> Graph {
    let node = &chart.tree[scope];
    let mut graph = Graph::new(&node.graph_name);

    match node.style {
        ScopeStyle::Plain => {
            graph.attr("label", format!("\\nSM for {}", chart.file_label));
            graph.attr("fontsize", "20");
        }
        ScopeStyle::LevelFill => {
            graph.attr("label", &node.label);
            graph.attr("style", "filled");
            let fill = if node.level % 2 == 1 { "grey" } else { "white" };
            graph.attr("fillcolor", fill);
        }
        ScopeStyle::CompoundBorder => {
            graph.attr("label", &node.label);
            graph.attr("color", &config.style.compound_border_color);
        }
    }

    // declare leaves before any enclosing edge mentions them, so graphviz
    // assigns them to this (sub)graph instead of the first graph whose edge
    // names them
    for id in &node.leaf_ids {
        graph.node(id, Vec::new());
    }

    for state in &node.nodes {
        let mut attrs = Vec::new();
        if let Some(shape) = &state.shape {
            attrs.push(("shape".to_string(), shape.clone()));
        }
        if let Some(style) = &state.style {
            attrs.push(("style".to_string(), style.clone()));
        }
        if let Some(color) = &state.color {
            attrs.push(("fillcolor".to_string(), color.clone()));
        }
        graph.node(&state.id, attrs);
    }

    for edge in &node.in_edges {
        let Some(target) = &edge.target else { continue };
        let mut attrs = vec![("label".to_string(), edge.display_label())];
        if let Some(color) = &edge.color {
            attrs.push(("color".to_string(), color.clone()));
        }
        if let Some(font_color) = &edge.font_color {
            attrs.push(("fontcolor".to_string(), font_color.clone()));
        }
        graph.edge(&edge.start, target, attrs);
    }

    for child in node.composite_children().collect::<Vec<_>>() {
        if !chart.tree[child].draw {
            continue;
        }
        graph.subgraph(build_scope_graph(chart, child, config));
    }

    graph
}
