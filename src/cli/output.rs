//! Output formatting module
//!
//! This module handles formatting statechart statistics for the `stats`
//! command output formats.

use crate::statechart::{AnalysisReport, FlatGraph, Statechart};
use crate::Result;
use serde_json::json;

/// Output statechart statistics as JSON
pub fn output_stats_json(
    w: &mut impl std::io::Write,
    chart: &Statechart,
    flat: &FlatGraph,
    report: &AnalysisReport,
) -> Result<()> {
    let stats = flat.stats();
    let output = json!({
        "file": chart.file_label,
        "summary": {
            "total_states": stats.total_states,
            "total_transitions": stats.total_transitions,
            "initial_states": stats.initial_states,
            "terminal_states": stats.terminal_states,
        },
        "pattern": {
            "shape": report.pattern.display_name(),
            "branching_factor": report.branching_factor,
            "has_cycles": report.has_cycles,
        },
        "orphans": chart.orphans,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output statechart statistics as a text table
pub fn output_stats_table(
    w: &mut impl std::io::Write,
    chart: &Statechart,
    flat: &FlatGraph,
    report: &AnalysisReport,
) -> Result<()> {
    let stats = flat.stats();

    writeln!(w, "Statechart Statistics - {}", chart.file_label)?;
    writeln!(w, "{}", "=".repeat(60))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Total States:      {}", stats.total_states)?;
    writeln!(w, "  Total Transitions: {}", stats.total_transitions)?;
    writeln!(w, "  Initial States:    {}", stats.initial_states)?;
    writeln!(w, "  Terminal States:   {}", stats.terminal_states)?;
    writeln!(w)?;

    writeln!(w, "Pattern:")?;
    writeln!(w, "  Shape:             {}", report.pattern.display_name())?;
    writeln!(w, "  Branching Factor:  {:.2}", report.branching_factor)?;
    writeln!(w, "  Has Cycles:        {}", report.has_cycles)?;
    writeln!(w)?;

    if !chart.orphans.is_empty() {
        writeln!(w, "Dead-End States:")?;
        writeln!(w, "{:-<60}", "")?;
        for orphan in &chart.orphans {
            writeln!(w, "  {}", orphan)?;
        }
        writeln!(w)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statechart::{analyzer, Edge, ScopeNode, ScopeStyle, ScopeTree};

    fn sample_chart() -> Statechart {
        let mut tree = ScopeTree::new();
        let root = tree.alloc(ScopeNode::new(0, "", "main", "A", ScopeStyle::Plain, None));
        tree[root]
            .in_edges
            .push(Edge::new("A").with_target("B").with_label("go"));
        Statechart {
            tree,
            root,
            file_label: "machine.xml".to_string(),
            orphans: vec!["Stray".to_string()],
        }
    }

    #[test]
    fn test_table_output() {
        let chart = sample_chart();
        let flat = FlatGraph::from_statechart(&chart);
        let report = analyzer::detect_pattern(&flat);

        let mut buf = Vec::new();
        output_stats_table(&mut buf, &chart, &flat, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("machine.xml"));
        assert!(text.contains("Total States:      2"));
        assert!(text.contains("Shape:             Linear"));
        assert!(text.contains("Stray"));
    }

    #[test]
    fn test_json_output() {
        let chart = sample_chart();
        let flat = FlatGraph::from_statechart(&chart);
        let report = analyzer::detect_pattern(&flat);

        let mut buf = Vec::new();
        output_stats_json(&mut buf, &chart, &flat, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["file"], "machine.xml");
        assert_eq!(value["summary"]["total_states"], 2);
        assert_eq!(value["pattern"]["has_cycles"], false);
        assert_eq!(value["orphans"][0], "Stray");
    }
}
