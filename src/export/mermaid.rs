use std::collections::BTreeMap;
use std::fmt::Write;

use crate::graph::DependencyGraph;

/// Escape a string for safe use in Mermaid node labels (quotes inside labels break the syntax).
fn escape_mermaid_label(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// Render the dependency graph as a Mermaid flowchart.
///
/// Node ids are positional (`n0`, `n1`, ... in sorted id order) so paths never
/// need escaping outside labels. Duplicate edges collapse to one.
pub fn render_mermaid(graph: &DependencyGraph) -> String {
    let ids: BTreeMap<&str, String> = graph
        .node_ids()
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, format!("n{i}")))
        .collect();

    let mut out = String::new();
    writeln!(out, "flowchart LR").unwrap();

    for (id, node_id) in &ids {
        writeln!(out, "    {}[\"{}\"]", node_id, escape_mermaid_label(id)).unwrap();
    }

    for (source, target) in graph.unique_edges() {
        let (Some(src), Some(tgt)) = (ids.get(source), ids.get(target)) else {
            continue;
        };
        writeln!(out, "    {} --> {}", src, tgt).unwrap();
    }

    if let Some(entry) = ids.get(graph.entry_point.as_str()) {
        writeln!(out, "    classDef entry fill:lightblue").unwrap();
        writeln!(out, "    class {} entry", entry).unwrap();
    }

    out
}
