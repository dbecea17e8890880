use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use crate::graph::DependencyGraph;

/// Sanitize a string for use as a DOT node ID.
///
/// Replaces non-alphanumeric characters with `_`. Prepends `n` if the result
/// starts with a digit (DOT IDs must not start with a digit).
pub fn sanitize_dot_id(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'n');
    }
    if result.is_empty() {
        result = "node".to_string();
    }
    result
}

/// Escape a label for a double-quoted DOT string.
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Stable DOT id per node id, sorted by node id. Sanitized ids that collide
/// (`a.py` and `a_py`) get a numeric suffix.
fn dot_ids(graph: &DependencyGraph) -> BTreeMap<&str, String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut ids = BTreeMap::new();
    for id in graph.node_ids() {
        let base = sanitize_dot_id(id);
        let mut candidate = base.clone();
        let mut n = 1;
        while !taken.insert(candidate.clone()) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        ids.insert(id, candidate);
    }
    ids
}

/// Render the dependency graph as Graphviz DOT.
///
/// Nodes are emitted sorted by id with the root-relative path as label; the
/// entry point is filled light blue. Duplicate edges collapse to one.
pub fn render_dot(graph: &DependencyGraph) -> String {
    let ids = dot_ids(graph);

    let mut out = String::new();
    writeln!(out, "digraph Dependencies {{").unwrap();
    writeln!(out, "    rankdir=LR;").unwrap();
    writeln!(out, "    node [shape=box fontname=monospace];").unwrap();

    for (id, dot_id) in &ids {
        let style = if *id == graph.entry_point {
            " style=filled fillcolor=lightblue"
        } else {
            ""
        };
        writeln!(
            out,
            "    {} [label=\"{}\"{}];",
            dot_id,
            escape_dot_label(id),
            style
        )
        .unwrap();
    }

    for (source, target) in graph.unique_edges() {
        let (Some(src), Some(tgt)) = (ids.get(source), ids.get(target)) else {
            continue;
        };
        writeln!(out, "    {} -> {};", src, tgt).unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}
