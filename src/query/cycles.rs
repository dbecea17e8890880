use petgraph::algo::kosaraju_scc;
use serde::Serialize;

use crate::graph::DependencyGraph;

/// A set of files that import each other directly or transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Node ids forming the cycle, sorted. The first id is repeated at the end
    /// to close the visual cycle.
    pub files: Vec<String>,
}

/// Detect circular dependencies among the files of a dependency graph.
///
/// Uses Kosaraju's SCC algorithm; SCCs with more than one node, and files
/// that import themselves, are cycles. Only the graph as built is considered,
/// so cycles longer than the analysis depth allows may be missed.
///
/// Returns cycles sorted by the first file in each cycle.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let (file_graph, _) = graph.to_petgraph();

    let mut cycles: Vec<Cycle> = kosaraju_scc(&file_graph)
        .into_iter()
        .filter(|scc| {
            scc.len() > 1 || scc.iter().any(|&idx| file_graph.contains_edge(idx, idx))
        })
        .map(|scc| {
            let mut files: Vec<String> = scc.iter().map(|&idx| file_graph[idx].clone()).collect();
            files.sort();
            // a -> b -> c -> a
            files.push(files[0].clone());
            Cycle { files }
        })
        .collect();

    cycles.sort_by(|a, b| a.files[0].cmp(&b.files[0]));
    cycles
}

/// One line per cycle: `a.py -> b.py -> a.py`.
pub fn format_cycles(cycles: &[Cycle]) -> String {
    if cycles.is_empty() {
        return "no circular dependencies found\n".to_string();
    }
    let mut out = String::new();
    for cycle in cycles {
        out.push_str(&cycle.files.join(" -> "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FileNode, ImportEdge};
    use crate::language::LanguageKind;
    use std::path::Path;

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph {
            nodes: ids
                .iter()
                .map(|id| FileNode::new(*id, &Path::new("/proj").join(id), LanguageKind::TypeScript))
                .collect(),
            edges: edges.iter().map(|(s, t)| ImportEdge::new(*s, *t)).collect(),
            entry_point: ids[0].to_string(),
            max_depth: 5,
        }
    }

    #[test]
    fn test_two_file_mutual_cycle_detected() {
        let g = graph(&["b.ts", "a.ts"], &[("b.ts", "a.ts"), ("a.ts", "b.ts")]);
        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 1, "one cycle expected");
        assert_eq!(cycles[0].files, vec!["a.ts", "b.ts", "a.ts"]);
    }

    #[test]
    fn test_three_file_cycle_detected() {
        let g = graph(
            &["a.ts", "b.ts", "c.ts"],
            &[("a.ts", "b.ts"), ("b.ts", "c.ts"), ("c.ts", "a.ts")],
        );
        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 1, "one 3-cycle expected");
        // 3 unique files + 1 closing = 4 entries.
        assert_eq!(cycles[0].files.len(), 4);
    }

    #[test]
    fn test_no_cycle_in_acyclic_graph() {
        let g = graph(&["a.ts", "b.ts", "c.ts"], &[("a.ts", "b.ts"), ("b.ts", "c.ts")]);
        assert!(find_cycles(&g).is_empty(), "no cycles expected in a DAG");
    }

    #[test]
    fn test_self_import_is_a_cycle() {
        let g = graph(&["a.ts"], &[("a.ts", "a.ts")]);
        assert_eq!(find_cycles(&g)[0].files, vec!["a.ts", "a.ts"]);
    }

    #[test]
    fn test_cycles_sorted_and_duplicate_edges_ignored() {
        let g = graph(
            &["x.ts", "y.ts", "a.ts", "b.ts"],
            &[
                ("x.ts", "y.ts"),
                ("y.ts", "x.ts"),
                ("y.ts", "x.ts"),
                ("a.ts", "b.ts"),
                ("b.ts", "a.ts"),
            ],
        );
        let cycles = find_cycles(&g);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].files[0], "a.ts");
        assert_eq!(cycles[1].files[0], "x.ts");
        assert_eq!(
            format_cycles(&cycles),
            "a.ts -> b.ts -> a.ts\nx.ts -> y.ts -> x.ts\n"
        );
    }

    #[test]
    fn test_format_no_cycles() {
        assert_eq!(format_cycles(&[]), "no circular dependencies found\n");
    }
}
