pub mod edge;
pub mod node;

use std::collections::{BTreeSet, HashMap};

use petgraph::Directed;
use petgraph::graph::{Graph, NodeIndex};
use serde::{Deserialize, Serialize};

pub use edge::ImportEdge;
pub use node::FileNode;

/// The result of one analysis: files reached from the entry point and the
/// import edges between them.
///
/// `entry_point` always names a node in `nodes`. The value is owned by the
/// caller; builders keep nothing after returning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub nodes: Vec<FileNode>,
    pub edges: Vec<ImportEdge>,
    pub entry_point: String,
    pub max_depth: usize,
}

impl DependencyGraph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Node ids, sorted.
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Distinct `(source, target)` pairs, sorted.
    pub fn unique_edges(&self) -> BTreeSet<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    /// Directed petgraph view: one node per file (weight = id), one edge per
    /// distinct import pair. Edges whose endpoints are not nodes are skipped.
    pub fn to_petgraph(&self) -> (Graph<String, (), Directed>, HashMap<String, NodeIndex>) {
        let mut graph: Graph<String, (), Directed> = Graph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            index
                .entry(node.id.clone())
                .or_insert_with(|| graph.add_node(node.id.clone()));
        }

        for (source, target) in self.unique_edges() {
            if let (Some(&s), Some(&t)) = (index.get(source), index.get(target)) {
                graph.add_edge(s, t, ());
            }
        }

        (graph, index)
    }
}
