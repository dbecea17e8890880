use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write;

use crate::graph::DependencyGraph;

/// Render an indented dependency tree rooted at the entry point.
///
/// Children are the distinct imports of a file, sorted. A file that already
/// appears on the current path is printed once more with a
/// `(circular dependency)` marker and not expanded. A shared dependency is
/// expanded the first time it appears; later occurrences are marked
/// `(see above)` so dense graphs print in linear size.
pub fn render_tree(graph: &DependencyGraph) -> String {
    let mut children: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (source, target) in graph.unique_edges() {
        children.entry(source).or_default().insert(target);
    }

    let mut out = String::new();
    writeln!(out, "{}", graph.entry_point).unwrap();
    let mut walk = TreeWalk {
        children: &children,
        path: vec![graph.entry_point.as_str()],
        expanded: HashSet::from([graph.entry_point.as_str()]),
        out: &mut out,
    };
    walk.write_children(graph.entry_point.as_str(), "");
    out
}

struct TreeWalk<'a, 'o> {
    children: &'o BTreeMap<&'a str, BTreeSet<&'a str>>,
    path: Vec<&'a str>,
    expanded: HashSet<&'a str>,
    out: &'o mut String,
}

impl<'a> TreeWalk<'a, '_> {
    fn write_children(&mut self, node: &'a str, prefix: &str) {
        let children = self.children;
        let Some(kids) = children.get(node) else {
            return;
        };
        let last = kids.len().saturating_sub(1);
        for (i, &child) in kids.iter().enumerate() {
            let (connector, extension) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            if self.path.contains(&child) {
                writeln!(self.out, "{prefix}{connector}{child} (circular dependency)").unwrap();
                continue;
            }
            let has_kids = children.contains_key(child);
            if has_kids && !self.expanded.insert(child) {
                writeln!(self.out, "{prefix}{connector}{child} (see above)").unwrap();
                continue;
            }
            writeln!(self.out, "{prefix}{connector}{child}").unwrap();
            self.path.push(child);
            self.write_children(child, &format!("{prefix}{extension}"));
            self.path.pop();
        }
    }
}
