pub mod dot;
pub mod mermaid;
pub mod model;
pub mod tree;

use std::path::Path;

use anyhow::Context;

use crate::graph::DependencyGraph;

use model::ExportFormat;

/// Mermaid renderers choke well before DOT does.
const MERMAID_EDGE_WARNING: usize = 500;

/// Render `graph` in the requested format.
pub fn render(graph: &DependencyGraph, format: ExportFormat) -> anyhow::Result<String> {
    let content = match format {
        ExportFormat::Json => {
            let mut s = serde_json::to_string_pretty(graph).context("serialising graph")?;
            s.push('\n');
            s
        }
        ExportFormat::Dot => dot::render_dot(graph),
        ExportFormat::Mermaid => {
            let edges = graph.unique_edges().len();
            if edges > MERMAID_EDGE_WARNING {
                tracing::warn!(
                    "large graph: {edges} edges may render poorly in Mermaid, consider --format dot"
                );
            }
            mermaid::render_mermaid(graph)
        }
        ExportFormat::Tree => tree::render_tree(graph),
    };
    Ok(content)
}

/// Write rendered output to `path`, or to stdout when `path` is `None`.
pub fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
