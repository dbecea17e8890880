/// Output format for a rendered dependency graph.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON in the renderer wire format (default).
    #[default]
    Json,
    /// Graphviz DOT, left-to-right, entry point highlighted.
    Dot,
    /// Mermaid flowchart. Best for small-to-medium graphs in markdown.
    Mermaid,
    /// Indented text tree rooted at the entry point.
    Tree,
}
