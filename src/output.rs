use serde::Serialize;

/// Counters gathered during one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStats {
    /// Distinct files in the graph.
    pub nodes: usize,
    /// Edges in the graph (duplicates included unless deduplicated).
    pub edges: usize,
    /// Times an already-visited file was walked again.
    pub revisits: usize,
    /// Specifiers returned by the extractor, across all visits.
    pub imports_found: usize,
    /// Imports that became edges.
    pub resolved_imports: usize,
    /// Imports with no candidate file.
    pub unresolved_imports: usize,
    /// Imports found under `node_modules`.
    pub external_packages: usize,
    /// Resolved targets dropped as ignored, unsupported or outside the root.
    pub skipped_targets: usize,
    pub self_imports: usize,
    /// Files that could not be read; their branch was abandoned.
    pub unreadable_files: usize,
    /// Wall-clock time for the run in seconds.
    pub elapsed_secs: f64,
}

/// Print a summary of the analysis run to **stderr**, leaving stdout for the
/// rendered graph.
///
/// - `json = true`: a pretty-printed JSON object.
/// - `json = false`: a cargo-style human-readable summary.
pub fn print_summary(stats: &AnalysisStats, json: bool) {
    if json {
        match serde_json::to_string_pretty(stats) {
            Ok(s) => eprintln!("{}", s),
            Err(e) => eprintln!("error serialising stats: {}", e),
        }
        return;
    }

    eprintln!(
        "Analyzed {} files, {} edges in {:.2}s",
        stats.nodes, stats.edges, stats.elapsed_secs
    );
    eprintln!(
        "  {} imports found, {} resolved ({} external, {} unresolved, {} skipped)",
        stats.imports_found,
        stats.resolved_imports,
        stats.external_packages,
        stats.unresolved_imports,
        stats.skipped_targets,
    );
    if stats.revisits > 0 || stats.self_imports > 0 {
        eprintln!(
            "  {} revisits, {} self-imports",
            stats.revisits, stats.self_imports
        );
    }
    if stats.unreadable_files > 0 {
        eprintln!("  {} files could not be read", stats.unreadable_files);
    }
}
