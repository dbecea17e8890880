use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::DependencyGraphBuilder;
use crate::error::AnalyzeError;
use crate::ignore_rules::{IgnoreRules, relative_id};
use crate::language::LanguageKind;
use crate::walker::walk_sources;

/// Files under the root that none of the entry points reach.
#[derive(Debug, Clone, Serialize)]
pub struct UnusedReport {
    /// Entry point ids the analysis started from.
    pub entry_points: Vec<String>,
    /// Source files considered.
    pub total_files: usize,
    /// Files reached from at least one entry point.
    pub reachable_files: usize,
    /// Unreached file ids, sorted.
    pub unused: Vec<String>,
}

/// Analyze from every entry point and report the project files left unreached.
///
/// The candidate set comes from [`walk_sources`] with the same ignore rules the
/// builder uses; entry points themselves always count as reached.
pub fn find_unused(
    builder: &DependencyGraphBuilder,
    root: &Path,
    entries: &[PathBuf],
    max_depth: usize,
    extra_excludes: &[String],
    allowed_languages: Option<&HashSet<LanguageKind>>,
) -> Result<UnusedReport, AnalyzeError> {
    let mut reached: BTreeSet<String> = BTreeSet::new();
    let mut entry_points = Vec::with_capacity(entries.len());

    for entry in entries {
        let graph = builder.analyze(entry, root, max_depth)?;
        tracing::debug!(
            "{} reaches {} files",
            graph.entry_point,
            graph.nodes.len()
        );
        reached.extend(graph.nodes.into_iter().map(|n| n.id));
        entry_points.push(graph.entry_point);
    }

    let rules = IgnoreRules::load(root, extra_excludes);
    let candidates: Vec<String> = walk_sources(root, &rules, allowed_languages)
        .iter()
        .filter_map(|path| relative_id(root, path))
        .collect();

    let total_files = candidates.len();
    let unused: Vec<String> = candidates
        .into_iter()
        .filter(|id| !reached.contains(id))
        .collect();

    Ok(UnusedReport {
        entry_points,
        total_files,
        reachable_files: total_files - unused.len(),
        unused,
    })
}

/// Entry points picked when the caller names none: any `main.py`, any
/// `app.py` below a `visualization` directory, and any file ending in
/// `cli.py`. Ignored paths never qualify. The result is sorted.
pub fn find_default_entry_points(root: &Path, rules: &IgnoreRules) -> Vec<PathBuf> {
    let python = HashSet::from([LanguageKind::Python]);
    walk_sources(root, rules, Some(&python))
        .into_iter()
        .filter(|path| relative_id(root, path).is_some_and(|id| is_default_entry(&id)))
        .collect()
}

fn is_default_entry(id: &str) -> bool {
    let mut parts = id.rsplit('/');
    let name = parts.next().unwrap_or_default();
    match name {
        "main.py" => true,
        "app.py" if parts.any(|dir| dir == "visualization") => true,
        _ => name.ends_with("cli.py"),
    }
}

/// Human-readable listing, one unused file per line.
pub fn format_unused(report: &UnusedReport) -> String {
    let mut out = format!(
        "{} of {} files unreachable from {}\n",
        report.unused.len(),
        report.total_files,
        report.entry_points.join(", ")
    );
    for id in &report.unused {
        out.push_str("  ");
        out.push_str(id);
        out.push('\n');
    }
    out
}
