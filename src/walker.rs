use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ignore_rules::{IgnoreRules, relative_id};
use crate::language::LanguageKind;

/// Walk a project directory and collect every analyzable source file.
///
/// Uses the same [`IgnoreRules`] as the graph builder instead of the `ignore`
/// crate's own gitignore handling, so "reachable" and "exists" agree on what
/// counts as a project file. Ignored directories are pruned, not descended.
///
/// When `allowed_languages` is `Some(set)`, only files of those languages are
/// returned. The result is sorted.
pub fn walk_sources(
    root: &Path,
    rules: &IgnoreRules,
    allowed_languages: Option<&HashSet<LanguageKind>>,
) -> Vec<PathBuf> {
    let filter_root = root.to_path_buf();
    let filter_rules = rules.clone();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let Some(rel) = relative_id(&filter_root, entry.path()) else {
                return true;
            };
            if rel.is_empty() {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            // Directory patterns are written with a trailing slash.
            let rel = if is_dir { format!("{rel}/") } else { rel };
            !filter_rules.is_ignored_relative(&rel)
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("{err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(language) = LanguageKind::from_path(path) else {
            continue;
        };

        if let Some(langs) = allowed_languages
            && !langs.contains(&language)
        {
            continue;
        }

        tracing::trace!("found {}", path.display());
        files.push(path.to_path_buf());
    }

    files.sort();
    files
}
