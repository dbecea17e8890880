use std::path::Path;

use super::{ResolutionOutcome, is_regular_file, normalize, with_suffix};

/// Suffixes tried after the literal path, in tie-break order.
pub const EXTENSION_SUFFIXES: &[&str] = &[
    ".js",
    ".jsx",
    ".ts",
    ".tsx",
    ".mjs",
    "/index.js",
    "/index.ts",
];

/// Resolve a JavaScript/TypeScript module specifier.
///
/// - `./x`, `../x`: relative to the importing file's directory.
/// - anything else: a package if `<root>/node_modules/<spec>` is a regular
///   file (never traversed), otherwise an alias import under `<root>/src/<spec>`.
///   A package directory does not count, so `src/` aliases still resolve.
pub fn resolve(root: &Path, specifier: &str, from_dir: &Path) -> ResolutionOutcome {
    if specifier.starts_with('.') {
        let base = normalize(&from_dir.join(specifier));
        return probe(&base);
    }

    let bare = specifier.trim_start_matches('/');
    if bare.is_empty() {
        return ResolutionOutcome::Unresolved;
    }

    if is_regular_file(&root.join("node_modules").join(bare)) {
        return ResolutionOutcome::External(specifier.to_owned());
    }

    probe(&normalize(&root.join("src").join(bare)))
}

/// Literal path first, then each suffix.
fn probe(base: &Path) -> ResolutionOutcome {
    if is_regular_file(base) {
        return ResolutionOutcome::Resolved(base.to_path_buf());
    }
    for suffix in EXTENSION_SUFFIXES {
        let candidate = with_suffix(base, suffix);
        if is_regular_file(&candidate) {
            return ResolutionOutcome::Resolved(candidate);
        }
    }
    ResolutionOutcome::Unresolved
}
