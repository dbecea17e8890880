use std::path::Path;

use super::{ResolutionOutcome, is_regular_file, with_suffix};

/// Resolve a dotted Python module path.
///
/// Search bases, in order: the project root, `<root>/src`, then the importing
/// file's directory. In each base `<parts>.py` is tried before
/// `<parts>/__init__.py`; the first hit wins.
pub fn resolve(root: &Path, dotted: &str, from_dir: &Path) -> ResolutionOutcome {
    let parts: Vec<&str> = dotted.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return ResolutionOutcome::Unresolved;
    }

    let src = root.join("src");
    for base in [root, src.as_path(), from_dir] {
        let module_path = parts.iter().fold(base.to_path_buf(), |acc, p| acc.join(p));

        let py_file = with_suffix(&module_path, ".py");
        if is_regular_file(&py_file) {
            return ResolutionOutcome::Resolved(py_file);
        }

        let init_file = module_path.join("__init__.py");
        if is_regular_file(&init_file) {
            return ResolutionOutcome::Resolved(init_file);
        }
    }

    ResolutionOutcome::Unresolved
}
