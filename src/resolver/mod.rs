pub mod ecmascript;
pub mod python;

use std::path::{Component, Path, PathBuf};

use crate::language::LanguageKind;

/// The outcome of resolving a single module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Resolved to an on-disk regular file (absolute path).
    Resolved(PathBuf),
    /// Present under `<root>/node_modules`; deliberately not traversed.
    External(String),
    /// No candidate file exists.
    Unresolved,
}

/// Best-effort specifier-to-file resolver rooted at one project.
///
/// Only existence checks are performed (`stat` + regular file). No `tsconfig`
/// paths, `package.json` fields, symlink or case handling.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    root: PathBuf,
}

impl ImportResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `specifier`, written in `from_file` (a `language` source), to a file.
    pub fn resolve(
        &self,
        specifier: &str,
        language: LanguageKind,
        from_file: &Path,
    ) -> ResolutionOutcome {
        let Some(from_dir) = from_file.parent() else {
            return ResolutionOutcome::Unresolved;
        };
        match language {
            LanguageKind::Python => python::resolve(&self.root, specifier, from_dir),
            LanguageKind::JavaScript | LanguageKind::TypeScript => {
                ecmascript::resolve(&self.root, specifier, from_dir)
            }
        }
    }
}

/// `stat` succeeds and the target is a regular file (symlinks are followed by `metadata`).
pub(crate) fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Append a raw suffix to a path (`util` + `.ts`, `util` + `/index.js`).
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = base.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Lexically normalise `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
