//! Import-specifier extraction.
//!
//! Extraction works on whole-file text and only returns module specifiers;
//! turning a specifier into a file is the resolver's job. The [`ImportExtractor`]
//! trait is the seam: the default [`RegexExtractor`] mirrors the cheap line/quote
//! heuristics, and with the `tree-sitter` feature a syntax-tree based extractor
//! can be swapped in for JavaScript/TypeScript without touching resolution or
//! traversal.

pub mod ecmascript;
pub mod python;
#[cfg(feature = "tree-sitter")]
pub mod syntax;

use std::path::Path;

use crate::language::LanguageKind;

/// The file an extractor is looking at.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Absolute path of the file.
    pub path: &'a Path,
    /// Absolute project root; Python relative imports are computed against it.
    pub root: &'a Path,
    pub language: LanguageKind,
}

/// Capability: pull module specifiers out of source text.
///
/// Implementations must return specifiers in source-text order; the traversal
/// appends edges in exactly this order.
pub trait ImportExtractor: Send + Sync {
    fn extract(&self, file: &SourceFile<'_>, content: &str) -> Vec<String>;
}

/// Regex-based extractor. Not a parser: imports inside strings or comments are
/// picked up and multi-line statements that break the line/quote assumptions
/// are missed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl ImportExtractor for RegexExtractor {
    fn extract(&self, file: &SourceFile<'_>, content: &str) -> Vec<String> {
        match file.language {
            LanguageKind::Python => {
                let package = package_parts(file.root, file.path);
                python::extract_imports(content, &package)
            }
            LanguageKind::JavaScript | LanguageKind::TypeScript => {
                ecmascript::extract_imports(content)
            }
        }
    }
}

/// Directory components of `path` relative to `root`, e.g. `["pkg", "sub"]` for
/// `<root>/pkg/sub/mod.py`. Empty for files directly under the root or outside it.
pub fn package_parts(root: &Path, path: &Path) -> Vec<String> {
    let Some(dir) = path.parent() else {
        return Vec::new();
    };
    match dir.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}
