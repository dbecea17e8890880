//! Path ignore rules applied before any file is visited.
//!
//! The matcher is intentionally simple: a fixed list of built-in regexes, then
//! one regex per `.gitignore` line, then any glob patterns from `depgraph.toml`.
//! Gitignore lines are translated textually (anchored at the start of the
//! root-relative path, `*` -> `.*`, `?` -> `.`); negation, `**` and
//! directory-only anchors are not supported.

use std::path::{Path, PathBuf};

use regex::Regex;

/// Built-in patterns, tested against the root-relative path with `/` separators.
const BUILTIN_PATTERNS: &[&str] = &[
    r"^__pycache__/",
    r"\.pyc$",
    r"\.pyo$",
    r"\.pyd$",
    r"^node_modules/",
    r"^\.git/",
    r"^\.vscode/",
    r"^dist/",
    r"^build/",
    r"^\.pytest_cache/",
    r"^\.mypy_cache/",
    r"^\.tox/",
    r"^venv/",
    r"^\.venv/",
    r"^env/",
    r"^\.env$",
];

/// An ordered, immutable list of ignore patterns for one analysis run.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    patterns: Vec<Regex>,
    excludes: Vec<glob::Pattern>,
}

impl IgnoreRules {
    /// Built-in patterns only.
    pub fn builtin(root: &Path) -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self {
            root: root.to_path_buf(),
            patterns,
            excludes: Vec::new(),
        }
    }

    /// Built-in patterns, then `<root>/.gitignore` (if present), then `extra_globs`.
    ///
    /// A missing `.gitignore` is not an error. Invalid globs are skipped with a warning.
    pub fn load(root: &Path, extra_globs: &[String]) -> Self {
        let mut rules = Self::builtin(root);

        let gitignore = root.join(".gitignore");
        match std::fs::read_to_string(&gitignore) {
            Ok(contents) => rules.extend_gitignore(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!("could not read {}: {err}", gitignore.display());
            }
        }

        for glob_src in extra_globs {
            match glob::Pattern::new(glob_src) {
                Ok(p) => rules.excludes.push(p),
                Err(err) => tracing::warn!("ignoring invalid exclude pattern {glob_src:?}: {err}"),
            }
        }

        rules
    }

    /// Append one pattern per non-blank, non-comment gitignore line.
    pub fn extend_gitignore(&mut self, contents: &str) {
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('!') {
                tracing::debug!("negated gitignore pattern {trimmed:?} is not supported, skipping");
                continue;
            }
            match gitignore_line_to_regex(trimmed) {
                Ok(re) => self.patterns.push(re),
                Err(err) => tracing::warn!("skipping gitignore line {trimmed:?}: {err}"),
            }
        }
    }

    /// Number of compiled patterns (regex + glob).
    pub fn len(&self) -> usize {
        self.patterns.len() + self.excludes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `path` (absolute) falls under an ignore pattern.
    ///
    /// Paths outside the project root are never ignored here; the caller
    /// decides what to do with them.
    pub fn is_ignored(&self, path: &Path) -> bool {
        match relative_id(&self.root, path) {
            Some(rel) => self.is_ignored_relative(&rel),
            None => false,
        }
    }

    /// True if the root-relative path (with `/` separators) matches any pattern.
    pub fn is_ignored_relative(&self, rel: &str) -> bool {
        if self.patterns.iter().any(|re| re.is_match(rel)) {
            return true;
        }
        if self.excludes.is_empty() {
            return false;
        }
        let trimmed = rel.trim_end_matches('/');
        self.excludes.iter().any(|glob| {
            glob.matches(trimmed)
                || trimmed
                    .split('/')
                    .any(|component| glob.matches(component))
        })
    }
}

/// Translate a single gitignore line into an anchored regex.
///
/// Everything is escaped first so characters like `+` or `(` stay literal;
/// then the escaped `*` and `?` are turned back into wildcards.
fn gitignore_line_to_regex(line: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(line);
    let translated = escaped.replace(r"\*", ".*").replace(r"\?", ".");
    Regex::new(&format!("^{translated}"))
}

/// Root-relative path of `path` with `/` separators, or `None` if it is not under `root`.
pub fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
