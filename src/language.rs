use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Represents a source language the dependency tracer understands.
///
/// Uses a plain enum (not trait objects) so it stays `Copy` and can be
/// pattern-matched at dispatch boundaries in the extractor and resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    Python,
    JavaScript,
    TypeScript,
}

impl LanguageKind {
    /// Classify a file purely by its extension (case-insensitive).
    ///
    /// - `.py` -> Python
    /// - `.js` / `.jsx` / `.mjs` -> JavaScript
    /// - `.ts` / `.tsx` -> TypeScript
    ///
    /// Anything else is unrecognized and never becomes a graph node.
    pub fn from_path(path: &Path) -> Option<LanguageKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    /// Classify a bare extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<LanguageKind> {
        match ext {
            "py" => Some(LanguageKind::Python),
            "js" | "jsx" | "mjs" => Some(LanguageKind::JavaScript),
            "ts" | "tsx" => Some(LanguageKind::TypeScript),
            _ => None,
        }
    }

    /// Wire name, as used in the `type` field of serialized nodes.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageKind::Python => "python",
            LanguageKind::JavaScript => "javascript",
            LanguageKind::TypeScript => "typescript",
        }
    }

    /// Parse a CLI flag string into a `LanguageKind`. Case-insensitive.
    ///
    /// Accepted values:
    /// - "python" or "py"     -> Python
    /// - "javascript" or "js" -> JavaScript
    /// - "typescript" or "ts" -> TypeScript
    pub fn from_str_loose(s: &str) -> Option<LanguageKind> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Some(LanguageKind::Python),
            "javascript" | "js" => Some(LanguageKind::JavaScript),
            "typescript" | "ts" => Some(LanguageKind::TypeScript),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
