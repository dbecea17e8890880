use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::language::LanguageKind;

/// One distinct source file reached during traversal.
///
/// Serialized with the field names the graph renderer and the external
/// analyzer script use (`fullPath`, `type`); `absolutePath`/`language` are
/// accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Path relative to the project root, `/`-separated. Unique key.
    pub id: String,
    /// Base name of the file.
    pub label: String,
    /// Resolved filesystem path; only used for I/O.
    #[serde(rename = "fullPath", alias = "absolutePath")]
    pub absolute_path: PathBuf,
    #[serde(rename = "type", alias = "language")]
    pub language: LanguageKind,
}

impl FileNode {
    pub fn new(id: impl Into<String>, absolute_path: &Path, language: LanguageKind) -> Self {
        let label = absolute_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: id.into(),
            label,
            absolute_path: absolute_path.to_path_buf(),
            language,
        }
    }
}
