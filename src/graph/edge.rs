use serde::{Deserialize, Serialize};

/// File -> File: `source` imports `target`. One per resolved import statement;
/// the same pair may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportEdge {
    /// Id of the importing file.
    pub source: String,
    /// Id of the imported file.
    pub target: String,
}

impl ImportEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
