use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the caller of an analysis.
///
/// Per-file read failures during traversal are deliberately absent: those are
/// logged and the branch is abandoned, the rest of the graph still comes back.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no project root given: open a folder or pass --root")]
    EmptyRoot,

    #[error("project root {0} does not exist")]
    RootNotFound(PathBuf),

    #[error("project root {0} is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("analysis cancelled")]
    Cancelled,

    #[error("no Python interpreter found on PATH (tried {tried}); install Python 3 or pass --interpreter")]
    InterpreterNotFound { tried: String },

    #[error("failed to start {program}: {source}")]
    BackendSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("external analyzer exited with {}: {stderr}", exit_label(.code))]
    BackendExit { code: Option<i32>, stderr: String },

    #[error("failed to parse external analyzer output: {0}")]
    BackendOutput(#[from] serde_json::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_exit_message_includes_code_and_stderr() {
        let err = AnalyzeError::BackendExit {
            code: Some(2),
            stderr: "Error: Entry point required".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("code 2"), "got: {msg}");
        assert!(msg.contains("Entry point required"), "got: {msg}");
    }

    #[test]
    fn test_backend_exit_without_code() {
        let err = AnalyzeError::BackendExit {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("a signal"));
    }

    #[test]
    fn test_root_not_found_names_the_path() {
        let err = AnalyzeError::RootNotFound(PathBuf::from("/nope/project"));
        assert!(err.to_string().contains("/nope/project"));
    }
}
