//! Interchangeable analysis backends.
//!
//! The host picks one [`GraphBackend`] per run: the in-process builder, or an
//! external analyzer script that prints the same JSON graph on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::builder::{Analysis, DependencyGraphBuilder, validate_root};
use crate::error::AnalyzeError;
use crate::graph::DependencyGraph;
use crate::ignore_rules::relative_id;
use crate::output::AnalysisStats;

/// Interpreters tried, in order, when none is configured.
const DEFAULT_INTERPRETERS: &[&str] = &["python3", "python"];

/// One analysis to perform.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub entry_point: PathBuf,
    pub project_root: PathBuf,
    pub max_depth: usize,
}

/// Capability: turn a request into a dependency graph.
pub trait GraphBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<DependencyGraph, AnalyzeError>;

    /// Graph plus statistics. Backends that gather no counters report only
    /// sizes and timing.
    fn run(&self, request: &AnalysisRequest) -> Result<Analysis, AnalyzeError> {
        let started = Instant::now();
        let graph = self.analyze(request)?;
        let stats = AnalysisStats {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            elapsed_secs: started.elapsed().as_secs_f64(),
            ..AnalysisStats::default()
        };
        Ok(Analysis { graph, stats })
    }
}

/// In-process traversal with [`DependencyGraphBuilder`].
pub struct BuiltinBackend {
    builder: DependencyGraphBuilder,
}

impl BuiltinBackend {
    pub fn new(builder: DependencyGraphBuilder) -> Self {
        Self { builder }
    }
}

impl GraphBackend for BuiltinBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<DependencyGraph, AnalyzeError> {
        self.builder
            .analyze(&request.entry_point, &request.project_root, request.max_depth)
    }

    fn run(&self, request: &AnalysisRequest) -> Result<Analysis, AnalyzeError> {
        self.builder
            .run(&request.entry_point, &request.project_root, request.max_depth)
    }
}

/// Runs an analyzer script in a child interpreter and parses its stdout.
///
/// Failures are hard errors: no retry and no fallback to the builtin backend.
#[derive(Debug, Clone)]
pub struct ExternalScriptBackend {
    script: PathBuf,
    interpreter: Option<String>,
}

impl ExternalScriptBackend {
    /// `script` may be relative to the project root. With no `interpreter`,
    /// `python3` then `python` are looked up on `PATH`.
    pub fn new(script: impl Into<PathBuf>, interpreter: Option<String>) -> Self {
        Self {
            script: script.into(),
            interpreter,
        }
    }

    fn resolve_interpreter(&self) -> Result<PathBuf, AnalyzeError> {
        match &self.interpreter {
            Some(cmd) => {
                let as_path = Path::new(cmd);
                if as_path.components().count() > 1 {
                    return Ok(as_path.to_path_buf());
                }
                which::which(cmd).map_err(|_| AnalyzeError::InterpreterNotFound {
                    tried: cmd.clone(),
                })
            }
            None => DEFAULT_INTERPRETERS
                .iter()
                .find_map(|cmd| which::which(cmd).ok())
                .ok_or_else(|| AnalyzeError::InterpreterNotFound {
                    tried: DEFAULT_INTERPRETERS.join(", "),
                }),
        }
    }
}

impl GraphBackend for ExternalScriptBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<DependencyGraph, AnalyzeError> {
        let root = &validate_root(&request.project_root)?;

        let interpreter = self.resolve_interpreter()?;
        let script = root.join(&self.script);
        let entry = root.join(&request.entry_point);
        let entry_arg = relative_id(root, &entry)
            .unwrap_or_else(|| entry.to_string_lossy().into_owned());

        tracing::debug!(
            "running {} {} for {entry_arg}",
            interpreter.display(),
            script.display()
        );

        let output = Command::new(&interpreter)
            .arg(&script)
            .arg("--json-output")
            .arg("--root")
            .arg(root)
            .arg("--max-depth")
            .arg(request.max_depth.to_string())
            .arg(&entry_arg)
            .current_dir(root)
            .output()
            .map_err(|source| AnalyzeError::BackendSpawn {
                program: interpreter.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(AnalyzeError::BackendExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        if !output.stderr.is_empty() {
            tracing::debug!(
                "analyzer stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
