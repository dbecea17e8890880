use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "depgraph.toml";

/// Depth used when neither the CLI nor the config file provides one.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Configuration loaded from `depgraph.toml` at the project root.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DepGraphConfig {
    /// Additional glob patterns to ignore (beyond the built-ins and .gitignore).
    pub exclude: Option<Vec<String>>,
    /// Default traversal depth.
    pub max_depth: Option<usize>,
    /// Drop repeated `source -> target` edges instead of keeping one per import.
    pub dedupe_edges: bool,
    /// `false` switches to visit-once traversal.
    pub depth_limited: Option<bool>,
    /// Settings for the external analyzer backend.
    pub external: ExternalConfig,
}

/// `[external]` table.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ExternalConfig {
    /// Interpreter command or path (e.g. `python3`, `/usr/bin/python3.12`).
    pub interpreter: Option<String>,
    /// Analyzer script, relative paths taken from the project root.
    pub script: Option<PathBuf>,
}

impl DepGraphConfig {
    /// Load configuration from `depgraph.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("failed to parse {CONFIG_FILE}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("failed to read {CONFIG_FILE}: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn max_depth_or_default(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn depth_limited_or_default(&self) -> bool {
        self.depth_limited.unwrap_or(true)
    }

    pub fn exclude_patterns(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or(&[])
    }
}
