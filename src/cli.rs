use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use depgraph::export::model::ExportFormat;

/// Static import-dependency graphs for Python, JavaScript and TypeScript projects.
///
/// depgraph follows the imports of an entry file, resolves them to files inside
/// the project, and renders the resulting file graph as JSON, DOT, Mermaid or
/// a text tree.
#[derive(Parser, Debug)]
#[command(
    name = "depgraph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which backend builds the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// In-process traversal (default).
    #[default]
    Builtin,
    /// An external analyzer script run by a Python interpreter.
    External,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph reachable from an entry file.
    Analyze {
        /// Entry file, absolute or relative to the project root.
        entry: PathBuf,

        /// Project root (default: current directory).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum number of import hops from the entry file (default: 5, or depgraph.toml).
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Write the rendered graph to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record each `source -> target` pair once.
        #[arg(long)]
        dedupe_edges: bool,

        /// Process each file once, at its shortest distance from the entry.
        #[arg(long)]
        visit_once: bool,

        /// Analysis backend.
        #[arg(long, value_enum, default_value_t = BackendKind::Builtin)]
        backend: BackendKind,

        /// Interpreter for the external backend (default: python3, then python).
        #[arg(long)]
        interpreter: Option<String>,

        /// Analyzer script for the external backend, relative to the project root.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Print run statistics to stderr.
        #[arg(long)]
        stats: bool,

        /// Print run statistics to stderr as JSON (implies --stats).
        #[arg(long)]
        stats_json: bool,
    },

    /// Report circular imports among the files reachable from an entry file.
    Cycles {
        /// Entry file, absolute or relative to the project root.
        entry: PathBuf,

        /// Project root (default: current directory).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum number of import hops from the entry file.
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output results as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// List project files that no entry file reaches.
    Unused {
        /// Entry files, absolute or relative to the project root. When none are
        /// given, every `main.py`, `*cli.py` and `visualization/app.py` is used.
        entries: Vec<PathBuf>,

        /// Project root (default: current directory).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum number of import hops from each entry file.
        #[arg(long)]
        max_depth: Option<usize>,

        /// Only consider these languages (comma-separated: python,javascript,typescript).
        #[arg(long, value_delimiter = ',')]
        language: Vec<String>,

        /// Output results as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}
