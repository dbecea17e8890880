//! Static import-dependency graphs for Python, JavaScript and TypeScript.
//!
//! [`DependencyGraphBuilder`] walks from an entry file through the imports it
//! can resolve to project files, up to a depth bound, and returns a
//! [`DependencyGraph`] of files and import edges.

pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod graph;
pub mod ignore_rules;
pub mod language;
pub mod output;
pub mod query;
pub mod resolver;
pub mod walker;

pub use builder::{Analysis, BuilderOptions, CancellationToken, DependencyGraphBuilder};
pub use error::AnalyzeError;
pub use graph::{DependencyGraph, FileNode, ImportEdge};
pub use language::LanguageKind;
