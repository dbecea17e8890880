//! Depth-bounded import graph construction.
//!
//! [`DependencyGraphBuilder::analyze`] walks from an entry file through
//! resolvable imports and returns a [`DependencyGraph`]. All per-run state
//! (visited set, first-visit depths, nodes, edges, counters) lives in a
//! [`Traversal`] created inside the call, so one builder can serve concurrent
//! analyses.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::error::AnalyzeError;
use crate::extract::{ImportExtractor, RegexExtractor, SourceFile};
use crate::graph::{DependencyGraph, FileNode, ImportEdge};
use crate::ignore_rules::{IgnoreRules, relative_id};
use crate::language::LanguageKind;
use crate::output::AnalysisStats;
use crate::resolver::{ImportResolver, ResolutionOutcome, normalize};

/// Cooperative cancellation flag, checked before every file visit.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Knobs that select between the historical analyzer behaviours.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// `true`: depth-first walk where a file reached again is re-walked
    /// (first-visit depth wins, edges may repeat). `false`: breadth-first,
    /// every file processed once at its shortest depth.
    pub depth_limited: bool,
    /// Skip appending an edge identical to one already recorded.
    pub dedupe_edges: bool,
    /// Extra glob patterns appended to the ignore list.
    pub exclude: Vec<String>,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            depth_limited: true,
            dedupe_edges: false,
            exclude: Vec::new(),
        }
    }
}

/// Graph plus the counters gathered while building it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub stats: AnalysisStats,
}

/// Builds dependency graphs; cheap to share, holds no per-run state.
pub struct DependencyGraphBuilder {
    extractor: Arc<dyn ImportExtractor>,
    options: BuilderOptions,
    cancel: CancellationToken,
}

impl Default for DependencyGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraphBuilder {
    /// Builder with the regex extractor and default options.
    pub fn new() -> Self {
        Self::with_extractor(RegexExtractor)
    }

    pub fn with_extractor(extractor: impl ImportExtractor + 'static) -> Self {
        Self {
            extractor: Arc::new(extractor),
            options: BuilderOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Build the import graph reachable from `entry_point` within `max_depth` hops.
    pub fn analyze(
        &self,
        entry_point: &Path,
        project_root: &Path,
        max_depth: usize,
    ) -> Result<DependencyGraph, AnalyzeError> {
        self.run(entry_point, project_root, max_depth)
            .map(|analysis| analysis.graph)
    }

    /// Same as [`analyze`](Self::analyze) but also returns run statistics.
    pub fn run(
        &self,
        entry_point: &Path,
        project_root: &Path,
        max_depth: usize,
    ) -> Result<Analysis, AnalyzeError> {
        let started = Instant::now();
        let root = validate_root(project_root)?;
        let entry = normalize(&root.join(entry_point));

        let rules = IgnoreRules::load(&root, &self.options.exclude);
        let resolver = ImportResolver::new(&root);

        let mut traversal = Traversal {
            root: &root,
            max_depth,
            rules: &rules,
            resolver: &resolver,
            extractor: self.extractor.as_ref(),
            options: &self.options,
            cancel: &self.cancel,
            visited: HashSet::new(),
            first_depth: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            seen_edges: HashSet::new(),
            stats: AnalysisStats::default(),
        };

        if relative_id(&root, &entry).is_none() {
            tracing::warn!(
                "entry point {} is outside project root {}",
                entry.display(),
                root.display()
            );
        } else if self.options.depth_limited {
            traversal.walk_depth_first(&entry)?;
        } else {
            traversal.walk_breadth_first(&entry)?;
        }

        let entry_id = node_id(&root, &entry);
        let mut stats = traversal.stats;
        let mut nodes = traversal.nodes;
        if nodes.is_empty() {
            tracing::debug!("nothing reachable from {entry_id}, synthesizing entry node");
            let language = LanguageKind::from_path(&entry).unwrap_or(LanguageKind::Python);
            nodes.push(FileNode::new(entry_id.clone(), &entry, language));
        }

        stats.nodes = nodes.len();
        stats.edges = traversal.edges.len();
        stats.elapsed_secs = started.elapsed().as_secs_f64();
        tracing::info!(
            "analyzed {entry_id}: {} files, {} edges in {:.3}s",
            stats.nodes,
            stats.edges,
            stats.elapsed_secs
        );

        Ok(Analysis {
            graph: DependencyGraph {
                nodes,
                edges: traversal.edges,
                entry_point: entry_id,
                max_depth,
            },
            stats,
        })
    }
}

/// Fail fast on a missing or empty project root.
pub(crate) fn validate_root(root: &Path) -> Result<PathBuf, AnalyzeError> {
    if root.as_os_str().is_empty() {
        return Err(AnalyzeError::EmptyRoot);
    }
    if !root.exists() {
        return Err(AnalyzeError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AnalyzeError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(normalize(root))
}

/// Root-relative id; files outside the root keep their full path as id.
fn node_id(root: &Path, path: &Path) -> String {
    relative_id(root, path).unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"))
}

/// An import target that passed every gate and may become an edge.
struct Target {
    path: PathBuf,
    id: String,
}

/// A file on the depth-first stack and the targets it has left to follow.
struct Frame {
    id: String,
    depth: usize,
    targets: std::vec::IntoIter<Target>,
}

/// State for a single `run()`.
struct Traversal<'a> {
    root: &'a Path,
    max_depth: usize,
    rules: &'a IgnoreRules,
    resolver: &'a ImportResolver,
    extractor: &'a dyn ImportExtractor,
    options: &'a BuilderOptions,
    cancel: &'a CancellationToken,
    visited: HashSet<PathBuf>,
    first_depth: HashMap<PathBuf, usize>,
    nodes: Vec<FileNode>,
    edges: Vec<ImportEdge>,
    seen_edges: HashSet<ImportEdge>,
    stats: AnalysisStats,
}

impl Traversal<'_> {
    fn check_cancelled(&self) -> Result<(), AnalyzeError> {
        if self.cancel.is_cancelled() {
            return Err(AnalyzeError::Cancelled);
        }
        Ok(())
    }

    /// Ignore and classification gates shared by the entry and every target.
    fn admit(&self, path: &Path) -> Option<(String, LanguageKind)> {
        let id = relative_id(self.root, path)?;
        if self.rules.is_ignored_relative(&id) {
            return None;
        }
        let language = LanguageKind::from_path(path)?;
        Some((id, language))
    }

    /// Record a node on first visit. Returns `true` if this was the first visit.
    fn record(&mut self, path: &Path, id: &str, language: LanguageKind, depth: usize) -> bool {
        if !self.visited.insert(path.to_path_buf()) {
            return false;
        }
        self.first_depth.insert(path.to_path_buf(), depth);
        self.nodes.push(FileNode::new(id, path, language));
        true
    }

    fn push_edge(&mut self, source: &str, target: &str) {
        let edge = ImportEdge::new(source, target);
        if self.options.dedupe_edges && !self.seen_edges.insert(edge.clone()) {
            return;
        }
        self.edges.push(edge);
    }

    /// Depth-first walk. A file reached again (at any depth within the bound)
    /// keeps its first node but has its imports walked again.
    ///
    /// Uses an explicit stack of open files, so the walk depth is bounded by
    /// `max_depth` and heap memory rather than the thread stack.
    fn walk_depth_first(&mut self, entry: &Path) -> Result<(), AnalyzeError> {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.enter(entry, 0)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(target) = frame.targets.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth + 1;
            self.push_edge(&frame.id, &target.id);
            if let Some(child) = self.enter(&target.path, depth)? {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Visit one file on the depth-first walk. Returns a frame holding its
    /// admissible targets, or `None` when nothing below it can become an edge.
    fn enter(&mut self, path: &Path, depth: usize) -> Result<Option<Frame>, AnalyzeError> {
        self.check_cancelled()?;

        if depth > self.max_depth {
            return Ok(None);
        }
        let Some((id, language)) = self.admit(path) else {
            tracing::debug!("skipping {}", path.display());
            return Ok(None);
        };

        if self.record(path, &id, language, depth) {
            tracing::debug!(file = %id, depth, "visit");
        } else {
            self.stats.revisits += 1;
            tracing::trace!(
                file = %id,
                depth,
                first_depth = self.first_depth.get(path).copied().unwrap_or(depth),
                "revisit"
            );
        }

        // Targets would land beyond the bound: no edges from here.
        if depth >= self.max_depth {
            return Ok(None);
        }

        Ok(self.imports_of(path, &id, language).map(|targets| Frame {
            id,
            depth,
            targets: targets.into_iter(),
        }))
    }

    /// Breadth-first walk; each file's imports are processed exactly once, at
    /// its shortest distance from the entry.
    fn walk_breadth_first(&mut self, entry: &Path) -> Result<(), AnalyzeError> {
        self.check_cancelled()?;
        let Some((entry_id, language)) = self.admit(entry) else {
            return Ok(());
        };
        self.record(entry, &entry_id, language, 0);

        let mut queue: VecDeque<(PathBuf, String, LanguageKind, usize)> = VecDeque::new();
        queue.push_back((entry.to_path_buf(), entry_id, language, 0));

        while let Some((path, id, language, depth)) = queue.pop_front() {
            self.check_cancelled()?;
            if depth >= self.max_depth {
                continue;
            }
            let Some(targets) = self.imports_of(&path, &id, language) else {
                continue;
            };
            for target in targets {
                self.push_edge(&id, &target.id);
                let Some(target_language) = LanguageKind::from_path(&target.path) else {
                    continue;
                };
                if self.record(&target.path, &target.id, target_language, depth + 1) {
                    queue.push_back((target.path, target.id, target_language, depth + 1));
                }
            }
        }
        Ok(())
    }

    /// Read, extract and resolve the imports of one file, returning the
    /// admissible targets in source order. `None` if the file can't be read.
    fn imports_of(&mut self, path: &Path, id: &str, language: LanguageKind) -> Option<Vec<Target>> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!("error analyzing file {}: {err}", path.display());
                self.stats.unreadable_files += 1;
                return None;
            }
        };

        let file = SourceFile {
            path,
            root: self.root,
            language,
        };
        let specifiers = self.extractor.extract(&file, &content);
        self.stats.imports_found += specifiers.len();

        // Resolution is independent per specifier; collect keeps source order.
        let resolver = self.resolver;
        let outcomes: Vec<ResolutionOutcome> = specifiers
            .par_iter()
            .map(|spec| resolver.resolve(spec, language, path))
            .collect();

        let mut targets = Vec::new();
        for (spec, outcome) in specifiers.iter().zip(outcomes) {
            match outcome {
                ResolutionOutcome::Resolved(target) => {
                    if target == path {
                        self.stats.self_imports += 1;
                        tracing::debug!(file = %id, specifier = %spec, "self-import ignored");
                        continue;
                    }
                    match self.admit(&target) {
                        Some((target_id, _)) => {
                            self.stats.resolved_imports += 1;
                            tracing::debug!(file = %id, specifier = %spec, target = %target_id, "resolved");
                            targets.push(Target {
                                path: target,
                                id: target_id,
                            });
                        }
                        None => {
                            self.stats.skipped_targets += 1;
                            tracing::debug!(
                                file = %id,
                                specifier = %spec,
                                "target {} is ignored, unsupported or outside the root",
                                target.display()
                            );
                        }
                    }
                }
                ResolutionOutcome::External(package) => {
                    self.stats.external_packages += 1;
                    tracing::debug!(file = %id, package = %package, "external package");
                }
                ResolutionOutcome::Unresolved => {
                    self.stats.unresolved_imports += 1;
                    tracing::debug!(file = %id, specifier = %spec, "unresolved");
                }
            }
        }
        Some(targets)
    }
}
