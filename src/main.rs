mod cli;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{BackendKind, Cli, Commands};
use depgraph::backend::{AnalysisRequest, BuiltinBackend, ExternalScriptBackend, GraphBackend};
use depgraph::config::DepGraphConfig;
use depgraph::export::{render, write_output};
use depgraph::ignore_rules::IgnoreRules;
use depgraph::language::LanguageKind;
use depgraph::output::print_summary;
use depgraph::query::{cycles, unused};
use depgraph::{BuilderOptions, DependencyGraphBuilder};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Analyze {
            entry,
            root,
            max_depth,
            format,
            output,
            dedupe_edges,
            visit_once,
            backend,
            interpreter,
            script,
            stats,
            stats_json,
        } => {
            let root = project_root(root)?;
            let config = DepGraphConfig::load(&root);
            let request = AnalysisRequest {
                entry_point: entry,
                max_depth: max_depth.unwrap_or_else(|| config.max_depth_or_default()),
                project_root: root,
            };

            let backend: Box<dyn GraphBackend> = match backend {
                BackendKind::Builtin => {
                    let options = builder_options(&config, dedupe_edges, visit_once);
                    Box::new(BuiltinBackend::new(new_builder(options)))
                }
                BackendKind::External => {
                    let script = script
                        .or_else(|| config.external.script.clone())
                        .context("the external backend needs --script or [external].script in depgraph.toml")?;
                    let interpreter = interpreter.or_else(|| config.external.interpreter.clone());
                    Box::new(ExternalScriptBackend::new(script, interpreter))
                }
            };

            let analysis = backend.run(&request)?;
            let content = render(&analysis.graph, format)?;
            write_output(&content, output.as_deref())?;

            if stats || stats_json {
                print_summary(&analysis.stats, stats_json);
            }
        }

        Commands::Cycles {
            entry,
            root,
            max_depth,
            json,
        } => {
            let root = project_root(root)?;
            let config = DepGraphConfig::load(&root);
            let builder = new_builder(builder_options(&config, true, false));
            let max_depth = max_depth.unwrap_or_else(|| config.max_depth_or_default());

            let graph = builder.analyze(&entry, &root, max_depth)?;
            let found = cycles::find_cycles(&graph);
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print!("{}", cycles::format_cycles(&found));
            }
        }

        Commands::Unused {
            entries,
            root,
            max_depth,
            language,
            json,
        } => {
            let root = project_root(root)?;
            let config = DepGraphConfig::load(&root);
            let options = builder_options(&config, true, false);
            let excludes = options.exclude.clone();
            let builder = new_builder(options);
            let max_depth = max_depth.unwrap_or_else(|| config.max_depth_or_default());
            let languages = parse_languages(&language)?;
            let entries = if entries.is_empty() {
                default_entries(&root, &excludes)?
            } else {
                entries
            };

            let report = unused::find_unused(
                &builder,
                &root,
                &entries,
                max_depth,
                &excludes,
                languages.as_ref(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", unused::format_unused(&report));
            }
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the `-v`/`-q` flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Syntax-tree extraction for JS/TS when built with the `tree-sitter` feature.
fn new_builder(options: BuilderOptions) -> DependencyGraphBuilder {
    #[cfg(feature = "tree-sitter")]
    let builder =
        DependencyGraphBuilder::with_extractor(depgraph::extract::syntax::TreeSitterExtractor);
    #[cfg(not(feature = "tree-sitter"))]
    let builder = DependencyGraphBuilder::new();
    builder.options(options)
}

/// `--root`, else the current directory, made absolute.
fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(match root {
        Some(r) if r.is_absolute() => r,
        Some(r) => cwd.join(r),
        None => cwd,
    })
}

/// CLI flags can only switch behaviours on; depgraph.toml supplies the rest.
fn builder_options(config: &DepGraphConfig, dedupe_edges: bool, visit_once: bool) -> BuilderOptions {
    BuilderOptions {
        depth_limited: !visit_once && config.depth_limited_or_default(),
        dedupe_edges: dedupe_edges || config.dedupe_edges,
        exclude: config.exclude_patterns().to_vec(),
    }
}

/// Entry points for `unused` when none are named on the command line.
fn default_entries(root: &Path, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let rules = IgnoreRules::load(root, excludes);
    let found = unused::find_default_entry_points(root, &rules);
    if found.is_empty() {
        bail!(
            "no entry points given and none found under {} (looked for main.py, *cli.py, visualization/app.py)",
            root.display()
        );
    }
    tracing::info!("using {} default entry points", found.len());
    Ok(found)
}

fn parse_languages(names: &[String]) -> Result<Option<HashSet<LanguageKind>>> {
    if names.is_empty() {
        return Ok(None);
    }
    let mut set = HashSet::new();
    for name in names {
        match LanguageKind::from_str_loose(name) {
            Some(lang) => {
                set.insert(lang);
            }
            None => bail!("unknown language {name:?} (expected python, javascript or typescript)"),
        }
    }
    Ok(Some(set))
}
