/// Integration test suite: drives the compiled `depgraph` binary against small
/// Python/TypeScript projects written into temp directories.
///
/// `CARGO_BIN_EXE_depgraph` is set by Cargo during `cargo test` to point to the
/// compiled binary for the current profile (debug or release).
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_depgraph"))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A mixed project: Python app with a package, a TS frontend, and noise that
/// must stay out of every graph.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "app/main.py", "import os\nfrom app.core import engine\nfrom . import helpers\n");
    write(root, "app/__init__.py", "");
    write(root, "app/helpers.py", "from .core.engine import run\n");
    write(root, "app/core/__init__.py", "");
    write(root, "app/core/engine.py", "import app.helpers\n");
    write(root, "app/orphan.py", "");
    write(root, "web/index.ts", "import React from 'react';\nimport { api } from './api';\n");
    write(root, "web/api.ts", "export const api = require('./generated/client');\n");
    write(root, "web/generated/client.js", "");
    write(root, "node_modules/react/index.js", "");
    write(root, "build/out.py", "");
    write(root, ".gitignore", "web/generated/\n");
    dir
}

/// Run a depgraph command and assert it exits successfully.
/// Returns stdout as a String.
fn run_success(args: &[&str]) -> String {
    let out = Command::new(binary())
        .args(args)
        .output()
        .expect("failed to invoke depgraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
        args,
        out.status,
        stdout,
        stderr
    );
    stdout
}

/// Run a depgraph command and assert it exits with a non-zero status.
/// Returns (stdout, stderr) as Strings.
fn run_failure(args: &[&str]) -> (String, String) {
    let out = Command::new(binary())
        .args(args)
        .output()
        .expect("failed to invoke depgraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully\nstdout: {}\nstderr: {}",
        args,
        stdout,
        stderr
    );
    (stdout, stderr)
}

fn analyze_json(root: &Path, entry: &str, extra: &[&str]) -> serde_json::Value {
    let root_str = root.to_str().unwrap();
    let mut args = vec!["analyze", entry, "--root", root_str];
    args.extend_from_slice(extra);
    let stdout = run_success(&args);
    serde_json::from_str(&stdout).expect("analyze output should be valid JSON")
}

fn node_ids(json: &serde_json::Value) -> Vec<String> {
    let mut ids: Vec<String> = json["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn test_analyze_python_entry_json() {
    let dir = fixture();
    let json = analyze_json(dir.path(), "app/main.py", &["--max-depth", "3"]);

    assert_eq!(json["entryPoint"], "app/main.py");
    assert_eq!(json["maxDepth"], 3);
    assert_eq!(
        node_ids(&json),
        vec![
            "app/core/__init__.py",
            "app/core/engine.py",
            "app/helpers.py",
            "app/main.py",
        ]
    );

    let first = &json["nodes"][0];
    assert_eq!(first["id"], "app/main.py");
    assert_eq!(first["label"], "main.py");
    assert_eq!(first["type"], "python");
    assert!(
        first["fullPath"].as_str().unwrap().ends_with("main.py"),
        "fullPath should be the absolute file path"
    );

    // Every edge endpoint must be a node.
    let ids = node_ids(&json);
    for edge in json["edges"].as_array().unwrap() {
        assert!(ids.contains(&edge["source"].as_str().unwrap().to_string()));
        assert!(ids.contains(&edge["target"].as_str().unwrap().to_string()));
    }
}

#[test]
fn test_analyze_typescript_skips_packages_and_ignored_files() {
    let dir = fixture();
    let json = analyze_json(dir.path(), "web/index.ts", &[]);

    assert_eq!(node_ids(&json), vec!["web/api.ts", "web/index.ts"]);
    assert_eq!(json["edges"].as_array().unwrap().len(), 1);
    assert_eq!(json["edges"][0]["source"], "web/index.ts");
    assert_eq!(json["edges"][0]["target"], "web/api.ts");
}

#[test]
fn test_analyze_depth_zero_is_entry_only() {
    let dir = fixture();
    let json = analyze_json(dir.path(), "app/main.py", &["--max-depth", "0"]);
    assert_eq!(node_ids(&json), vec!["app/main.py"]);
    assert!(json["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_analyze_depth_bounds_chain() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "import b\n");
    write(dir.path(), "b.py", "import c\n");
    write(dir.path(), "c.py", "");

    let json = analyze_json(dir.path(), "a.py", &["--max-depth", "1"]);
    assert_eq!(node_ids(&json), vec!["a.py", "b.py"]);
}

#[test]
fn test_analyze_dedupe_flag() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "import b\n");
    write(dir.path(), "b.py", "import a\n");

    let repeated = analyze_json(dir.path(), "a.py", &["--max-depth", "4"]);
    assert_eq!(repeated["edges"].as_array().unwrap().len(), 4);

    let deduped = analyze_json(dir.path(), "a.py", &["--max-depth", "4", "--dedupe-edges"]);
    assert_eq!(deduped["edges"].as_array().unwrap().len(), 2);

    let once = analyze_json(dir.path(), "a.py", &["--max-depth", "4", "--visit-once"]);
    assert_eq!(once["edges"].as_array().unwrap().len(), 2);
}

#[test]
fn test_analyze_reads_config_file() {
    let dir = fixture();
    write(dir.path(), "depgraph.toml", "max_depth = 1\nexclude = [\"helpers.py\"]\n");

    let json = analyze_json(dir.path(), "app/main.py", &[]);
    assert_eq!(json["maxDepth"], 1);
    assert_eq!(node_ids(&json), vec!["app/core/__init__.py", "app/main.py"]);
}

#[test]
fn test_analyze_dot_format() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let stdout = run_success(&["analyze", "web/index.ts", "--root", root, "--format", "dot"]);
    assert!(stdout.starts_with("digraph Dependencies {"), "got: {stdout}");
    assert!(stdout.contains("rankdir=LR;"));
    assert!(stdout.contains("web_index_ts [label=\"web/index.ts\" style=filled fillcolor=lightblue];"));
    assert!(stdout.contains("web_index_ts -> web_api_ts;"));
}

#[test]
fn test_analyze_mermaid_and_tree_formats() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();

    let mermaid = run_success(&["analyze", "web/index.ts", "--root", root, "--format", "mermaid"]);
    assert!(mermaid.starts_with("flowchart LR"));
    assert!(mermaid.contains("-->"));

    let tree = run_success(&["analyze", "web/index.ts", "--root", root, "--format", "tree"]);
    assert_eq!(tree, "web/index.ts\n└── web/api.ts\n");
}

#[test]
fn test_analyze_output_file_and_stats() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let out_path = dir.path().join("reports/graph.json");
    let out_str = out_path.to_str().unwrap();

    let output = Command::new(binary())
        .args(["analyze", "app/main.py", "--root", root, "--output", out_str, "--stats"])
        .output()
        .expect("failed to invoke depgraph binary");
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "graph should go to the file, not stdout");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Analyzed"), "stats summary expected on stderr: {stderr}");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["entryPoint"], "app/main.py");
}

#[test]
fn test_analyze_unknown_entry_type_yields_single_node() {
    let dir = fixture();
    write(dir.path(), "notes.md", "import app.main\n");
    let json = analyze_json(dir.path(), "notes.md", &[]);
    assert_eq!(node_ids(&json), vec!["notes.md"]);
    assert!(json["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_analyze_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let (stdout, stderr) = run_failure(&["analyze", "a.py", "--root", missing.to_str().unwrap()]);
    assert!(stdout.is_empty());
    assert!(stderr.contains("does not exist"), "got: {stderr}");
}

#[test]
fn test_analyze_external_backend_requires_script() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let (_, stderr) = run_failure(&["analyze", "app/main.py", "--root", root, "--backend", "external"]);
    assert!(stderr.contains("--script"), "got: {stderr}");
}

#[cfg(unix)]
#[test]
fn test_analyze_external_backend_failure_is_reported() {
    let dir = fixture();
    write(dir.path(), "tools/broken.sh", "echo 'Error: Entry point required' >&2\nexit 1\n");
    let root = dir.path().to_str().unwrap();
    let (_, stderr) = run_failure(&[
        "analyze",
        "app/main.py",
        "--root",
        root,
        "--backend",
        "external",
        "--interpreter",
        "sh",
        "--script",
        "tools/broken.sh",
    ]);
    assert!(stderr.contains("Entry point required"), "got: {stderr}");
}

// ---------------------------------------------------------------------------
// cycles / unused
// ---------------------------------------------------------------------------

#[test]
fn test_cycles_reports_package_cycle() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let stdout = run_success(&["cycles", "app/main.py", "--root", root]);
    assert_eq!(stdout, "app/core/engine.py -> app/helpers.py -> app/core/engine.py\n");

    let json: serde_json::Value =
        serde_json::from_str(&run_success(&["cycles", "app/main.py", "--root", root, "--json"]))
            .unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["files"][0], "app/core/engine.py");
}

#[test]
fn test_cycles_none_found() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let stdout = run_success(&["cycles", "web/index.ts", "--root", root]);
    assert_eq!(stdout, "no circular dependencies found\n");
}

#[test]
fn test_unused_lists_unreached_files() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let json: serde_json::Value = serde_json::from_str(&run_success(&[
        "unused",
        "app/main.py",
        "web/index.ts",
        "--root",
        root,
        "--json",
    ]))
    .unwrap();

    let unused: Vec<&str> = json["unused"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(unused, vec!["app/__init__.py", "app/orphan.py"]);
}

#[test]
fn test_unused_language_filter_and_bad_language() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let stdout = run_success(&["unused", "web/index.ts", "--root", root, "--language", "ts"]);
    assert!(stdout.starts_with("0 of 2 files unreachable"), "got: {stdout}");

    let (_, stderr) = run_failure(&["unused", "web/index.ts", "--root", root, "--language", "cobol"]);
    assert!(stderr.contains("unknown language"), "got: {stderr}");
}

#[test]
fn test_unused_defaults_to_conventional_entry_points() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&run_success(&["unused", "--root", root, "--json"])).unwrap();

    assert_eq!(json["entry_points"], serde_json::json!(["app/main.py"]));
    let unused: Vec<&str> = json["unused"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        unused,
        vec!["app/__init__.py", "app/orphan.py", "web/api.ts", "web/index.ts"]
    );
}

#[test]
fn test_unused_without_any_entry_point_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib/util.py", "");
    let (_, stderr) = run_failure(&["unused", "--root", dir.path().to_str().unwrap()]);
    assert!(stderr.contains("no entry points"), "got: {stderr}");
}

#[test]
fn test_analyze_deep_cycle_completes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "import b\n");
    write(dir.path(), "b.py", "import a\n");
    let root = dir.path().to_str().unwrap();

    let stdout = run_success(&["analyze", "a.py", "--root", root, "--max-depth", "20000", "--format", "dot"]);
    assert!(stdout.contains("a_py -> b_py;"));
    assert!(stdout.contains("b_py -> a_py;"));
}

#[test]
fn test_analyze_package_directory_does_not_hide_src_alias() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "node_modules/utils/index.js", "");
    write(dir.path(), "src/utils.ts", "export const x = 1;\n");
    write(dir.path(), "src/main.ts", "import { x } from 'utils';\n");

    let json = analyze_json(dir.path(), "src/main.ts", &[]);
    assert_eq!(node_ids(&json), vec!["src/main.ts", "src/utils.ts"]);
}

#[test]
fn test_analyze_stats_json() {
    let dir = fixture();
    let root = dir.path().to_str().unwrap();
    let output = Command::new(binary())
        .args(["analyze", "web/index.ts", "--root", root, "--stats-json"])
        .output()
        .expect("failed to invoke depgraph binary");
    assert!(output.status.success());

    let stats: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stats on stderr should be JSON");
    assert_eq!(stats["nodes"], 2);
    assert_eq!(stats["edges"], 1);
}
