use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const APP: &str = r#"
import sys

def main():
    args = parse_args(sys.argv)
    run(args)

def parse_args(argv):
    return list(argv)

def run(args):
    for arg in args:
        handle(arg)

def handle(arg):
    print(arg)
"#;

fn astviz(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("astviz").unwrap();
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_dot_output_from_directory() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "project/app.py", APP);

    astviz(tmp.path())
        .args(["-s", "project", "-d", "out", "-f", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Found 4 functions"));

    let dot = fs::read_to_string(tmp.path().join("out/call_graph.dot")).unwrap();
    assert!(dot.starts_with("digraph \"call_graph\" {"));
    assert!(dot.contains("\"main\" -> \"parse_args\";"));
    assert!(dot.contains("\"run\" -> \"handle\";"));
    assert!(dot.contains("\"print\" [style=\"dashed\"];"));
}

#[test]
fn test_json_output_with_custom_entrypoint() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", APP);

    astviz(tmp.path())
        .args(["--source", "app.py", "--entrypoint", "run", "--format", "json"])
        .args(["--output-name", "run_graph", "--exclude-builtins"])
        .assert()
        .success();

    let json = fs::read_to_string(tmp.path().join("graphs/run_graph.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["entrypoint"], "run");
    assert_eq!(value["callers"].as_array().unwrap().len(), 2);
    assert!(!json.contains("\"print\""));
}

#[test]
fn test_multiple_sources_and_missing_ones() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a/main.py", "def main():\n    helper()\n");
    write(tmp.path(), "b/helpers.py", "def helper():\n    pass\n");

    astviz(tmp.path())
        .args(["-s", "a,missing,b/helpers.py", "-f", "dot"])
        .assert()
        .success();

    let dot = fs::read_to_string(tmp.path().join("graphs/call_graph.dot")).unwrap();
    assert!(dot.contains("\"helper\" [tooltip="));
}

#[test]
fn test_no_python_files_fails() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "docs/readme.md", "# nothing here");

    astviz(tmp.path())
        .args(["-s", "docs,nowhere"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No Python files found in the given sources."));
}

#[test]
fn test_unknown_entrypoint_renders_nothing() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", APP);

    astviz(tmp.path())
        .args(["-s", "app.py", "-e", "absent", "-f", "dot"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No function calls found to render."));

    assert!(!tmp.path().join("graphs").exists());
}

#[test]
fn test_syntax_error_file_skipped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/app.py", APP);
    write(tmp.path(), "src/broken.py", "def main(:\n");

    astviz(tmp.path())
        .args(["-s", "src", "-f", "dot"])
        .assert()
        .success()
        .stderr(predicate::str::contains("due to syntax error"))
        .stderr(predicate::str::contains("Indexed 1 files (1 skipped)"));

    assert!(tmp.path().join("graphs/call_graph.dot").exists());
}

#[test]
fn test_invalid_format_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", APP);

    astviz(tmp.path())
        .args(["-s", "app.py", "-f", "bmp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn test_version() {
    let tmp = TempDir::new().unwrap();

    astviz(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
