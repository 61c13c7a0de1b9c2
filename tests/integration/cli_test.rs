//! CLI tests for the termsvg binary

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use super::helpers::temp_fixture;

/// The binary with an isolated config location.
fn termsvg(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_termsvg"));
    cmd.env("TERMSVG_CONFIG", config_dir.join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_writes_svg_next_to_input() {
    let (temp_dir, path) = temp_fixture("sample.cast");
    termsvg(temp_dir.path())
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("sample.svg"));

    let svg = std::fs::read_to_string(temp_dir.path().join("sample.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn render_to_explicit_output_with_theme() {
    let (temp_dir, path) = temp_fixture("no_theme.cast");
    let output = temp_dir.path().join("out.svg");
    termsvg(temp_dir.path())
        .args(["render", "--theme", "dracula"])
        .arg(&path)
        .arg(&output)
        .assert()
        .success();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("fill=\"#282a36\""));
    assert!(svg.contains(">plain</text>"));
}

#[test]
fn explicit_theme_overrides_recorded_theme() {
    let (temp_dir, path) = temp_fixture("sample.cast");
    let output = temp_dir.path().join("dracula.svg");
    termsvg(temp_dir.path())
        .arg("render")
        .arg(&path)
        .arg(&output)
        .args(["--theme", "dracula"])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#282a36\"/>"));
    assert!(!svg.contains("#002b36"));
}

#[test]
fn failed_session_start_leaves_no_cast_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.cast");
    termsvg(dir.path())
        .arg("record")
        .arg(&output)
        .args(["--command", "/nonexistent/termsvg-session", "--theme", "classic-dark"])
        .stdin(std::process::Stdio::null())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    assert!(!output.exists());
}

#[test]
fn unsupported_version_writes_nothing() {
    let (temp_dir, path) = temp_fixture("v2.cast");
    let output = temp_dir.path().join("v2.svg");
    termsvg(temp_dir.path())
        .arg("render")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "unsupported cast format version 2",
        ));
    assert!(!output.exists());
}

#[test]
fn malformed_record_needs_lenient() {
    let (temp_dir, path) = temp_fixture("malformed.cast");
    termsvg(temp_dir.path())
        .args(["render", "--theme", "classic-dark"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));

    termsvg(temp_dir.path())
        .args(["render", "--lenient", "--theme", "classic-dark"])
        .arg(&path)
        .assert()
        .success();
    assert!(temp_dir.path().join("malformed.svg").exists());
}

#[test]
fn missing_input_names_path() {
    let dir = tempfile::tempdir().unwrap();
    termsvg(dir.path())
        .args(["render", "/nonexistent/session.cast"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Failed to open file"));
}

#[test]
fn themes_lists_builtins() {
    let dir = tempfile::tempdir().unwrap();
    termsvg(dir.path())
        .arg("themes")
        .assert()
        .success()
        .stdout(predicate::str::contains("dracula\n"))
        .stdout(predicate::str::contains("solarized-dark (default)\n"));
}

#[test]
fn config_path_and_init() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    termsvg(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    termsvg(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("theme = \"auto\""));
    assert!(content.contains("[render]"));

    termsvg(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    termsvg(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn config_show_reflects_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "theme = \"zenburn\"\n").unwrap();

    termsvg(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = \"zenburn\""))
        .stdout(predicate::str::contains("font_size = 14"));
}
