#![cfg(unix)]

mod support;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use support::{DIAGRAM, failing_renderer, fake_java, fake_plantweb, listing};
use tempfile::TempDir;

fn plantsvg(work: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plantsvg"));
    cmd.current_dir(work.path())
        .env_remove("PLANTSVG_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn inline_diagram_is_written_to_stdout() {
    let tools = TempDir::new().expect("tools dir");
    let work = TempDir::new().expect("work dir");

    let assert = plantsvg(&work)
        .env("PLANTSVG__RENDER__WEB_CLI_PATH", fake_plantweb(tools.path()))
        .write_stdin(DIAGRAM)
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.starts_with("<svg>"), "unexpected stdout: {output}");
    assert!(output.contains("Alice -> Bob: hello"));
    assert!(listing(work.path()).is_empty());
}

#[test]
fn name_flag_persists_both_files() {
    let tools = TempDir::new().expect("tools dir");
    let work = TempDir::new().expect("work dir");

    plantsvg(&work)
        .arg("--web-cli-path")
        .arg(fake_plantweb(tools.path()))
        .args(["-n", "seq"])
        .write_stdin(DIAGRAM)
        .assert()
        .success()
        .stdout(contains("backend=web"));

    assert_eq!(listing(work.path()), ["seq.svg", "seq.uml"]);
}

#[test]
fn plantuml_path_selects_the_jar_renderer() {
    let tools = TempDir::new().expect("tools dir");
    let work = TempDir::new().expect("work dir");

    plantsvg(&work)
        .arg("--java-path")
        .arg(fake_java(tools.path()))
        .args(["-p", "/opt/tools/plantuml.jar"])
        .write_stdin(DIAGRAM)
        .assert()
        .success()
        .stdout(contains("backend=jar jar=/opt/tools/plantuml.jar"));

    assert!(listing(work.path()).is_empty());
}

#[test]
fn bare_file_flag_reads_location_from_stdin() {
    let tools = TempDir::new().expect("tools dir");
    let work = TempDir::new().expect("work dir");
    let local = work.path().join("existing.uml");
    fs::write(&local, DIAGRAM).expect("write uml");

    plantsvg(&work)
        .arg("--web-cli-path")
        .arg(fake_plantweb(tools.path()))
        .arg("-f")
        .write_stdin("existing.uml\n")
        .assert()
        .success()
        .stdout(contains("Alice -> Bob"));

    assert_eq!(listing(work.path()), ["existing.uml"]);
}

#[test]
fn missing_local_file_fails() {
    let work = TempDir::new().expect("work dir");

    plantsvg(&work)
        .args(["--file", "nowhere.uml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));
}

#[test]
fn renderer_failure_exits_non_zero_and_cleans_up() {
    let tools = TempDir::new().expect("tools dir");
    let work = TempDir::new().expect("work dir");

    plantsvg(&work)
        .arg("--web-cli-path")
        .arg(failing_renderer(tools.path()))
        .write_stdin(DIAGRAM)
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(contains("renderer invocation failed"));

    assert!(listing(work.path()).is_empty());
}

#[test]
fn invalid_log_level_is_a_configuration_error() {
    let work = TempDir::new().expect("work dir");

    plantsvg(&work)
        .args(["--log-level", "chatty"])
        .write_stdin(DIAGRAM)
        .assert()
        .failure()
        .stderr(contains("logging.level"));
}
