//! End-to-end tests for the synctrack binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TRACE: &str = r#"# two files under /a, one finishes
{"type":"queued","id":1,"path":"/a/x","total_bytes":100}
{"type":"queued","id":2,"path":"/a/y","total_bytes":100}
{"type":"in_progress","id":1,"path":"/a/x","transferred_bytes":50,"total_bytes":100}
{"type":"completed","id":1,"path":"/a/x"}
"#;

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn synctrack() -> Command {
    let mut cmd = Command::cargo_bin("synctrack").unwrap();
    cmd.env_remove("SYNCTRACK_LOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn replay_prints_harvest_and_summary() {
    let trace = trace_file(TRACE);

    synctrack()
        .arg("replay")
        .arg(trace.path())
        .args(["--query", "/a", "--query", "/a/x"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"harvest":1,"after_event":4,"#))
        .stdout(predicate::str::contains(
            r#"{"status":"completed","progress":1.0,"path":"/a/x"}"#,
        ))
        .stdout(predicate::str::contains(
            r#"{"file_count":1,"states":[{"status":"queued","progress":0.5,"path":"/a"},{"status":"not_found","progress":0.0,"path":"/a/x"}]}"#,
        ));
}

#[test]
fn replay_harvest_every_splits_batches() {
    let trace = trace_file(TRACE);

    synctrack()
        .arg("replay")
        .arg(trace.path())
        .args(["--harvest-every", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"harvest":1,"after_event":2,"#))
        .stdout(predicate::str::contains(r#"{"harvest":2,"after_event":4,"#));
}

#[test]
fn config_sets_harvest_cadence() {
    let trace = trace_file(TRACE);
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[replay]\nharvest_every = 2").unwrap();

    synctrack()
        .arg("--config")
        .arg(config.path())
        .arg("replay")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"harvest":2,"after_event":4,"#));
}

#[test]
fn query_prints_one_state_per_path() {
    let trace = trace_file(TRACE);

    synctrack()
        .arg("query")
        .arg(trace.path())
        .args(["/a/x", "/missing"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "{\"status\":\"completed\",\"progress\":1.0,\"path\":\"/a/x\"}\n\
             {\"status\":\"not_found\",\"progress\":0.0,\"path\":\"/missing\"}\n",
        ));
}

#[test]
fn query_requires_paths() {
    let trace = trace_file(TRACE);

    synctrack().arg("query").arg(trace.path()).assert().failure();
}

#[test]
fn bad_trace_line_is_reported() {
    let trace = trace_file("{\"type\":\"queued\",\"id\":1,\"path\":\"/a\",\"total_bytes\":1}\nnot json\n");

    synctrack()
        .arg("replay")
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn missing_config_is_reported() {
    let trace = trace_file(TRACE);

    synctrack()
        .args(["--config", "/definitely/not/here.toml", "replay"])
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}
