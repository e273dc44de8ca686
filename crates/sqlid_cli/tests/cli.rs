//! End-to-end tests for the `sqlid` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn sqlid(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sqlid"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn sqlid");
    // The child may exit (e.g. on a usage error) before reading stdin.
    if let Err(err) = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
    {
        assert_eq!(
            err.kind(),
            std::io::ErrorKind::BrokenPipe,
            "failed to write stdin: {err}"
        );
    }
    child.wait_with_output().expect("failed to wait on sqlid")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn compute_prints_id_and_statement() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(dir.path(), &["compute", "select * from dual"], "");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a5ks9fhw2v9s1\tselect * from dual\n");
}

#[test]
fn batch_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(
        dir.path(),
        &["batch", "--format", "json"],
        "select * from dual\nSELECT * from dual where dummy = :1 \n",
    );
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"sql_id\":\"a5ks9fhw2v9s1\""));
    assert!(lines[1].contains("\"sql_id\":\"71hmmykrsa7wp\""));
}

#[test]
fn batch_zero_capacity_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(dir.path(), &["batch", "--capacity", "0"], "select 1\n");
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn quiet_keeps_records_and_silences_check() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(dir.path(), &["--quiet", "compute", "select * from dual"], "");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a5ks9fhw2v9s1\tselect * from dual\n");

    let output = sqlid(
        dir.path(),
        &["--quiet", "check", "a5ks9fhw2v9s1", "select * from dual"],
        "",
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
}

#[test]
fn check_mismatch_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(dir.path(), &["check", "71hmmykrsa7wp", "select * from dual"], "");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn local_config_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sqlid.toml"), "[cache]\ncapacity = 0\n").unwrap();
    let output = sqlid(dir.path(), &["compute", "select 1"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("capacity"));
}

#[test]
fn missing_explicit_config_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlid(
        dir.path(),
        &["--config", "does-not-exist.toml", "compute", "select 1"],
        "",
    );
    assert_eq!(output.status.code(), Some(2));
}
