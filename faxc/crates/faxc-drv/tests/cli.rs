//! End-to-end CLI tests for the `faxc` binary (`§10.4`'s `assert_cmd` /
//! `predicates` / `tempfile` integration stack, matching the teacher
//! driver's own `tests/e2e/cli_tests.rs`).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn faxc() -> Command {
    Command::cargo_bin("faxc").expect("faxc binary should build")
}

#[test]
fn compiles_the_identity_function_to_asm_by_default() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.fax");
    fs::write(&input, "fn main() -> i32 { let x: i32 = 1; return x; }").unwrap();

    faxc()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("main:"));
}

#[test]
fn emit_ir_prints_quadruples() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.fax");
    fs::write(&input, "fn main() -> i32 { let x: i32 = 1; return x; }").unwrap();

    faxc()
        .arg(&input)
        .arg("--emit=ir")
        .assert()
        .success()
        .stdout(predicate::str::contains("FUNC"));
}

#[test]
fn emit_tokens_prints_a_tag_per_line() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.fax");
    fs::write(&input, "fn main() -> i32 { return 1; }").unwrap();

    faxc()
        .arg(&input)
        .arg("--emit=tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("FN"))
        .stdout(predicate::str::contains("EOF"));
}

#[test]
fn output_flag_writes_to_a_file_instead_of_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.fax");
    let output = dir.path().join("main.s");
    fs::write(&input, "fn main() -> i32 { return 1; }").unwrap();

    faxc().arg(&input).arg("-o").arg(&output).assert().success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("main:"));
}

#[test]
fn a_mutability_error_exits_non_zero_and_names_the_variable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.fax");
    fs::write(&input, "fn main() { let x: i32 = 1; x = 2; }").unwrap();

    faxc()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains('x').and(predicate::str::contains("syntax error")));
}

#[test]
fn missing_input_file_is_a_usage_error() {
    faxc().assert().failure();
}
