// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]
//! Black-box tests for the `upf` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn upf() -> Command {
    Command::cargo_bin("upf").expect("upf binary builds")
}

#[test]
fn uniform_prints_expected_and_actual_pairs() {
    // 10×10 lattice: 2·10·9 + 2·9·9 = 342 neighbour pairs.
    upf()
        .args(["uniform", "--per-line", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("expected pairs: 342"))
        .stdout(predicate::str::contains("342"));
}

#[test]
fn json_summary_is_machine_readable() {
    let output = upf()
        .args(["--json", "--workers", "2", "uniform", "--per-line", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["scenario"], "uniform");
    assert_eq!(summary["expected_pairs"], 42);
    assert_eq!(summary["pairs_per_run"], serde_json::json!([42]));
}

#[test]
fn config_file_is_loaded_and_flags_override_it() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "cell_size": {{ "horizontal": 2.0, "vertical": 2.0 }}, "workers": 3 }}"#
    )
    .unwrap();

    upf()
        .arg("--config")
        .arg(file.path())
        .args(["--json", "random", "--runs", "2", "--objects", "400", "--h-max", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"runs\": 2"));
}

#[test]
fn moving_scene_runs_with_flags_after_the_subcommand() {
    upf()
        .args(["moving", "--runs", "3", "--objects", "200", "--delta", "0.5", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moving scene, 200 objects"));
}

#[test]
fn invalid_cell_size_fails() {
    upf()
        .args(["random", "--cell-h", "0", "--objects", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid cell size"));
}

#[test]
fn missing_config_file_fails_with_context() {
    upf()
        .args(["--config", "/definitely/not/here.json", "uniform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open config"));
}
