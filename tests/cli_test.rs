//! Binary-level CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn kitbag() -> Command {
    Command::cargo_bin("kitbag").expect("binary builds")
}

#[test]
fn help_lists_subcommands() {
    kitbag()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("deploy-key"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_works() {
    kitbag()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kitbag"));
}

#[test]
fn no_subcommand_is_usage_error() {
    kitbag().assert().failure();
}

#[test]
fn deploy_key_help_exits_zero() {
    kitbag()
        .args(["deploy-key", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy key"));
}

#[test]
fn setup_help_exits_zero() {
    kitbag()
        .args(["setup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-configs"));
}

#[test]
fn completions_bash_generates_script() {
    kitbag()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kitbag"));
}

#[test]
fn probe_json_emits_profile_or_fails_unsupported() {
    // The test host may or may not carry a known package manager; both
    // outcomes are contractual.
    let output = kitbag().args(["probe", "--json"]).output().unwrap();

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
        let family = json["profile"]["os_family"].as_str().expect("os_family");
        assert!(
            ["linux-debian", "linux-arch", "linux-fedora", "linux-rhel", "macos"]
                .contains(&family),
            "unexpected family {}",
            family
        );
        assert!(json["plan"]["install"]["program"].is_string());
        assert!(json["plan"]["packages"].as_array().unwrap().len() >= 4);
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Unsupported platform"));
    }
}

#[test]
fn probe_human_output_names_the_manager() {
    let output = kitbag().arg("probe").output().unwrap();

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("package manager"));
        assert!(stdout.contains("install command"));
    } else {
        assert_ne!(output.status.code(), Some(0));
    }
}
