use assert_cmd::Command;
use predicates::prelude::*;

fn tool() -> Command {
    let mut cmd = Command::cargo_bin("pod-source-fix").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("POD_SOURCE_FIX_POD")
        .env_remove("CP_REPOS_DIR");
    cmd
}

#[test]
fn test_missing_podfile_prints_usage_and_exits_1() {
    tool()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[!] podfile path is missing"))
        .stdout(predicate::str::contains("--podfile"));
}

#[test]
fn test_podfile_flag_without_value_exits_1() {
    tool().arg("-f").assert().code(1).stderr(predicate::str::contains("--podfile"));
}

#[test]
fn test_help_exits_successfully() {
    tool()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PODFILE_PATH"));
}

#[test]
fn test_version_flag() {
    tool()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_is_rejected() {
    tool()
        .args(["-f", "Podfile", "--no-such-flag"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn test_nonexistent_podfile_fails() {
    let dir = tempfile::tempdir().unwrap();
    tool()
        .current_dir(dir.path())
        .args(["-f", "Missing/Podfile", "--repos-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Podfile not found"));
}
