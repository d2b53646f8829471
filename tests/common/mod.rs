//! Shared helpers for pod-source-fix integration tests
//!
//! A [`TestProject`] owns a temporary directory with a Podfile, an isolated
//! CocoaPods repos directory and a fake `pod` script that appends its
//! arguments to a log instead of touching the network.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestProject {
    _temp_dir: TempDir,
    project_dir: PathBuf,
    repos_dir: PathBuf,
    pod_log: PathBuf,
    pod_bin: PathBuf,
}

impl TestProject {
    /// Create a project whose fake `pod` accepts every registration.
    pub fn new() -> Result<Self> {
        Self::build(None, None)
    }

    /// Create a project whose fake `pod` fails when asked to add `uri`.
    pub fn failing_on(uri: &str) -> Result<Self> {
        Self::build(Some(uri), None)
    }

    /// Create a project whose fake `pod` sleeps before every successful call.
    pub fn slow(delay_secs: u32) -> Result<Self> {
        Self::build(None, Some(delay_secs))
    }

    fn build(failing_uri: Option<&str>, delay_secs: Option<u32>) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("app");
        let repos_dir = temp_dir.path().join("repos");
        let bin_dir = temp_dir.path().join("bin");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&repos_dir)?;
        fs::create_dir_all(&bin_dir)?;

        let pod_log = temp_dir.path().join("pod.log");
        let pod_bin = bin_dir.join("pod");
        write_fake_pod(&pod_bin, &pod_log, failing_uri, delay_secs)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            repos_dir,
            pod_log,
            pod_bin,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn repos_path(&self) -> &Path {
        &self.repos_dir
    }

    pub fn pod_bin(&self) -> &Path {
        &self.pod_bin
    }

    pub fn podfile_path(&self) -> PathBuf {
        self.project_dir.join("Podfile")
    }

    pub fn write_podfile(&self, content: &str) -> Result<PathBuf> {
        let path = self.podfile_path();
        fs::write(&path, content).context("Failed to write Podfile")?;
        Ok(path)
    }

    /// Every invocation of the fake `pod`, one argument string per line.
    pub fn pod_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.pod_log)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Run the binary with the project's fake `pod` and repos directory.
    pub fn run_tool(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_pod-source-fix"))
            .args(args)
            .arg("--pod-bin")
            .arg(&self.pod_bin)
            .arg("--repos-dir")
            .arg(&self.repos_dir)
            .current_dir(&self.project_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run pod-source-fix")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

#[cfg(unix)]
fn write_fake_pod(
    path: &Path,
    log: &Path,
    failing_uri: Option<&str>,
    delay_secs: Option<u32>,
) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let fail_branch = match failing_uri {
        Some(uri) => format!(
            "case \"$*\" in\n  *\"{uri}\"*) echo \"[!] Unable to clone {uri}\" >&2; exit 1 ;;\nesac\n"
        ),
        None => String::new(),
    };
    let delay = delay_secs.map(|secs| format!("sleep {secs}\n")).unwrap_or_default();
    let script = format!(
        "#!/bin/sh\necho \"$*\" >> \"{}\"\n{fail_branch}{delay}exit 0\n",
        log.display()
    );
    fs::write(path, script)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn write_fake_pod(
    path: &Path,
    _log: &Path,
    _failing_uri: Option<&str>,
    _delay_secs: Option<u32>,
) -> Result<()> {
    fs::write(path, "")?;
    Ok(())
}

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }
}
