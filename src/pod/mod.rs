//! CocoaPods integration
//!
//! Everything that touches the `pod` executable or its on-disk state lives
//! here:
//!
//! - [`PodInvocation`] - how `pod` is launched (plain, through bundler, or a custom binary)
//! - [`PodCommand`] - builder that runs one `pod` process
//! - [`RepoRegistry`] - the two operations the fixer needs: drop a stale alias
//!   directory and register a repository
//! - [`PodRepoRegistry`] - the real [`RepoRegistry`] backed by `pod repo add`
//!   and the local repos directory (`~/.cocoapods/repos` by default)
//!
//! # Bundler detection
//!
//! When a `Gemfile.lock` next to the Podfile pins the `cocoapods` gem, the
//! project expects `bundle exec pod`. Registering the repository with a
//! different CocoaPods than the one `pod install` will use later can leave the
//! repo in a format the install does not understand, so the same invocation is
//! used here.

pub mod command_builder;

pub use command_builder::{PodCommand, PodCommandOutput};

use anyhow::{Context, Result};
use regex::Regex;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::constants::{COCOAPODS_REPOS_SUBDIR, DEFAULT_POD_COMMAND};
use crate::utils::platform::{command_exists, get_home_dir};

/// How the `pod` executable is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInvocation {
    program: String,
    prefix_args: Vec<String>,
}

impl Default for PodInvocation {
    fn default() -> Self {
        Self::custom(DEFAULT_POD_COMMAND)
    }
}

impl PodInvocation {
    /// Run `program` directly.
    pub fn custom(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Run `bundle exec pod`.
    pub fn bundler() -> Self {
        Self {
            program: "bundle".to_string(),
            prefix_args: vec!["exec".to_string(), DEFAULT_POD_COMMAND.to_string()],
        }
    }

    /// Pick the invocation for a Podfile directory.
    ///
    /// An explicit override wins. Otherwise bundler is used when
    /// `<podfile_dir>/Gemfile.lock` lists the `cocoapods` gem, and plain `pod`
    /// in every other case, including an unreadable `Gemfile.lock`.
    pub fn detect(podfile_dir: &Path, override_program: Option<&str>) -> Self {
        if let Some(program) = override_program {
            return Self::custom(program);
        }

        let gemfile_lock = podfile_dir.join("Gemfile.lock");
        match std::fs::read_to_string(&gemfile_lock) {
            Ok(content) => {
                if let Some(version) = cocoapods_version_from_gemfile_lock(&content) {
                    tracing::info!(
                        "Gemfile.lock pins cocoapods {} ({}), using bundler",
                        version,
                        gemfile_lock.display()
                    );
                    return Self::bundler();
                }
                tracing::debug!("No cocoapods gem in {}", gemfile_lock.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No Gemfile.lock at {}", gemfile_lock.display());
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", gemfile_lock.display(), e);
            }
        }

        Self::default()
    }

    /// The executable that is spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the pod arguments (`exec pod` under bundler).
    pub fn prefix_args(&self) -> &[String] {
        &self.prefix_args
    }

    /// Whether the executable can be found on PATH.
    pub fn is_available(&self) -> bool {
        command_exists(&self.program)
    }
}

impl std::fmt::Display for PodInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.prefix_args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Extract the cocoapods gem version from `Gemfile.lock` content.
///
/// Only the first `specs:` block is searched; the scan stops at the first
/// blank line.
#[must_use]
pub fn cocoapods_version_from_gemfile_lock(content: &str) -> Option<String> {
    let gem = Regex::new(r"cocoapods \((.+)\)").ok()?;

    let mut in_specs = false;
    for line in content.lines() {
        if line.contains("specs:") {
            in_specs = true;
        }
        if line.trim_matches(' ').is_empty() {
            break;
        }
        if in_specs && let Some(caps) = gem.captures(line) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    None
}

/// Default CocoaPods repos directory: `$HOME/.cocoapods/repos`.
pub fn default_repos_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(COCOAPODS_REPOS_SUBDIR))
}

/// The package-manager operations needed to pre-register a repository.
pub trait RepoRegistry {
    /// Remove any local state left under `alias` by a previous run.
    ///
    /// A missing alias is not an error.
    fn remove_local_alias(&self, alias: &str) -> impl Future<Output = Result<()>> + Send;

    /// The command line [`add_repository`](Self::add_repository) runs, for display.
    fn add_command_line(&self, alias: &str, uri: &str) -> String;

    /// Register `uri` under `alias`. An `Err` means the registration failed.
    fn add_repository(&self, alias: &str, uri: &str) -> impl Future<Output = Result<()>> + Send;
}

/// [`RepoRegistry`] backed by the real `pod` executable.
#[derive(Debug, Clone)]
pub struct PodRepoRegistry {
    invocation: PodInvocation,
    repos_dir: PathBuf,
    working_dir: Option<PathBuf>,
}

impl PodRepoRegistry {
    /// Create a registry that runs `invocation` and cleans up under `repos_dir`.
    pub fn new(invocation: PodInvocation, repos_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation,
            repos_dir: repos_dir.into(),
            working_dir: None,
        }
    }

    /// Run `pod` from this directory (the Podfile's directory, so bundler finds the Gemfile).
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The local directory an alias occupies.
    pub fn alias_dir(&self, alias: &str) -> PathBuf {
        self.repos_dir.join(alias)
    }
}

impl RepoRegistry for PodRepoRegistry {
    async fn remove_local_alias(&self, alias: &str) -> Result<()> {
        let dir = self.alias_dir(alias);

        let metadata = match tokio::fs::symlink_metadata(&dir).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                tracing::warn!("Could not inspect {}: {}", dir.display(), e);
                return Ok(());
            }
        };

        tracing::debug!("Removing previously applied fix at {}", dir.display());
        let removed = if metadata.is_dir() {
            tokio::fs::remove_dir_all(&dir).await
        } else {
            tokio::fs::remove_file(&dir).await
        };

        // Same as `rm -rf`: a failed cleanup does not stop the registration
        if let Err(e) = removed {
            tracing::warn!("Failed to remove {}: {}", dir.display(), e);
        }
        Ok(())
    }

    fn add_command_line(&self, alias: &str, uri: &str) -> String {
        PodCommand::repo_add(self.invocation.clone(), alias, uri).printable()
    }

    async fn add_repository(&self, alias: &str, uri: &str) -> Result<()> {
        let mut cmd = PodCommand::repo_add(self.invocation.clone(), alias, uri)
            .inherit_stdio()
            .with_context(alias);
        if let Some(ref dir) = self.working_dir {
            cmd = cmd.current_dir(dir);
        }

        cmd.execute_success()
            .await
            .with_context(|| format!("pod repo add {alias} {uri}"))
    }
}
