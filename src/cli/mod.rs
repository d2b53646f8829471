//! Command-line interface for pod-source-fix.
//!
//! ```bash
//! # Pre-register SSH sources of a Podfile, then run the real install
//! pod-source-fix -f ios/Podfile && (cd ios && pod install)
//!
//! # Use a specific CocoaPods and an isolated repos directory
//! pod-source-fix --podfile Podfile --pod-bin /opt/cocoapods/bin/pod --repos-dir /tmp/cp-repos
//! ```
//!
//! # Options
//!
//! | Flag | Effect |
//! |------|--------|
//! | `-f, --podfile <PATH>` | Podfile to scan (required) |
//! | `-v, --verbose` | Debug logging |
//! | `-q, --quiet` | Only errors |
//! | `--pod-bin <PATH>` | `pod` executable (`POD_SOURCE_FIX_POD`) |
//! | `--repos-dir <DIR>` | CocoaPods repos directory (`CP_REPOS_DIR`) |
//!
//! A missing `--podfile`, or `-f` without a value, exits with status 1 before
//! any file is touched.

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::{LEGACY_SPECS_REPO_URL, POD_VERSION_TIMEOUT};
use crate::core::SourceFixError;
use crate::fixer::{FixReport, SourceFixer};
use crate::pod::{PodCommand, PodInvocation, PodRepoRegistry, default_repos_dir};
use crate::utils::platform::resolve_path;

/// Exit status for a command line clap rejected or answered itself.
///
/// `--help` and `--version` succeed; every usage error, including `-f`
/// without a value, exits with 1 like a missing `--podfile`.
#[must_use]
pub fn usage_exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one without parsing
/// arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the tracing filter; `None` disables logging.
    ///
    /// `RUST_LOG` takes precedence over the default `info` level but not over
    /// an explicit `--verbose`.
    pub log_level: Option<String>,

    /// Whether `--verbose` was requested.
    pub verbose: bool,

    /// Suppress the stdout transcript.
    pub quiet: bool,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Safe to call more than once; later calls are ignored.
    pub fn init_logging(&self) {
        let Some(ref level) = self.log_level else {
            return;
        };

        let filter = if !self.verbose && std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(self.verbose)
            .try_init();
    }
}

/// Pre-register SSH-sourced CocoaPods spec repositories.
#[derive(Parser, Debug)]
#[command(
    name = "pod-source-fix",
    about = "Pre-register SSH-sourced CocoaPods spec repositories before pod install",
    version,
    long_about = "Scans a Podfile for `source` declarations and registers every repository whose URI \
                  uses the ssh scheme, or is not a valid URI (e.g. git@host:org/Specs.git), with \
                  `pod repo add SourceFix-<n> <uri>` so that `pod install` can use it."
)]
pub struct Cli {
    /// Input Podfile path
    #[arg(short = 'f', long = "podfile", value_name = "PODFILE_PATH")]
    podfile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// The pod executable used for `pod repo add` (default: `pod`, or
    /// `bundle exec pod` when Gemfile.lock pins cocoapods)
    #[arg(long, env = "POD_SOURCE_FIX_POD", value_name = "PATH")]
    pod_bin: Option<String>,

    /// CocoaPods repos directory where stale aliases are removed
    /// (default: ~/.cocoapods/repos)
    #[arg(long, env = "CP_REPOS_DIR", value_name = "DIR")]
    repos_dir: Option<String>,
}

impl Cli {
    /// Execute with configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the flags into a [`CliConfig`].
    ///
    /// - `--verbose`: `debug`
    /// - `--quiet`: logging disabled
    /// - default: `info`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// - [`SourceFixError::PodfileMissing`] when `--podfile` was not given
    ///   (the usage is printed first)
    /// - any error from the fix pass, see [`SourceFixer::run`]
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let Some(ref podfile) = self.podfile else {
            println!("[!] podfile path is missing");
            println!("{}", Self::command().render_help());
            return Err(SourceFixError::PodfileMissing.into());
        };

        let podfile_path = resolve_path(podfile)
            .with_context(|| format!("Failed to resolve Podfile path: {podfile}"))?;
        let podfile_dir = podfile_path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("Invalid Podfile path: {}", podfile_path.display()))?;

        let invocation = PodInvocation::detect(&podfile_dir, self.pod_bin.as_deref());
        let repos_dir = match self.repos_dir {
            Some(ref dir) => resolve_path(dir)
                .with_context(|| format!("Failed to resolve repos directory: {dir}"))?,
            None => default_repos_dir()?,
        };

        let say = |line: String| {
            if !config.quiet {
                println!("{line}");
            }
        };

        say("--- Config:".to_string());
        say(format!("  podfile_path: {podfile}"));
        say(format!("  pod_command: {invocation}"));
        say(format!("  repos_dir: {}", repos_dir.display()));
        say("-----------".to_string());

        if !invocation.is_available() {
            tracing::warn!(
                "'{}' was not found in PATH; registering repositories will fail",
                invocation.program()
            );
        } else if config.verbose {
            log_pod_version(&invocation, &podfile_dir).await;
        }

        say(String::new());
        say(format!("{} {podfile}", "-> Fixing sources in".bold()));
        say(String::new());
        say(format!(" (i) podfile_abs_path: {}", podfile_path.display()));

        let registry = PodRepoRegistry::new(invocation, repos_dir).with_working_dir(&podfile_dir);
        let report = SourceFixer::new(registry).quiet(config.quiet).run(&podfile_path).await?;

        if !config.quiet {
            print_summary(&report);
        }

        Ok(())
    }
}

async fn log_pod_version(invocation: &PodInvocation, podfile_dir: &std::path::Path) {
    let version = PodCommand::version(invocation.clone())
        .current_dir(podfile_dir)
        .with_timeout(Some(POD_VERSION_TIMEOUT))
        .execute()
        .await;
    match version {
        Ok(output) => tracing::debug!("CocoaPods version: {}", output.stdout.trim()),
        Err(e) => tracing::debug!("Could not determine CocoaPods version: {:#}", e),
    }
}

fn print_summary(report: &FixReport) {
    println!();
    if report.fixes.is_empty() {
        println!(" (i) No source needed a fix ({} declarations scanned)", report.declarations);
    } else {
        for fix in &report.fixes {
            println!(" {} {} -> {} (line {})", "✓".green(), fix.alias, fix.uri, fix.line_number);
        }
    }

    if report.uses_legacy_specs_repo {
        println!();
        println!("{}", "### CocoaPods tip".yellow());
        println!(
            "Your Podfile is still using the Specs repo ({LEGACY_SPECS_REPO_URL}). \
             Switch to the CDN source (source 'https://cdn.cocoapods.org/') for faster \
             and more reliable dependency installs!"
        );
    }

    println!();
    println!("{}", "-> Finished with source fixes.".green().bold());
}
