//! Type-safe CocoaPods command builder
//!
//! Fluent API for building and running `pod` invocations with consistent
//! logging, timeout handling and error mapping.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::PodInvocation;
use crate::core::SourceFixError;

/// Builder for a single `pod` process.
///
/// # Examples
///
/// ```rust,no_run
/// use pod_source_fix::pod::{PodCommand, PodInvocation};
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = PodCommand::version(PodInvocation::default())
///     .with_timeout(Some(std::time::Duration::from_secs(60)))
///     .execute()
///     .await?;
/// println!("CocoaPods {}", output.stdout.trim());
///
/// PodCommand::repo_add(PodInvocation::default(), "SourceFix-1", "git@github.com:org/Specs.git")
///     .inherit_stdio()
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: none, the process runs to completion
/// - **Output capture**: enabled, stdin is closed
/// - **Working directory**: current process directory
pub struct PodCommand {
    /// How `pod` is launched (`pod`, `bundle exec pod`, or a custom binary)
    invocation: PodInvocation,

    /// Arguments after the invocation prefix (e.g. ["repo", "add", ...])
    args: Vec<String>,

    /// Working directory for command execution
    current_dir: Option<std::path::PathBuf>,

    /// Whether to capture command output (true) or inherit stdio (false)
    capture_output: bool,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages
    context: Option<String>,
}

impl PodCommand {
    /// Creates a builder with default settings for the given invocation.
    pub fn new(invocation: PodInvocation) -> Self {
        Self {
            invocation,
            args: Vec::new(),
            current_dir: None,
            capture_output: true,
            timeout_duration: None,
            context: None,
        }
    }

    /// Sets the working directory for the command.
    ///
    /// Under bundler this decides which `Gemfile` is used.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Lets the command write straight to the terminal.
    ///
    /// `pod repo add` clones a repository and may prompt for credentials, so
    /// stdin, stdout and stderr all stay attached to the terminal.
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g. the alias being registered)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The full command line as it would be typed in a shell.
    pub fn printable(&self) -> String {
        let mut parts = vec![self.invocation.program().to_string()];
        parts.extend(self.invocation.prefix_args().iter().cloned());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// The pod operation for error messages: the first two arguments, e.g. "repo add".
    fn operation(&self) -> String {
        match self.args.as_slice() {
            [] => "pod".to_string(),
            [single] => single.clone(),
            [first, second, ..] if !second.starts_with('-') => format!("{first} {second}"),
            [first, ..] => first.clone(),
        }
    }

    /// Execute the command and return its output
    pub async fn execute(self) -> Result<PodCommandOutput> {
        let start = std::time::Instant::now();
        let printable = self.printable();
        let operation = self.operation();

        let mut cmd = Command::new(self.invocation.program());
        cmd.args(self.invocation.prefix_args());
        cmd.args(&self.args);
        cmd.kill_on_drop(true);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        if let Some(ref ctx) = self.context {
            tracing::debug!(target: "pod", "({}) Executing command: {}", ctx, printable);
        } else {
            tracing::debug!(target: "pod", "Executing command: {}", printable);
        }

        if self.capture_output {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output_future = cmd.output();

        let spawned = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "pod",
                        "Command timed out after {} seconds: {}",
                        duration.as_secs(),
                        printable
                    );
                    return Err(SourceFixError::PodCommandTimeout {
                        operation,
                        seconds: duration.as_secs(),
                    }
                    .into());
                }
            }
        } else {
            output_future.await
        };

        let output = match spawned {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceFixError::PodNotFound {
                    command: self.invocation.program().to_string(),
                }
                .into());
            }
            Err(e) => return Err(e).context(format!("Failed to execute {printable}")),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "pod",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "pod", "Error: {}", stderr.trim());
            }

            // CocoaPods prints "[!] ..." diagnostics on stdout
            let stderr = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            return Err(SourceFixError::PodCommandError {
                operation,
                stderr,
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "pod", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "pod", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "pod::perf", "pod {} took {:.2}s", operation, elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "pod::perf", "pod {} took {}ms", operation, elapsed.as_millis());
        }

        Ok(PodCommandOutput { stdout })
    }

    /// Execute the command and only check that it succeeded
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a `pod` command
pub struct PodCommandOutput {
    /// Standard output
    pub stdout: String,
}

impl PodCommand {
    /// `pod repo add <alias> <url>`
    pub fn repo_add(invocation: PodInvocation, alias: &str, url: &str) -> Self {
        Self::new(invocation).args(["repo", "add", alias, url])
    }

    /// `pod --version`
    pub fn version(invocation: PodInvocation) -> Self {
        Self::new(invocation).arg("--version")
    }
}
