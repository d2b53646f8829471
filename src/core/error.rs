//! Error handling for pod-source-fix
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`SourceFixError`]) for the failure modes the
//!    rest of the crate needs to recognize
//! 2. **User-friendly messages** ([`ErrorContext`]) with a suggestion and
//!    details for the terminal
//!
//! Application code returns [`anyhow::Result`] and attaches context with
//! [`anyhow::Context`]. At the top of the binary the error is converted with
//! [`user_friendly_error`], which downcasts to [`SourceFixError`] when it can.
//!
//! URI parse failures are not errors here: they are classified as
//! [`UriClass::Unparseable`](crate::source::UriClass::Unparseable) and routed
//! into the fix path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pod_source_fix::core::{SourceFixError, user_friendly_error};
//!
//! let error = SourceFixError::RepoAddFailed {
//!     uri: "git@github.com:org/PrivateSpecs.git".to_string(),
//!     alias: "SourceFix-1".to_string(),
//!     reason: "exit status 1".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pod-source-fix operations
///
/// # Error Categories
///
/// ## Configuration
/// - [`PodfileMissing`] - `--podfile` was not given
/// - [`HomeDirNotFound`] - the local repository root cannot be derived
///
/// ## Podfile access
/// - [`PodfileNotFound`] - the Podfile does not exist
/// - [`PodfileReadError`] - the Podfile exists but cannot be read
///
/// ## CocoaPods invocation
/// - [`PodNotFound`] - the `pod` executable is not on PATH
/// - [`PodCommandError`] - a `pod` command exited with a non-zero status
/// - [`PodCommandTimeout`] - a `pod` command did not finish in time
/// - [`RepoAddFailed`] - registering a spec repository failed; fatal for the run
///
/// [`PodfileMissing`]: SourceFixError::PodfileMissing
/// [`HomeDirNotFound`]: SourceFixError::HomeDirNotFound
/// [`PodfileNotFound`]: SourceFixError::PodfileNotFound
/// [`PodfileReadError`]: SourceFixError::PodfileReadError
/// [`PodNotFound`]: SourceFixError::PodNotFound
/// [`PodCommandError`]: SourceFixError::PodCommandError
/// [`PodCommandTimeout`]: SourceFixError::PodCommandTimeout
/// [`RepoAddFailed`]: SourceFixError::RepoAddFailed
#[derive(Error, Debug, Clone)]
pub enum SourceFixError {
    /// No Podfile path was supplied on the command line
    #[error("podfile path is missing")]
    PodfileMissing,

    /// The Podfile does not exist at the resolved path
    #[error("Podfile not found: {path}")]
    PodfileNotFound {
        /// The absolute path that was checked
        path: String,
    },

    /// The Podfile could not be opened or a line could not be read
    #[error("Failed to read Podfile {path}: {reason}")]
    PodfileReadError {
        /// The absolute path of the Podfile
        path: String,
        /// The underlying I/O error message
        reason: String,
    },

    /// The CocoaPods executable could not be located
    #[error("CocoaPods is not installed or '{command}' was not found in PATH")]
    PodNotFound {
        /// The program that was looked up
        command: String,
    },

    /// A `pod` invocation returned a non-zero exit status
    #[error("pod operation failed: {operation}")]
    PodCommandError {
        /// The pod operation that failed (e.g. "repo add")
        operation: String,
        /// The error output of the command
        stderr: String,
    },

    /// A `pod` invocation exceeded its timeout
    #[error("pod operation timed out after {seconds}s: {operation}")]
    PodCommandTimeout {
        /// The pod operation that timed out
        operation: String,
        /// The timeout that elapsed
        seconds: u64,
    },

    /// Registering a spec repository failed
    ///
    /// This aborts the whole run: `pod install` cannot succeed without the
    /// repository, and no later Podfile line is examined.
    #[error("Failed to add pod spec repo: {uri}")]
    RepoAddFailed {
        /// The repository URI from the Podfile
        uri: String,
        /// The alias the repository was being registered under
        alias: String,
        /// Why the registration failed
        reason: String,
    },

    /// The home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    /// Anything else
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

/// User-friendly wrapper around a [`SourceFixError`]
///
/// Suggestions are actionable steps and render in green; details explain the
/// failure and render in yellow.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SourceFixError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details
    #[must_use]
    pub const fn new(error: SourceFixError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Recognizes [`SourceFixError`] anywhere in the chain and [`std::io::Error`]
/// kinds; everything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(fix_error) = error.chain().find_map(|e| e.downcast_ref::<SourceFixError>()) {
        return create_error_context(fix_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(SourceFixError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the file ownership and permissions of the Podfile and the CocoaPods repos directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(SourceFixError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(SourceFixError::Other {
        message,
    })
}

fn create_error_context(error: SourceFixError) -> ErrorContext {
    match &error {
        SourceFixError::PodfileMissing => ErrorContext::new(error)
            .with_suggestion("Pass the Podfile to scan with -f/--podfile, e.g. 'pod-source-fix -f ./Podfile'"),

        SourceFixError::PodfileNotFound { path } => {
            let suggestion = format!("Check that a Podfile exists at {path}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        SourceFixError::PodfileReadError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the Podfile permissions and that it is a readable text file"),

        SourceFixError::PodNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Install CocoaPods ('gem install cocoapods') or point --pod-bin at the pod executable")
            .with_details("Spec repositories are registered with 'pod repo add'"),

        SourceFixError::PodCommandError { stderr, .. } => {
            let details = if stderr.trim().is_empty() {
                "The pod command produced no error output".to_string()
            } else {
                stderr.trim().to_string()
            };
            ErrorContext::new(error)
                .with_suggestion("Run the pod command manually with --verbose for more details")
                .with_details(details)
        }

        SourceFixError::PodCommandTimeout { .. } => ErrorContext::new(error)
            .with_suggestion("Check network connectivity and that no credential prompt is waiting for input")
            .with_details("CocoaPods clones the spec repository while adding it"),

        SourceFixError::RepoAddFailed { alias, reason, .. } => {
            let details = format!("Registering as '{alias}' failed: {reason}");
            ErrorContext::new(error)
                .with_suggestion("Check that the SSH key for this repository is loaded and the host is in known_hosts")
                .with_details(details)
        }

        SourceFixError::HomeDirNotFound => ErrorContext::new(error).with_suggestion(format!(
            "Set the {} environment variable or pass --repos-dir",
            crate::utils::platform::home_env_var()
        )),

        SourceFixError::Other { .. } => ErrorContext::new(error),
    }
}
