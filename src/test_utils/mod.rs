//! Test utilities for pod-source-fix
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests in `tests/`.
//!
//! - [`init_test_logging`] - one-time tracing setup that honors `RUST_LOG`
//! - [`RecordingRegistry`] - a [`RepoRegistry`] that records calls instead of
//!   running `pod`
//!
//! # Example
//!
//! ```rust,no_run
//! use pod_source_fix::fixer::SourceFixer;
//! use pod_source_fix::test_utils::RecordingRegistry;
//!
//! # async fn example(podfile: &std::path::Path) -> anyhow::Result<()> {
//! let fixer = SourceFixer::new(RecordingRegistry::new()).quiet(true);
//! fixer.run(podfile).await?;
//! for (alias, uri) in fixer.registry().added() {
//!     println!("{alias} -> {uri}");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::pod::RepoRegistry;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither is set.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A call made against a [`RecordingRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `remove_local_alias(alias)`
    Remove(String),
    /// `add_repository(alias, uri)`
    Add(String, String),
}

/// In-memory [`RepoRegistry`] that records every call.
///
/// Registrations succeed unless the URI was passed to
/// [`failing_on`](Self::failing_on).
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    calls: Mutex<Vec<RecordedCall>>,
    failing_uri: Option<String>,
}

impl RecordingRegistry {
    /// A registry where every registration succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry where registering `uri` fails.
    pub fn failing_on(uri: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing_uri: Some(uri.into()),
        }
    }

    /// All calls in the order they were made.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Only the `add_repository` calls as `(alias, uri)` pairs.
    pub fn added(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Add(alias, uri) => Some((alias, uri)),
                RecordedCall::Remove(_) => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl RepoRegistry for RecordingRegistry {
    fn add_command_line(&self, alias: &str, uri: &str) -> String {
        format!("pod repo add {alias} {uri}")
    }

    async fn remove_local_alias(&self, alias: &str) -> Result<()> {
        self.record(RecordedCall::Remove(alias.to_string()));
        Ok(())
    }

    async fn add_repository(&self, alias: &str, uri: &str) -> Result<()> {
        self.record(RecordedCall::Add(alias.to_string(), uri.to_string()));
        if self.failing_uri.as_deref() == Some(uri) {
            anyhow::bail!("pod repo add {alias} {uri} exited with status 1");
        }
        Ok(())
    }
}
