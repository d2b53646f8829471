//! pod-source-fix - pre-register SSH-sourced CocoaPods spec repositories
//!
//! CocoaPods does not set up spec repositories that a Podfile references
//! through SSH (`ssh://...` or SCP-style `git@host:org/Specs.git`) before
//! `pod install` needs them, and the install fails. This crate scans the
//! Podfile and registers each such repository with
//! `pod repo add SourceFix-<n> <uri>` ahead of the install.
//!
//! # Pipeline
//!
//! 1. [`cli`] - option parsing and the stdout transcript
//! 2. [`podfile`] - lazy scan for `source` declarations
//! 3. [`source`] - URI classification (ssh / other / unparseable)
//! 4. [`fixer`] + [`pod`] - stale alias cleanup and `pod repo add`, fail-fast
//!
//! # Supporting Modules
//!
//! - [`core`] - error types and user-friendly error rendering
//! - [`constants`] - alias prefix, timeouts and well-known URLs
//! - [`utils`] - home directory, PATH lookup and path expansion
//!
//! # Example
//!
//! ```rust,no_run
//! use pod_source_fix::fixer::SourceFixer;
//! use pod_source_fix::pod::{PodInvocation, PodRepoRegistry, default_repos_dir};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = PodRepoRegistry::new(PodInvocation::default(), default_repos_dir()?);
//! let report = SourceFixer::new(registry).run(Path::new("/work/app/Podfile")).await?;
//! println!("{} repositories registered", report.fixes.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod fixer;
pub mod pod;
pub mod podfile;
pub mod source;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
