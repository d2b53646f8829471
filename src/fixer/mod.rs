//! The source fix pass
//!
//! [`SourceFixer::run`] walks the Podfile's source declarations in file order,
//! classifies each URI and pre-registers every repository that needs it under
//! `SourceFix-<n>`:
//!
//! ```text
//! source 'https://cdn.cocoapods.org/'          -> no fix
//! source 'git@github.com:org/Private.git'      -> SourceFix-1
//! source 'ssh://git@host/org/Other.git'        -> SourceFix-2
//! ```
//!
//! The fix counter is local to one run and only advances when a fix is
//! applied, so aliases start at 1 and have no gaps. The first failed
//! registration ends the run; later lines are never read.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::constants::ALIAS_PREFIX;
use crate::core::SourceFixError;
use crate::pod::RepoRegistry;
use crate::podfile::{PodfileScanner, SourceDeclaration, is_legacy_specs_repo};
use crate::source::{UriClass, classify};

/// Alias for the `n`-th fix of a run (1-based).
#[must_use]
pub fn alias_for(n: usize) -> String {
    format!("{ALIAS_PREFIX}-{n}")
}

/// A repository registered during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    /// Alias the repository was registered under
    pub alias: String,
    /// Repository URI from the Podfile
    pub uri: String,
    /// Podfile line of the declaration
    pub line_number: usize,
    /// Why the fix was needed
    pub class: UriClass,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Fixes in the order they were applied
    pub fixes: Vec<AppliedFix>,
    /// Number of source declarations seen
    pub declarations: usize,
    /// Declarations left to `pod install`
    pub skipped: usize,
    /// Whether the legacy master spec repository was declared
    pub uses_legacy_specs_repo: bool,
}

/// Runs the fix pass against a [`RepoRegistry`].
pub struct SourceFixer<R> {
    registry: R,
    quiet: bool,
}

impl<R: RepoRegistry> SourceFixer<R> {
    /// Create a fixer that registers repositories through `registry`.
    pub const fn new(registry: R) -> Self {
        Self {
            registry,
            quiet: false,
        }
    }

    /// Suppress the stdout transcript.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The registry this fixer uses.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Scan `podfile` and register every source that needs a fix.
    ///
    /// # Errors
    ///
    /// - [`SourceFixError::PodfileNotFound`] / [`SourceFixError::PodfileReadError`]
    ///   when the Podfile cannot be read
    /// - [`SourceFixError::RepoAddFailed`] on the first failed registration
    pub async fn run(&self, podfile: &Path) -> Result<FixReport> {
        let mut report = FixReport::default();
        let mut fix_counter = 0usize;

        for declaration in PodfileScanner::open(podfile)? {
            let declaration = declaration?;
            report.declarations += 1;

            self.say(format!("source: {:?}", declaration.tokens));
            self.say(format!("expected_uri_part: {}", declaration.uri));

            if is_legacy_specs_repo(&declaration.uri) {
                report.uses_legacy_specs_repo = true;
            }

            let class = classify(&declaration.uri);
            match &class {
                UriClass::Unparseable { reason } => {
                    tracing::debug!("Line {}: {}", declaration.line_number, reason);
                    self.say(format!(" (i) URI could not be detected, applying fix. Reason: {reason}"));
                }
                UriClass::Parsed { .. } if !class.needs_fix() => {
                    report.skipped += 1;
                    self.say(format!(
                        " {} uri ({}) should be handled by pod install, no fix required.",
                        "* [no-fix]".cyan(),
                        declaration.uri
                    ));
                    continue;
                }
                UriClass::Parsed { .. } => {}
            }

            fix_counter += 1;
            let fix = self.apply_fix(fix_counter, declaration, class).await?;
            report.fixes.push(fix);
        }

        tracing::debug!(
            "Scanned {} source declarations, applied {} fixes",
            report.declarations,
            report.fixes.len()
        );
        Ok(report)
    }

    async fn apply_fix(
        &self,
        fix_number: usize,
        declaration: SourceDeclaration,
        class: UriClass,
    ) -> Result<AppliedFix> {
        let alias = alias_for(fix_number);
        let uri = declaration.uri;

        self.say(format!(" {} applying fix for uri ({uri})", "* [fix]".yellow()));

        self.registry.remove_local_alias(&alias).await?;

        self.say(format!(
            " (i) Apply fix command: $ {}",
            self.registry.add_command_line(&alias, &uri)
        ));
        if let Err(e) = self.registry.add_repository(&alias, &uri).await {
            tracing::error!("Registering {} as {} failed: {:#}", uri, alias, e);
            return Err(SourceFixError::RepoAddFailed {
                uri,
                alias,
                reason: format!("{e:#}"),
            }
            .into());
        }

        tracing::info!("Registered {} as {}", uri, alias);
        Ok(AppliedFix {
            alias,
            uri,
            line_number: declaration.line_number,
            class,
        })
    }

    fn say(&self, line: String) {
        if !self.quiet {
            println!("{line}");
        }
    }
}
