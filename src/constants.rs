//! Global constants used throughout pod-source-fix.

use std::time::Duration;

/// Prefix of the aliases under which fixed repositories are registered.
///
/// The full alias is `SourceFix-<n>` with `n` starting at 1 for each run.
pub const ALIAS_PREFIX: &str = "SourceFix";

/// The only URI scheme that is treated as needing a fix when it parses.
pub const SSH_SCHEME: &str = "ssh";

/// Keyword that starts a source declaration in a Podfile (compared case-insensitively).
pub const SOURCE_KEYWORD: &str = "source";

/// Legacy master spec repository; its use triggers a tip to switch to the CDN.
pub const LEGACY_SPECS_REPO_URL: &str = "https://github.com/CocoaPods/Specs.git";

/// Default CocoaPods executable.
pub const DEFAULT_POD_COMMAND: &str = "pod";

/// Directory under the home directory where CocoaPods keeps spec repositories.
pub const COCOAPODS_REPOS_SUBDIR: &str = ".cocoapods/repos";

/// Timeout for the `pod --version` query made with `--verbose`.
///
/// `pod repo add` has no timeout and always runs to completion.
pub const POD_VERSION_TIMEOUT: Duration = Duration::from_secs(60);
