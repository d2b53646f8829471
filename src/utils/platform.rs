//! Platform-specific helpers
//!
//! Home directory lookup, PATH probing and path expansion. The tool targets
//! macOS CI machines, but nothing here is macOS-specific.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pod_source_fix::utils::platform::{get_home_dir, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! let podfile = resolve_path("~/project/Podfile")?;
//! assert!(podfile.starts_with(&home));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::SourceFixError;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the home directory of the current user.
///
/// # Errors
///
/// Returns [`SourceFixError::HomeDirNotFound`] when neither `HOME` nor the
/// platform user database yields a directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| SourceFixError::HomeDirNotFound.into())
}

/// The environment variable that names the home directory on this platform.
#[must_use]
pub const fn home_env_var() -> &'static str {
    if is_windows() { "USERPROFILE" } else { "HOME" }
}

/// Whether `cmd` resolves to an executable (a bare name is looked up on PATH).
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Expand a leading `~` in `path` and make it absolute.
///
/// Relative paths are resolved against the current working directory. `$`
/// is taken literally. The path does not need to exist.
///
/// # Errors
///
/// Fails when the current directory cannot be read.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    std::path::absolute(&expanded)
        .with_context(|| format!("Failed to resolve absolute path for {}", expanded.display()))
}
