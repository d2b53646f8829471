//! Cross-platform utilities
//!
//! - [`platform`] - home directory, PATH lookup and path expansion

pub mod platform;

pub use platform::{command_exists, get_home_dir, resolve_path};
