//! Core types for pod-source-fix
//!
//! Currently this is the error layer: [`SourceFixError`] for typed failures,
//! [`ErrorContext`] for the colored terminal rendering, and
//! [`user_friendly_error`] to bridge from [`anyhow::Error`].

pub mod error;

pub use error::{ErrorContext, SourceFixError, user_friendly_error};
