//! Result type alias shared across the workspace.
//!
//! Defaults the error type to the common `PulseError`, so functions can simply
//! return `Result<T>`.
use crate::error::PulseError;

/// Workspace-wide `Result` alias with `PulseError` as the default error.
pub type Result<T, E = PulseError> = std::result::Result<T, E>;
