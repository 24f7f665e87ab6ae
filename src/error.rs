//! Error types for Kitbag operations.
//!
//! This module defines [`KitbagError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `KitbagError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `KitbagError::Other`) for unexpected errors
//! - Every failure is terminal for the run: there are no retries anywhere,
//!   and the documented recovery path is to fix the condition and re-run

use thiserror::Error;

/// Core error type for Kitbag operations.
#[derive(Debug, Error)]
pub enum KitbagError {
    /// No known package manager was found for this host.
    #[error("Unsupported platform: {message}")]
    UnsupportedPlatform { message: String },

    /// An external command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An essential binary was not resolvable on PATH after installation.
    #[error("'{binary}' not found on PATH after install")]
    MissingBinary { binary: String },

    /// The SSH connectivity probe did not observe the success marker.
    #[error("Deploy-key connectivity test failed: {message}")]
    ConnectivityFailed { message: String },

    /// Cloning the dotfiles repository failed.
    #[error("Clone failed: {message}")]
    CloneFailed { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Kitbag operations.
pub type Result<T> = std::result::Result<T, KitbagError>;
