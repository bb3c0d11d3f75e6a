//! CLI Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the rest of the workspace.

use derive_more::{Display, Error};

/// A top-level error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("failed to load configuration")]
    Config,
    /// A renderer handle could not be acquired (missing executable, broken
    /// embedded asset).
    #[display("failed to initialize renderer")]
    Renderer,
    #[display("document transform failed")]
    Transform,
    /// `segno check` found invalid blocks.
    #[display("document has {_0} invalid block(s)")]
    CheckFailed(#[error(not(source))] usize),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
