//! Pipeline Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the rest of the workspace.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Per-block failures never appear here; they become inline error nodes or
/// logged fallbacks. These are the document-level failures only.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The transformed event stream could not be re-serialized to markdown.
    #[display("failed to re-serialize transformed document")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
