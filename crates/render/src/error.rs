//! Render Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the rest of the workspace.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Each one surfaces per block; none of them abort siblings.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("chromium/chrome not detected on your system")]
    ChromiumNotFound,
    /// The notation compiler executable was not found on PATH.
    #[display("notation compiler not found: {_0}")]
    CompilerNotFound(#[error(not(source))] String),
    /// The external tool did not finish within the configured wait.
    #[display("external renderer timed out")]
    Timeout,
    /// Chromium exited with a non-zero exit code.
    /// A negative code means it was killed by a signal or crashed.
    #[display("chromium exited with code {_0}")]
    BrowserFailed(#[error(not(source))] i32),
    /// The notation compiler rejected the source.
    #[display("notation compiler exited with code {code}: {stderr}")]
    CompilerFailed {
        code: i32,
        /// Trimmed excerpt of the compiler's stderr.
        stderr: String,
    },
    /// The dumped DOM did not contain the chart container element.
    #[display("chart container missing from browser output")]
    ChartContainerMissing,
    /// The compiler finished but produced no SVG document.
    #[display("notation compiler produced no output")]
    NoOutput,
    /// The chord sheet could not be serialized for the harness page.
    Payload,
    /// The embedded harness template failed to compile or render.
    Template,
    /// An embedded asset was not loadable.
    AssetNotFound(#[error(not(source))] String),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // There is deliberately no retry policy: a timeout is surfaced for
        // its block once, never retried automatically.
        false
    }
}
