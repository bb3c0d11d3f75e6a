//! Chord Normalization Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the rest of the workspace.

use derive_more::{Display, Error};

/// A normalization error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what is wrong with the user's chord block, phrased for the
/// inline error node the pipeline renders in place of the diagram.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The block payload is not valid JSON for the chord schema.
    #[display("invalid chord description: {_0}")]
    Json(#[error(not(source))] String),
    /// The block parsed but described no chords at all.
    #[display("chord block is empty")]
    Empty,
    /// A finger or barre referenced a string outside the instrument.
    #[display("string {string} is out of range (instrument has {strings})")]
    StringOutOfRange { string: u8, strings: u8 },
    /// A fret number falls outside the displayed window.
    #[display("fret {fret} does not fit the {frets}-fret window starting at {position}")]
    FretOutOfRange { fret: u8, frets: u8, position: u8 },
    /// A barre's string span is inverted or degenerate.
    #[display("barre must span from a higher string number down to a lower one")]
    BarreSpan,
    /// The tuning list does not match the number of strings.
    #[display("tuning lists {listed} notes for {strings} strings")]
    TuningMismatch { listed: usize, strings: u8 },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The chord description is either valid or it is not.
        false
    }
}
