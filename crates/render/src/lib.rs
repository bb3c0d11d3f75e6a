//! Adapters for the two external renderers the pipeline delegates to.
//!
//! Nothing in here lays out music or chords itself: the notation compiler
//! executable and the browser-hosted chart script do the drawing, this
//! crate prepares their input, bounds their execution and hands their raw
//! SVG back. Output is returned unrepaired; `segno-svgfix` owns the
//! post-processing.

mod assets;
mod chord;
mod chromium;
pub mod error;
mod notation;

pub use crate::chord::{BrowserConfig, ChordRenderer};
pub use crate::error::{Error, Result};
pub use crate::notation::{NotationConfig, NotationRenderer};
