//! Chord-description validation and normalization.
//!
//! Fenced `chord` blocks carry a small JSON schema describing finger
//! positions, barres and styling. This crate turns that author-friendly
//! shape into the strict canonical payload the browser-hosted chart script
//! consumes, rejecting out-of-range strings and frets with errors phrased
//! for the inline error node the pipeline renders on failure.

pub mod error;
mod model;
mod normalize;

pub use crate::model::{Barre, Chord, ChordDef, ChordInput, ChordSheet, Finger, SheetStyle, StyleOverrides};
pub use crate::normalize::normalize;
