//! Block transform drivers over the markdown event stream.
//!
//! Consumes a pre-built AST (pulldown-cmark events) rather than parsing
//! markdown itself: candidate fenced blocks are located, dispatched to the
//! external renderer adapters, post-processed by `segno-svgfix` and spliced
//! back in, with failures surfacing per block as inline error nodes or
//! preserved fences.

mod driver;
pub mod error;
mod report;

pub use crate::driver::{
    BlockKind, ChordBackend, FailurePolicy, FencedBlock, NotationBackend, Renderers, TransformOptions,
    find_blocks, transform,
};
pub use crate::report::error_node;
