//! Post-processing for SVG emitted by the external renderers.
//!
//! Both the notation compiler and the browser-hosted chart script
//! occasionally hand back documents that are not directly usable: the chart
//! script is known to emit a zero-height `viewBox` while still drawing
//! visible content, and the notation compiler surrounds its output with
//! attribution decoration and a bounding box far larger than the engraved
//! music. This crate repairs both, using lightweight pattern matching over
//! the narrow set of productions those two tools emit. It is deliberately
//! not a general SVG toolkit; swapping in a structured document model later
//! would only need to preserve the two public operations.
//!
//! The operations here, [`strip_decoration`] and the viewBox repairs
//! ([`repair_viewbox`] / [`crop_to_content`]), are total functions over
//! `&str`: malformed or attribute-less input is passed through unchanged,
//! never rejected. Absent input is unrepresentable at this API (`&str`
//! cannot be null); callers holding an `Option` must handle `None` before
//! calling in.
//!
//! Everything here is pure, synchronous string transformation. No state is
//! kept between calls, so concurrent use on independent inputs needs no
//! coordination.

mod bounds;
mod consts;
mod strip;
mod viewbox;

pub use crate::bounds::ContentBounds;
pub use crate::strip::strip_decoration;
pub use crate::viewbox::{crop_to_content, repair_viewbox};

/// Tunables for the viewBox repair heuristics.
///
/// These encode the typical output shape of the two renderers this crate was
/// written against, not general geometry. They are configuration, so a
/// different chart script or compiler can be accommodated without touching
/// the algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairPolicy {
    /// Height-to-width ratio used to synthesize a height for a degenerate
    /// chart viewBox. The bundled chart script draws diagrams at roughly
    /// 1.2:1 height to width.
    pub fallback_aspect: f64,
    /// Margin in user units added on every side of an estimated content
    /// rectangle before it becomes the new viewBox.
    pub padding: f64,
    /// Assumed horizontal extent of a path-bearing translated group. The
    /// estimator does not parse path geometry, so a group's origin plus this
    /// hint stands in for its real width.
    pub group_width_hint: f64,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self { fallback_aspect: 1.2, padding: 10.0, group_width_hint: 20.0 }
    }
}

/// Substrings identifying producer-attribution decoration.
///
/// Defaults target the notation compiler's branding: the link back to its
/// website and the engraving tagline it appends below the music.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationMarkers {
    /// Anchors whose `href` contains one of these are removed outright.
    pub link_hosts: Vec<String>,
    /// Text elements whose character data contains one of these are removed.
    pub captions: Vec<String>,
}

impl Default for DecorationMarkers {
    fn default() -> Self {
        Self {
            link_hosts: vec!["lilypond.org".to_string()],
            captions: vec!["Music engraving by LilyPond".to_string()],
        }
    }
}
