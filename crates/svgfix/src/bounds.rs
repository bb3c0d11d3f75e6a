//! Heuristic content-bounds estimation.
//!
//! Scans a fragment for superficial positional hints and folds them into a
//! rectangle. This is an approximation by design: the goal is a usable
//! viewBox when the producer reported a degenerate one, not exact geometry.

use crate::RepairPolicy;
use crate::consts;

/// The inferred rectangle actually covered by drawn elements, as opposed to
/// the declared viewBox. A lower/upper bound, not an exact extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ContentBounds {
    fn point(x: f64, y: f64) -> Self {
        Self { min_x: x, max_x: x, min_y: y, max_y: y }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

fn parse(m: Option<regex::Match<'_>>) -> Option<f64> {
    m.and_then(|m| m.as_str().parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// Estimates the region occupied by drawn content from whatever positional
/// breadcrumbs exist in the markup: `translate(…)` offsets, `<line>`
/// endpoints, `<rect>` position and extent, and the origins of path-bearing
/// translated groups (widened by [`RepairPolicy::group_width_hint`]).
///
/// Returns `None` when not a single hint was found; the caller must then
/// leave the original viewBox untouched; absence of evidence means no safe
/// rewrite.
pub(crate) fn estimate(svg: &str, policy: &RepairPolicy) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;
    let mut fold = |x: f64, y: f64| match bounds {
        Some(ref mut b) => b.include(x, y),
        None => bounds = Some(ContentBounds::point(x, y)),
    };

    for caps in consts::TRANSLATE_REGEX.captures_iter(svg) {
        if let Some(x) = parse(caps.get(1)) {
            let y = parse(caps.get(2)).unwrap_or(0.0);
            fold(x, y);
        }
    }

    for tag in consts::LINE_TAG_REGEX.find_iter(svg) {
        let tag = tag.as_str();
        let attr = |re: &regex::Regex| parse(re.captures(tag).and_then(|c| c.get(1)));
        if let (Some(x1), Some(y1)) = (attr(&consts::X1_ATTR_REGEX), attr(&consts::Y1_ATTR_REGEX)) {
            fold(x1, y1);
        }
        if let (Some(x2), Some(y2)) = (attr(&consts::X2_ATTR_REGEX), attr(&consts::Y2_ATTR_REGEX)) {
            fold(x2, y2);
        }
    }

    for tag in consts::RECT_TAG_REGEX.find_iter(svg) {
        let tag = tag.as_str();
        let attr = |re: &regex::Regex| parse(re.captures(tag).and_then(|c| c.get(1)));
        if let (Some(x), Some(y)) = (attr(&consts::X_ATTR_REGEX), attr(&consts::Y_ATTR_REGEX)) {
            fold(x, y);
            if let (Some(w), Some(h)) = (attr(&consts::W_ATTR_REGEX), attr(&consts::H_ATTR_REGEX)) {
                fold(x + w, y + h);
            }
        }
    }

    for caps in consts::PATH_GROUP_REGEX.captures_iter(svg) {
        if let Some(x) = parse(caps.get(1)) {
            let y = parse(caps.get(2)).unwrap_or(0.0);
            fold(x, y);
            fold(x + policy.group_width_hint, y);
        }
    }

    bounds
}
