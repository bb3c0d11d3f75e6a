//! viewBox repair for degenerate bounding boxes.
//!
//! Both producers sometimes report a zero-height viewBox while still
//! drawing visible content. When the declared height is degenerate,
//! recompute a usable box: from a documented aspect ratio for charts, from
//! scanned content bounds for notation. Fragments with a positive declared
//! height, or that give no evidence to work with, are returned unchanged; a
//! wrong-but-unmodified box beats a fabricated guess.

use crate::RepairPolicy;
use crate::bounds;
use crate::consts;

/// Parses the four viewBox components, yielding `None` unless every one is
/// a finite float. Malformed numeric fields therefore cause a pass-through
/// rather than NaN arithmetic reaching the output.
fn parse_viewbox(value: &str) -> Option<[f64; 4]> {
    let mut parts = value.split([' ', ',', '\t']).filter(|p| !p.is_empty());
    let mut out = [0.0f64; 4];
    for slot in &mut out {
        *slot = parts.next()?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(out),
    }
}

/// Writes coordinates the way the producers do: integral values without a
/// trailing `.0`, everything else as the shortest float representation.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e12 { format!("{}", v as i64) } else { format!("{v}") }
}

fn fmt_viewbox(vb: [f64; 4]) -> String {
    format!(r#"viewBox="{} {} {} {}""#, fmt_num(vb[0]), fmt_num(vb[1]), fmt_num(vb[2]), fmt_num(vb[3]))
}

/// Rewrites one opening tag, synthesizing a height for a degenerate box.
/// Anything unparseable or already usable comes back unchanged.
fn repair_open_tag(tag: &str, policy: &RepairPolicy) -> String {
    let Some(caps) = consts::VIEWBOX_REGEX.captures(tag) else {
        return tag.to_string();
    };
    let Some(attr) = caps.get(0) else {
        return tag.to_string();
    };
    let Some([x, y, w, h]) = parse_viewbox(&caps[1]) else {
        return tag.to_string();
    };
    if h > 0.0 {
        return tag.to_string();
    }
    // Negative or zero height; synthesized from the width at the documented
    // chart aspect ratio. Negative widths are written back verbatim.
    let repaired = fmt_viewbox([x, y, w, w * policy.fallback_aspect]);
    tracing::debug!(before = %attr.as_str(), after = %repaired, "synthesized height for degenerate viewBox");
    let mut out = String::with_capacity(tag.len() + repaired.len());
    out.push_str(&tag[..attr.start()]);
    out.push_str(&repaired);
    out.push_str(&tag[attr.end()..]);
    out
}

/// Ensures every `<svg>` opening tag in `svg` carries a displayable
/// viewBox, synthesizing `height = width * fallback_aspect` where the
/// declared height is zero or negative.
///
/// Works on a single fragment and on containers holding several fragments
/// alike: each opening tag is matched non-greedily and repaired on its own,
/// so one sibling's problems never block the others. Fragments with no
/// viewBox, with an unparseable viewBox, or with a positive height are
/// passed through byte-identical. Total over `&str`; never fails.
pub fn repair_viewbox(svg: &str, policy: &RepairPolicy) -> String {
    consts::SVG_OPEN_REGEX
        .replace_all(svg, |caps: &regex::Captures<'_>| repair_open_tag(&caps[0], policy))
        .into_owned()
}

/// Crops a notation fragment to its estimated content bounds.
///
/// Follows the same gate as [`repair_viewbox`] (a missing, unparseable, or
/// positive-height viewBox is left alone) but instead of synthesizing a
/// ratio, scans the fragment for positional hints (see
/// [`crate::ContentBounds`]). On an estimate, the viewBox becomes the
/// content rectangle padded by [`RepairPolicy::padding`] on every side, the
/// `width` attribute is made responsive (`100%`) and `height` is set to the
/// padded content height. With no estimate the fragment is returned
/// unchanged: in this path absence of evidence means no rewrite at all.
pub fn crop_to_content(svg: &str, policy: &RepairPolicy) -> String {
    let Some(caps) = consts::VIEWBOX_REGEX.captures(svg) else {
        return svg.to_string();
    };
    let Some(attr) = caps.get(0) else {
        return svg.to_string();
    };
    let Some([_, _, _, h]) = parse_viewbox(&caps[1]) else {
        return svg.to_string();
    };
    if h > 0.0 {
        return svg.to_string();
    }
    let Some(b) = bounds::estimate(svg, policy) else {
        tracing::debug!("degenerate viewBox but no positional hints; leaving fragment unchanged");
        return svg.to_string();
    };
    let pad = policy.padding;
    let content_h = b.height() + 2.0 * pad;
    let repaired = fmt_viewbox([b.min_x - pad, b.min_y - pad, b.width() + 2.0 * pad, content_h]);
    tracing::debug!(bounds = ?b, after = %repaired, "cropped viewBox to estimated content bounds");
    let mut out = String::with_capacity(svg.len() + 32);
    out.push_str(&svg[..attr.start()]);
    out.push_str(&repaired);
    out.push_str(&svg[attr.end()..]);
    set_dimensions(&out, &fmt_num(content_h))
}

/// Rewrites (or inserts) the `width`/`height` attributes on the first
/// opening `<svg>` tag so the cropped fragment fills its container.
fn set_dimensions(svg: &str, height: &str) -> String {
    let Some(tag) = consts::SVG_OPEN_REGEX.find(svg) else {
        return svg.to_string();
    };
    let mut open = svg[tag.range()].to_string();
    let width_attr = r#" width="100%""#.to_string();
    let height_attr = format!(r#" height="{height}""#);
    open = match consts::WIDTH_ATTR_REGEX.find(&open) {
        Some(_) => consts::WIDTH_ATTR_REGEX.replace(&open, width_attr.as_str()).into_owned(),
        None => insert_before_close(&open, &width_attr),
    };
    open = match consts::HEIGHT_ATTR_REGEX.find(&open) {
        Some(_) => consts::HEIGHT_ATTR_REGEX.replace(&open, height_attr.as_str()).into_owned(),
        None => insert_before_close(&open, &height_attr),
    };
    let mut out = String::with_capacity(svg.len() + 24);
    out.push_str(&svg[..tag.start()]);
    out.push_str(&open);
    out.push_str(&svg[tag.end()..]);
    out
}

fn insert_before_close(open_tag: &str, attr: &str) -> String {
    let at = open_tag.rfind("/>").or_else(|| open_tag.rfind('>')).unwrap_or(open_tag.len());
    let mut out = open_tag.to_string();
    out.insert_str(at, attr);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn policy() -> RepairPolicy {
        RepairPolicy::default()
    }

    #[test]
    fn fragment_without_viewbox_is_byte_identical() {
        let svg = r#"<svg width="10" height="20"><rect x="0" y="0"/></svg>"#;
        assert_eq!(repair_viewbox(svg, &policy()), svg);
        assert_eq!(crop_to_content(svg, &policy()), svg);
    }

    #[test]
    fn positive_height_is_never_rewritten() {
        let svg = r#"<svg viewBox="0 0 300 150"></svg>"#;
        assert_eq!(repair_viewbox(svg, &policy()), svg);
        assert_eq!(crop_to_content(svg, &policy()), svg);
    }

    #[test]
    fn zero_height_synthesizes_documented_aspect() {
        let svg = r#"<svg viewBox="0 0 300 0"></svg>"#;
        let fixed = repair_viewbox(svg, &policy());
        assert_eq!(fixed, r#"<svg viewBox="0 0 300 360"></svg>"#);
    }

    #[test]
    fn repair_is_idempotent() {
        let svg = r#"<svg viewBox="0 0 300 0"></svg>"#;
        let once = repair_viewbox(svg, &policy());
        assert_eq!(repair_viewbox(&once, &policy()), once);
    }

    #[test]
    fn batch_siblings_are_repaired_independently() {
        let svg = concat!(
            r#"<div><svg viewBox="0 0 200 0"><rect/></svg>"#,
            r#"<svg viewBox="0 0 100 40"><rect/></svg></div>"#,
        );
        let fixed = repair_viewbox(svg, &policy());
        assert!(fixed.contains(r#"viewBox="0 0 200 240""#));
        assert!(fixed.contains(r#"viewBox="0 0 100 40""#));
    }

    #[rstest]
    #[case(r#"<svg viewBox="0 0 banana 0"></svg>"#)]
    #[case(r#"<svg viewBox="0 0 300"></svg>"#)]
    #[case(r#"<svg viewBox="0 0 300 0 7"></svg>"#)]
    #[case(r#"<svg viewBox=""></svg>"#)]
    fn malformed_components_pass_through(#[case] svg: &str) {
        assert_eq!(repair_viewbox(svg, &policy()), svg);
        assert_eq!(crop_to_content(svg, &policy()), svg);
    }

    #[test]
    fn negative_width_arithmetic_is_written_verbatim() {
        // Not clamped; the synthesized height just goes negative with it.
        let svg = r#"<svg viewBox="0 0 -100 0"></svg>"#;
        assert_eq!(repair_viewbox(svg, &policy()), r#"<svg viewBox="0 0 -100 -120"></svg>"#);
    }

    #[test]
    fn crop_uses_content_bounds_and_padding() {
        let svg = concat!(
            r#"<svg viewBox="0 0 500 0" width="500pt" height="0pt">"#,
            r#"<g transform="translate(10,20)"><line x1="0" y1="0" x2="150" y2="4"/></g></svg>"#,
        );
        let cropped = crop_to_content(svg, &policy());
        let caps = consts::VIEWBOX_REGEX.captures(&cropped).unwrap();
        let [x, y, w, h] = parse_viewbox(&caps[1]).unwrap();
        // Padded box strictly contains the drawn extent (x up to 150, the
        // translate origin, and the line endpoints).
        assert!(x < 0.0 && x <= 10.0 - policy().padding);
        assert!(y < 0.0);
        assert!(x + w > 150.0);
        assert!(y + h > 20.0);
        assert!(cropped.contains(r#"width="100%""#));
        assert!(cropped.contains(&format!(r#"height="{}""#, super::fmt_num(h))));
    }

    #[test]
    fn crop_without_hints_leaves_fragment_unchanged() {
        // No ratio synthesis in the notation path: no evidence, no rewrite.
        let svg = r#"<svg viewBox="0 0 500 0"><path d="M0 0L9 9"/></svg>"#;
        assert_eq!(crop_to_content(svg, &policy()), svg);
    }

    #[test]
    fn crop_is_idempotent() {
        let svg = concat!(
            r#"<svg viewBox="0 0 500 0">"#,
            r#"<g transform="translate(10,20)"><line x1="0" y1="0" x2="150" y2="4"/></g></svg>"#,
        );
        let once = crop_to_content(svg, &policy());
        assert_eq!(crop_to_content(&once, &policy()), once);
    }

    #[test]
    fn crop_inserts_dimensions_when_absent() {
        let svg = r#"<svg viewBox="0 0 500 0"><rect x="1" y="2" width="3" height="4"/></svg>"#;
        let cropped = crop_to_content(svg, &policy());
        assert!(cropped.contains(r#"width="100%""#));
        assert!(cropped.contains("height=\""));
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(360.0, "360")]
    #[case(-120.0, "-120")]
    #[case(12.5, "12.5")]
    fn number_formatting_matches_producer_style(#[case] v: f64, #[case] expected: &str) {
        assert_eq!(fmt_num(v), expected);
    }
}
