//! Removal of producer-attribution decoration.
//!
//! The notation compiler brands its output: an anchor linking back to its
//! website and a tagline drawn as an ordinary text element. Both sit inside
//! the top-level wrapper group and would otherwise be folded into the
//! content-bounds estimate, dragging the cropped viewBox down to cover them.
//!
//! Removal is done by locating a marker occurrence and then walking outward
//! to the enclosing element's boundaries. A marker substring that happens to
//! occur in unrelated character data (outside an anchor href or a text
//! element) is left alone.

use crate::DecorationMarkers;
use crate::consts;

/// Strips every attribution anchor and caption matching `markers` from the
/// fragment, then collapses wrapper groups the removal left empty.
///
/// Returns the input unchanged when nothing matches; never an error. Total
/// over `&str`.
pub fn strip_decoration(svg: &str, markers: &DecorationMarkers) -> String {
    let mut out = svg.to_string();
    for host in &markers.link_hosts {
        out = remove_anchors_linking_to(&out, host);
    }
    for caption in &markers.captions {
        out = remove_text_containing(&out, caption);
    }
    // Wrapper groups that held only decoration are now empty shells. Nested
    // wrappers empty out one layer per pass.
    loop {
        let collapsed = consts::EMPTY_GROUP_REGEX.replace_all(&out, "").into_owned();
        if collapsed == out {
            break;
        }
        out = collapsed;
    }
    out
}

/// Removes every `<a>…</a>` element whose opening tag mentions `host`.
///
/// The occurrence must fall inside the opening tag itself (i.e. inside an
/// attribute such as `href`); `host` appearing in running text is not enough
/// to delete anything.
fn remove_anchors_linking_to(svg: &str, host: &str) -> String {
    remove_elements_around_marker(svg, host, "<a", "</a>", MarkerSite::OpeningTag)
}

/// Removes every `<text>…</text>` element whose character data contains
/// `caption`. Captions nested in a `<tspan>` are covered because the whole
/// enclosing text element goes.
fn remove_text_containing(svg: &str, caption: &str) -> String {
    remove_elements_around_marker(svg, caption, "<text", "</text>", MarkerSite::CharacterData)
}

#[derive(Clone, Copy, PartialEq)]
enum MarkerSite {
    /// Marker must sit inside the element's opening tag.
    OpeningTag,
    /// Marker must sit between the opening tag's `>` and the closing tag.
    CharacterData,
}

fn remove_elements_around_marker(svg: &str, marker: &str, open: &str, close: &str, site: MarkerSite) -> String {
    if marker.is_empty() {
        return svg.to_string();
    }
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(hit) = rest.find(marker) {
        match enclosing_element(rest, hit, open, close, site) {
            Some((start, end)) => {
                out.push_str(&rest[..start]);
                rest = &rest[end..];
            }
            None => {
                // Marker occurs in unrelated content; keep it and move on.
                let keep = hit + marker.len();
                out.push_str(&rest[..keep]);
                rest = &rest[keep..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Finds the boundaries of the element of kind `open`/`close` enclosing the
/// marker at byte offset `hit`, or `None` when the marker is not actually
/// inside such an element at the required site.
fn enclosing_element(s: &str, hit: usize, open: &str, close: &str, site: MarkerSite) -> Option<(usize, usize)> {
    let start = s[..hit].rfind(open)?;
    // The candidate must really be this tag, not a longer name sharing the
    // prefix (e.g. `<textPath` for `<text`).
    let after = s[start + open.len()..].chars().next()?;
    if !after.is_whitespace() && after != '>' && after != '/' {
        return None;
    }
    let open_end = start + s[start..].find('>')?;
    match site {
        MarkerSite::OpeningTag if hit > open_end => return None,
        MarkerSite::CharacterData if hit <= open_end => return None,
        _ => {}
    }
    // A closing tag between the opening tag and the marker means the marker
    // lives outside this element.
    if site == MarkerSite::CharacterData && s[open_end..hit].contains(close) {
        return None;
    }
    let close_start = s[hit..].find(close)?;
    Some((start, hit + close_start + close.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> DecorationMarkers {
        DecorationMarkers::default()
    }

    const ATTRIBUTION: &str = concat!(
        r#"<a style="color:blue;" xlink:href="https://lilypond.org/">"#,
        r#"<text x="10" y="20">Music engraving by LilyPond 2.24.3</text></a>"#,
    );

    #[test]
    fn no_markers_means_no_change() {
        let svg = r#"<svg><text x="0" y="0">Allegro</text></svg>"#;
        assert_eq!(strip_decoration(svg, &markers()), svg);
    }

    #[test]
    fn attribution_anchor_is_removed() {
        let svg = format!(r#"<svg><g><line x1="0" y1="0" x2="5" y2="5"/></g>{ATTRIBUTION}</svg>"#);
        let stripped = strip_decoration(&svg, &markers());
        assert_eq!(stripped, r#"<svg><g><line x1="0" y1="0" x2="5" y2="5"/></g></svg>"#);
    }

    #[test]
    fn caption_text_without_anchor_is_removed() {
        let svg = r#"<svg><text x="1" y="2"><tspan>Music engraving by LilyPond 2.24.3</tspan></text><rect x="0" y="0" width="4" height="4"/></svg>"#;
        let stripped = strip_decoration(svg, &markers());
        assert_eq!(stripped, r#"<svg><rect x="0" y="0" width="4" height="4"/></svg>"#);
    }

    #[test]
    fn unrelated_text_elements_survive() {
        // Lyrics legitimately mentioning the tool name are character data of
        // a text element, which is exactly what the caption marker targets;
        // the distinction that must hold is that *other* text elements in the
        // same fragment are untouched.
        let svg = format!(r#"<svg><text x="0" y="0">Andante con moto</text>{ATTRIBUTION}<text x="9" y="9">D.C. al fine</text></svg>"#);
        let stripped = strip_decoration(&svg, &markers());
        assert!(stripped.contains("Andante con moto"));
        assert!(stripped.contains("D.C. al fine"));
        assert!(!stripped.contains("lilypond.org"));
        assert!(!stripped.contains("Music engraving"));
    }

    #[test]
    fn host_in_running_text_is_not_a_link() {
        let svg = r#"<svg><text x="0" y="0">see lilypond.org for sources</text></svg>"#;
        let stripped = strip_decoration(svg, &markers());
        assert_eq!(stripped, svg);
    }

    #[test]
    fn wrapper_group_left_empty_is_collapsed() {
        let svg = format!(r#"<svg><g id="footer"> {ATTRIBUTION} </g><rect x="0" y="0" width="1" height="1"/></svg>"#);
        let stripped = strip_decoration(&svg, &markers());
        assert_eq!(stripped, r#"<svg><rect x="0" y="0" width="1" height="1"/></svg>"#);
    }

    #[test]
    fn nested_empty_wrappers_collapse_fully() {
        let svg = format!("<svg><g><g>{ATTRIBUTION}</g></g></svg>");
        let stripped = strip_decoration(&svg, &markers());
        assert_eq!(stripped, "<svg></svg>");
    }

    #[test]
    fn textpath_prefix_is_not_mistaken_for_text() {
        // `<textPath>` shares the `<text` prefix but is a different element;
        // the enclosing-element walk must not treat it as the boundary.
        let svg = r##"<svg><textPath href="#p">Music engraving by LilyPond</textPath></svg>"##;
        let stripped = strip_decoration(svg, &markers());
        assert_eq!(stripped, svg);
    }
}
