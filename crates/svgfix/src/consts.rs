use regex::Regex;
use std::sync::LazyLock;

const NUMBER: &str = r"(-?[0-9]+(?:\.[0-9]+)?)";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// The four-number logical coordinate window. Components are captured raw and
// parsed later so that the malformed-field policy lives in one place.
regex!(VIEWBOX_REGEX, r#"viewBox="([^"]*)""#);
// Opening <svg> tags, matched non-greedily so sibling fragments inside one
// container are each handled on their own.
regex!(SVG_OPEN_REGEX, r"<svg\b[^>]*>");
// Leading whitespace keeps these from matching inside e.g. `stroke-width`.
regex!(WIDTH_ATTR_REGEX, r#"\swidth="[^"]*""#);
regex!(HEIGHT_ATTR_REGEX, r#"\sheight="[^"]*""#);

// Positional hints for content-bounds estimation. Deliberately superficial:
// translation offsets, line endpoints, rect extents. Path curve geometry is
// never parsed.
regex!(TRANSLATE_REGEX, format!(r"translate\(\s*{NUMBER}\s*(?:,\s*{NUMBER}\s*)?\)").as_str());
regex!(LINE_TAG_REGEX, r"<line\b[^>]*>");
regex!(RECT_TAG_REGEX, r"<rect\b[^>]*>");
// Transformed groups whose first child is a path. The group origin plus a
// fixed width hint stands in for the path's real extent.
regex!(
    PATH_GROUP_REGEX,
    format!(r"<g\b[^>]*transform=\x22translate\(\s*{NUMBER}\s*(?:,\s*{NUMBER}\s*)?\)\x22[^>]*>\s*<path").as_str()
);
regex!(X1_ATTR_REGEX, format!(r#"\bx1="{NUMBER}""#).as_str());
regex!(Y1_ATTR_REGEX, format!(r#"\by1="{NUMBER}""#).as_str());
regex!(X2_ATTR_REGEX, format!(r#"\bx2="{NUMBER}""#).as_str());
regex!(Y2_ATTR_REGEX, format!(r#"\by2="{NUMBER}""#).as_str());
regex!(X_ATTR_REGEX, format!(r#"\bx="{NUMBER}""#).as_str());
regex!(Y_ATTR_REGEX, format!(r#"\by="{NUMBER}""#).as_str());
// Whitespace prefix, like the attribute rewrites above: a `\b` alone would
// match the `width` inside `stroke-width`.
regex!(W_ATTR_REGEX, format!(r#"\swidth="{NUMBER}""#).as_str());
regex!(H_ATTR_REGEX, format!(r#"\sheight="{NUMBER}""#).as_str());

// Wrapper groups left empty after decoration removal.
regex!(EMPTY_GROUP_REGEX, r"<g\b[^>]*>\s*</g>");
