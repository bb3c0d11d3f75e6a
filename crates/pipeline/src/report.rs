//! User-facing presentation of per-block failures and rendered markup.

use htmlize::escape_text;

/// Builds the inline error node rendered in place of a failed block.
///
/// The message is escaped and kept inside one styled `<div>` so it shows up
/// in the produced document without depending on any pipeline stylesheet.
pub fn error_node(label: &str, message: &str) -> String {
    format!(
        r#"<div class="segno-error" style="color: #b00; border: 2px solid #b00; padding: 0.5em;"><strong>{} block failed</strong><br/>{}</div>"#,
        escape_text(label),
        escape_text(message).replace('\n', "<br/>"),
    )
}

/// Drops blank lines from rendered markup before it is spliced into the
/// document. A blank line inside raw HTML ends the HTML block and hands the
/// rest back to normal markdown processing, which mangles the fragment.
pub(crate) fn without_blank_lines(markup: &str) -> String {
    markup.lines().filter(|line| !line.trim().is_empty()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_node_escapes_markup_in_messages() {
        let node = error_node("chord", "bad <svg> & worse");
        assert!(node.contains("bad &lt;svg&gt; &amp; worse"));
        assert!(node.contains("chord block failed"));
    }

    #[test]
    fn error_node_keeps_line_breaks_visible() {
        let node = error_node("music", "line one\nline two");
        assert!(node.contains("line one<br/>line two"));
    }

    #[test]
    fn blank_lines_are_removed_from_markup() {
        let markup = "<div>\n\n  \n<svg/>\n</div>";
        assert_eq!(without_blank_lines(markup), "<div>\n<svg/>\n</div>");
    }
}
