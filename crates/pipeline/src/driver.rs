//! Fenced-block transform drivers.
//!
//! Walks the pulldown-cmark event stream, finds fenced blocks whose info
//! string names one of the configured tags, dispatches each to its renderer
//! and splices the repaired SVG (or a failure presentation) back into the
//! stream, which is then re-serialized to markdown. Blocks are processed
//! one at a time against the single long-lived renderer handles; one
//! block's failure never aborts its siblings.

use crate::error::{ErrorKind, Result};
use crate::report;
use async_trait::async_trait;
use exn::ResultExt;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;
use segno_chord::{ChordSheet, SheetStyle};
use segno_render::{ChordRenderer, NotationRenderer};
use segno_svgfix::{DecorationMarkers, RepairPolicy, crop_to_content, repair_viewbox, strip_decoration};
use tracing::instrument;

/// What to splice in when a block fails to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Replace the block with an inline error node.
    #[default]
    ErrorNode,
    /// Keep the original fenced block and log a warning once.
    KeepBlock,
}

/// Settings for one transform run.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Info-string tag marking notation blocks.
    pub music_tag: String,
    /// Info-string tag marking chord blocks.
    pub chord_tag: String,
    pub on_failure: FailurePolicy,
    pub repair: RepairPolicy,
    pub markers: DecorationMarkers,
    /// Sheet-level style defaults for chord blocks.
    pub chord_defaults: SheetStyle,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            music_tag: "music".to_string(),
            chord_tag: "chord".to_string(),
            on_failure: FailurePolicy::default(),
            repair: RepairPolicy::default(),
            markers: DecorationMarkers::default(),
            chord_defaults: SheetStyle::default(),
        }
    }
}

/// The renderer seam the driver dispatches notation blocks through.
#[async_trait]
pub trait NotationBackend {
    async fn render(&self, source: &str) -> segno_render::Result<String>;
}

#[async_trait]
impl NotationBackend for NotationRenderer {
    async fn render(&self, source: &str) -> segno_render::Result<String> {
        NotationRenderer::render(self, source).await
    }
}

/// The renderer seam the driver dispatches chord blocks through.
#[async_trait]
pub trait ChordBackend {
    async fn render(&self, sheet: &ChordSheet) -> segno_render::Result<String>;
}

#[async_trait]
impl ChordBackend for ChordRenderer {
    async fn render(&self, sheet: &ChordSheet) -> segno_render::Result<String> {
        ChordRenderer::render(self, sheet).await
    }
}

/// The pair of long-lived renderer handles a transform run borrows.
pub struct Renderers<N = NotationRenderer, C = ChordRenderer> {
    pub notation: N,
    pub chords: C,
}

/// Which of the two configured tags a fenced block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Music,
    Chord,
}

impl BlockKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Chord => "chord",
        }
    }

    /// Matches the first whitespace-separated token of the info string, so
    /// `music key=G` still counts as a music block.
    fn from_info(info: &str, options: &TransformOptions) -> Option<Self> {
        let tag = info.split_whitespace().next()?;
        if tag == options.music_tag {
            Some(Self::Music)
        } else if tag == options.chord_tag {
            Some(Self::Chord)
        } else {
            None
        }
    }
}

/// A candidate block located in a document, for reporting tools that want
/// to inspect payloads without invoking any external renderer.
#[derive(Debug, Clone)]
pub struct FencedBlock {
    pub kind: BlockKind,
    pub source: String,
    /// 1-based line of the opening fence.
    pub line: usize,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Locates every candidate block in `document` without rendering anything.
pub fn find_blocks(document: &str, options: &TransformOptions) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(BlockKind, usize, String)> = None;
    for (event, range) in Parser::new_ext(document, parser_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                if let Some(kind) = BlockKind::from_info(&info, options) {
                    let line = document[..range.start].bytes().filter(|b| *b == b'\n').count() + 1;
                    current = Some((kind, line, String::new()));
                }
            }
            Event::Text(text) => {
                if let Some((_, _, source)) = current.as_mut() {
                    source.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((kind, line, source)) = current.take() {
                    blocks.push(FencedBlock { kind, source, line });
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Transforms `document`, replacing every candidate block with rendered and
/// repaired SVG markup (or the configured failure presentation), and
/// re-serializes the result to markdown.
#[instrument(skip_all, fields(document_size = document.len()))]
pub async fn transform<N, C>(
    document: &str,
    renderers: &Renderers<N, C>,
    options: &TransformOptions,
) -> Result<String>
where
    N: NotationBackend,
    C: ChordBackend,
{
    let mut events = Parser::new_ext(document, parser_options());
    let mut out: Vec<Event<'_>> = Vec::new();
    let mut rendered = 0usize;
    while let Some(event) = events.next() {
        let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = event else {
            out.push(event);
            continue;
        };
        let Some(kind) = BlockKind::from_info(&info, options) else {
            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
            continue;
        };
        let mut source = String::new();
        for inner in events.by_ref() {
            match inner {
                Event::Text(text) => source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => break,
                // Fenced code block content is text-only.
                _ => {}
            }
        }
        match render_block(kind, &source, renderers, options).await {
            Ok(markup) => {
                rendered += 1;
                out.push(Event::Html(CowStr::from(markup)));
            }
            Err(message) => match options.on_failure {
                FailurePolicy::ErrorNode => {
                    tracing::warn!(block = kind.label(), %message, "block failed; splicing inline error node");
                    out.push(Event::Html(CowStr::from(report::error_node(kind.label(), &message))));
                }
                FailurePolicy::KeepBlock => {
                    tracing::warn!(block = kind.label(), %message, "block failed; keeping original fenced block");
                    out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                    out.push(Event::Text(CowStr::from(source)));
                    out.push(Event::End(TagEnd::CodeBlock));
                }
            },
        }
    }
    tracing::debug!(rendered, "document transform complete");
    let mut buffer = String::with_capacity(document.len() + 1024);
    cmark(out.into_iter(), &mut buffer).or_raise(|| ErrorKind::Serialize)?;
    Ok(buffer)
}

/// Renders one block through its adapter and the repair engine. The error
/// side is the human-readable message destined for the failure
/// presentation; logging happens at the caller.
async fn render_block<N, C>(
    kind: BlockKind,
    source: &str,
    renderers: &Renderers<N, C>,
    options: &TransformOptions,
) -> std::result::Result<String, String>
where
    N: NotationBackend,
    C: ChordBackend,
{
    match kind {
        BlockKind::Music => {
            let raw = renderers.notation.render(source).await.map_err(|err| format!("{err:?}"))?;
            let stripped = strip_decoration(&raw, &options.markers);
            Ok(report::without_blank_lines(&crop_to_content(&stripped, &options.repair)))
        }
        BlockKind::Chord => {
            let sheet =
                segno_chord::normalize(source, &options.chord_defaults).map_err(|err| format!("{err:?}"))?;
            let raw = renderers.chords.render(&sheet).await.map_err(|err| format!("{err:?}"))?;
            Ok(report::without_blank_lines(&repair_viewbox(&raw, &options.repair)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeNotation {
        svg: String,
    }
    #[async_trait]
    impl NotationBackend for FakeNotation {
        async fn render(&self, _source: &str) -> segno_render::Result<String> {
            Ok(self.svg.clone())
        }
    }

    struct FakeCharts;
    #[async_trait]
    impl ChordBackend for FakeCharts {
        async fn render(&self, sheet: &ChordSheet) -> segno_render::Result<String> {
            // One degenerate fragment per chord, the shape the repair engine
            // exists to fix.
            let fragments: String = sheet
                .chords
                .iter()
                .map(|c| format!(r#"<svg viewBox="0 0 {} 0"><rect/></svg>"#, c.style.width))
                .collect();
            Ok(format!(r#"<div class="segno-charts">{fragments}</div>"#))
        }
    }

    fn renderers(notation_svg: &str) -> Renderers<FakeNotation, FakeCharts> {
        Renderers { notation: FakeNotation { svg: notation_svg.to_string() }, chords: FakeCharts }
    }

    #[tokio::test]
    async fn documents_without_candidate_blocks_pass_through() {
        let doc = "# Title\n\nSome *prose* and\n\n```rust\nfn main() {}\n```\n";
        let out = transform(doc, &renderers("<svg/>"), &TransformOptions::default()).await.unwrap();
        assert!(out.contains("fn main()"));
        assert!(out.contains("rust"));
        assert!(!out.contains("<svg"));
    }

    #[tokio::test]
    async fn chord_block_is_rendered_and_repaired() {
        let doc = "intro\n\n```chord\n{ \"title\": \"C\", \"fingers\": [[2, 1]] }\n```\n";
        let out = transform(doc, &renderers("<svg/>"), &TransformOptions::default()).await.unwrap();
        // Default chart width 100, repaired at the 1.2 fallback aspect.
        assert!(out.contains(r#"viewBox="0 0 100 120""#));
        assert!(!out.contains("```chord"));
    }

    #[tokio::test]
    async fn music_block_is_stripped_and_cropped() {
        let svg = concat!(
            r#"<svg viewBox="0 0 500 0" width="500pt" height="0pt">"#,
            r#"<g transform="translate(10,20)"><line x1="0" y1="0" x2="150" y2="4"/></g>"#,
            r#"<a xlink:href="https://lilypond.org/"><text>Music engraving by LilyPond</text></a></svg>"#,
        );
        let doc = "```music\n\\relative { c' d e }\n```\n";
        let out = transform(doc, &renderers(svg), &TransformOptions::default()).await.unwrap();
        assert!(!out.contains("lilypond.org"));
        assert!(out.contains(r#"width="100%""#));
        assert!(!out.contains(r#"viewBox="0 0 500 0""#));
    }

    #[tokio::test]
    async fn invalid_chord_payload_becomes_error_node() {
        let doc = "```chord\nnot json\n```\n";
        let out = transform(doc, &renderers("<svg/>"), &TransformOptions::default()).await.unwrap();
        assert!(out.contains("segno-error"));
        assert!(out.contains("chord block failed"));
    }

    #[tokio::test]
    async fn keep_block_policy_preserves_the_original_fence() {
        let doc = "```chord\nnot json\n```\n";
        let options = TransformOptions { on_failure: FailurePolicy::KeepBlock, ..Default::default() };
        let out = transform(doc, &renderers("<svg/>"), &options).await.unwrap();
        assert!(out.contains("not json"));
        assert!(out.contains("chord"));
        assert!(!out.contains("segno-error"));
    }

    #[tokio::test]
    async fn one_failing_block_does_not_abort_siblings() {
        let doc = concat!(
            "```chord\nnot json\n```\n\n",
            "```chord\n{ \"fingers\": [[1, 1]] }\n```\n",
        );
        let out = transform(doc, &renderers("<svg/>"), &TransformOptions::default()).await.unwrap();
        assert!(out.contains("segno-error"));
        assert!(out.contains(r#"viewBox="0 0 100 120""#));
    }

    #[test]
    fn find_blocks_reports_kind_and_line() {
        let doc = "# h\n\n```music\nc d e\n```\n\ntext\n\n```chord attr\n{}\n```\n";
        let blocks = find_blocks(doc, &TransformOptions::default());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Music);
        assert_eq!(blocks[0].line, 3);
        assert_eq!(blocks[0].source, "c d e\n");
        assert_eq!(blocks[1].kind, BlockKind::Chord);
        assert_eq!(blocks[1].line, 9);
    }

    #[test]
    fn unrelated_info_strings_are_ignored() {
        let doc = "```musical-theory\nnotes\n```\n";
        assert!(find_blocks(doc, &TransformOptions::default()).is_empty());
    }
}
