//! Headless-browser chord-chart rendering.
//!
//! The bundled chart script draws chord diagrams as SVG in a DOM; we load a
//! harness page into headless Chromium, let the script run, dump the DOM
//! and pull the chart container back out. One renderer instance owns the
//! browser handle and is reused sequentially across blocks; the browser is
//! an expensive resource and is not pooled.

use crate::assets::ChartAssets;
use crate::chromium::Chromium;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use scraper::{Html, Selector};
use segno_chord::ChordSheet;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::instrument;

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#segno-charts").expect("static selector"));

/// Configuration for the browser-hosted chart renderer.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Explicit browser executable; discovery runs when unset.
    pub executable: Option<PathBuf>,
    /// Wall-clock budget per invocation. On expiry the browser is killed
    /// and the current block fails; sibling blocks are unaffected.
    pub timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self { executable: None, timeout: Duration::from_secs(15) }
    }
}

/// Renders [`ChordSheet`]s to a container of SVG fragments via headless
/// Chromium.
///
/// The handle is explicitly owned: [`ChordRenderer::new`] acquires the
/// browser, [`close`](ChordRenderer::close) releases it. Callers pass the
/// renderer where it is needed instead of sharing a global instance.
pub struct ChordRenderer {
    chromium: Chromium,
    engine: upon::Engine<'static>,
    template: upon::Template<'static>,
    timeout: Duration,
}

impl ChordRenderer {
    /// Discovers the browser and compiles the harness template. Compiling
    /// early means template problems surface at startup, not per block.
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let chromium = Chromium::discover(config.executable.as_deref())?;
        let engine = upon::Engine::new();
        let template = engine.compile(ChartAssets::harness_template()?).or_raise(|| ErrorKind::Template)?;
        Ok(Self { chromium, engine, template, timeout: config.timeout })
    }

    /// Renders one sheet (one fenced block, possibly several chords) into a
    /// single container element holding one `<svg>` per chord.
    ///
    /// The returned markup is raw renderer output; callers are expected to
    /// pass it through the repair engine before splicing it anywhere.
    #[instrument(skip_all, fields(chords = sheet.len()))]
    pub async fn render(&self, sheet: &ChordSheet) -> Result<String> {
        let page = self.harness_page(sheet)?;
        let mut command = self.chromium.command();
        command
            .args(["--headless=new", "--disable-gpu", "--no-sandbox", "--hide-scrollbars", "--dump-dom"])
            .arg(format!("file://{}", page.path().display()))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => output.or_raise(|| ErrorKind::Io)?,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "browser did not finish in time");
                exn::bail!(ErrorKind::Timeout);
            }
        };
        if !output.status.success() {
            exn::bail!(ErrorKind::BrowserFailed(output.status.code().unwrap_or(-1)));
        }
        extract_container(&String::from_utf8_lossy(&output.stdout))
    }

    /// Releases the browser handle. Nothing to tear down beyond dropping,
    /// but an explicit release keeps the ownership discipline visible at
    /// call sites.
    pub fn close(self) {}

    fn harness_page(&self, sheet: &ChordSheet) -> Result<tempfile::NamedTempFile> {
        let payload = serde_json::to_string(sheet).or_raise(|| ErrorKind::Payload)?;
        let html = self
            .template
            .render(&self.engine, upon::value! { script: ChartAssets::chart_script()?, payload: payload })
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        let mut page = tempfile::Builder::new()
            .prefix("segno-charts-")
            .suffix(".html")
            .tempfile()
            .or_raise(|| ErrorKind::Io)?;
        page.write_all(html.as_bytes()).or_raise(|| ErrorKind::Io)?;
        Ok(page)
    }
}

/// Pulls the chart container out of the dumped DOM.
fn extract_container(dom: &str) -> Result<String> {
    let document = Html::parse_document(dom);
    let container =
        document.select(&CONTAINER_SELECTOR).next().ok_or_raise(|| ErrorKind::ChartContainerMissing)?;
    Ok(format!(r#"<div class="segno-charts">{}</div>"#, container.inner_html()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_is_extracted_from_dumped_dom() {
        let dom = concat!(
            "<html><head></head><body>",
            r#"<div id="segno-charts"><svg viewBox="0 0 100 0"><rect/></svg></div>"#,
            "</body></html>",
        );
        let container = extract_container(dom).unwrap();
        assert!(container.starts_with(r#"<div class="segno-charts">"#));
        assert!(container.contains(r#"viewBox="0 0 100 0""#));
    }

    #[test]
    fn missing_container_is_a_typed_failure() {
        assert!(extract_container("<html><body><p>nothing here</p></body></html>").is_err());
    }
}
