//! Embedded assets for the browser harness.
//!
//! The chart script and the harness page template are embedded into the
//! binary at compile time using [`rust-embed`](rust_embed), so the renderer
//! works without an install step or network access.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "../../assets/chart/"]
pub(crate) struct ChartAssets;
impl ChartAssets {
    fn load(name: &str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::AssetNotFound(name.to_string()))
    }

    /// The bundled chord-chart drawing script.
    pub(crate) fn chart_script() -> Result<String> {
        Self::load("chartbox.js")
    }

    /// The harness page template the script runs inside.
    pub(crate) fn harness_template() -> Result<String> {
        Self::load("harness.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_script_is_embedded() {
        let script = ChartAssets::chart_script().unwrap();
        assert!(script.contains("segnoRenderAll"));
    }

    #[test]
    fn harness_template_is_embedded() {
        let template = ChartAssets::harness_template().unwrap();
        assert!(template.contains("segno-charts"));
        assert!(template.contains("{{ payload }}"));
    }
}
