//! Layered configuration: built-in defaults, then `segno.toml`, then
//! `SEGNO_*` environment variables, merged with figment.
//!
//! The leaf crates take plain config structs; this module owns the serde
//! shapes and the conversion into those structs, so the tunables the repair
//! engine documents (aspect ratio, padding, markers) are reachable from a
//! file or the environment without touching any algorithm.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use segno_chord::SheetStyle;
use segno_pipeline::{FailurePolicy, TransformOptions};
use segno_render::{BrowserConfig, NotationConfig};
use segno_svgfix::{DecorationMarkers, RepairPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tags: Tags,
    pub on_failure: FailureMode,
    pub notation: Notation,
    pub browser: Browser,
    pub repair: Repair,
    pub markers: Markers,
    /// Sheet-level chord style defaults; per-chord overrides still apply.
    pub chords: SheetStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tags {
    pub music: String,
    pub chord: String,
}

impl Default for Tags {
    fn default() -> Self {
        Self { music: "music".to_string(), chord: "chord".to_string() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    #[default]
    ErrorNode,
    KeepBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Notation {
    pub executable: PathBuf,
    pub timeout_secs: u64,
    pub extra_args: Vec<String>,
}

impl Default for Notation {
    fn default() -> Self {
        let config = NotationConfig::default();
        Self { executable: config.executable, timeout_secs: config.timeout.as_secs(), extra_args: config.extra_args }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Browser {
    pub executable: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Browser {
    fn default() -> Self {
        let config = BrowserConfig::default();
        Self { executable: config.executable, timeout_secs: config.timeout.as_secs() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Repair {
    pub fallback_aspect: f64,
    pub padding: f64,
    pub group_width_hint: f64,
}

impl Default for Repair {
    fn default() -> Self {
        let policy = RepairPolicy::default();
        Self {
            fallback_aspect: policy.fallback_aspect,
            padding: policy.padding,
            group_width_hint: policy.group_width_hint,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    pub link_hosts: Vec<String>,
    pub captions: Vec<String>,
}

impl Default for Markers {
    fn default() -> Self {
        let markers = DecorationMarkers::default();
        Self { link_hosts: markers.link_hosts, captions: markers.captions }
    }
}

impl Config {
    pub fn notation_config(&self) -> NotationConfig {
        NotationConfig {
            executable: self.notation.executable.clone(),
            timeout: Duration::from_secs(self.notation.timeout_secs),
            extra_args: self.notation.extra_args.clone(),
        }
    }

    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            executable: self.browser.executable.clone(),
            timeout: Duration::from_secs(self.browser.timeout_secs),
        }
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            music_tag: self.tags.music.clone(),
            chord_tag: self.tags.chord.clone(),
            on_failure: match self.on_failure {
                FailureMode::ErrorNode => FailurePolicy::ErrorNode,
                FailureMode::KeepBlock => FailurePolicy::KeepBlock,
            },
            repair: RepairPolicy {
                fallback_aspect: self.repair.fallback_aspect,
                padding: self.repair.padding,
                group_width_hint: self.repair.group_width_hint,
            },
            markers: DecorationMarkers {
                link_hosts: self.markers.link_hosts.clone(),
                captions: self.markers.captions.clone(),
            },
            chord_defaults: self.chords.clone(),
        }
    }
}

fn layered(explicit: Option<&Path>) -> Figment {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let figment = match explicit {
        // An explicitly named file must exist; the implicit one is optional.
        Some(path) => figment.merge(Toml::file_exact(path)),
        None => figment.merge(Toml::file("segno.toml")),
    };
    figment.merge(Env::prefixed("SEGNO_").split("__"))
}

/// Loads configuration, layering `segno.toml` (or the explicitly given
/// file) and `SEGNO_*` environment variables over the defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    layered(explicit).extract().or_raise(|| ErrorKind::Config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_extract_cleanly() {
        let config: Config = Figment::from(Serialized::defaults(Config::default())).extract().unwrap();
        assert_eq!(config.tags.music, "music");
        assert_eq!(config.on_failure, FailureMode::ErrorNode);
        assert_eq!(config.repair.fallback_aspect, 1.2);
        assert_eq!(config.chords.strings, 6);
    }

    #[test]
    fn toml_layer_overrides_defaults() {
        let toml = r#"
            on_failure = "keep-block"

            [tags]
            music = "lilypond"

            [repair]
            fallback_aspect = 1.5
        "#;
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();
        assert_eq!(config.on_failure, FailureMode::KeepBlock);
        assert_eq!(config.tags.music, "lilypond");
        assert_eq!(config.repair.fallback_aspect, 1.5);
        // Untouched sections keep their defaults.
        assert_eq!(config.tags.chord, "chord");
        assert_eq!(config.repair.padding, 10.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = "[tags]\nmelody = \"m\"\n";
        let result: std::result::Result<Config, _> =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn conversions_carry_every_tunable() {
        let mut config = Config::default();
        config.repair.padding = 4.0;
        config.markers.captions = vec!["Engraved by".to_string()];
        config.notation.timeout_secs = 5;
        let options = config.transform_options();
        assert_eq!(options.repair.padding, 4.0);
        assert_eq!(options.markers.captions, vec!["Engraved by".to_string()]);
        assert_eq!(config.notation_config().timeout, Duration::from_secs(5));
    }
}
