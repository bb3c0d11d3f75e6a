//! User-facing chord description schema and the canonical normalized form.
//!
//! The input schema mirrors what authors write inside a fenced `chord`
//! block: either a single chord object or an array of them, with fingers
//! given as loose `[string, fret]` / `[string, fret, label]` tuples and a
//! fret of `"x"` marking a muted string. Normalization (see
//! [`crate::normalize`]) turns this into [`ChordSheet`], the strict shape
//! the browser harness feeds to the bundled chart script.

use serde::{Deserialize, Serialize};

/// One fenced block's payload: one chord or a batch of them.
///
/// `Many` must come first: untagged deserialization tries variants in
/// order, and every `ChordDef` field has a default, so an array payload
/// would otherwise deserialize as a single blank chord.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChordInput {
    Many(Vec<ChordDef>),
    One(ChordDef),
}

impl ChordInput {
    pub fn into_vec(self) -> Vec<ChordDef> {
        match self {
            Self::One(def) => vec![def],
            Self::Many(defs) => defs,
        }
    }
}

/// A chord as written by the author.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChordDef {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fingers: Vec<FingerSpec>,
    #[serde(default)]
    pub barres: Vec<BarreSpec>,
    /// First displayed fret; `1` for open-position chords.
    #[serde(default = "default_position")]
    pub position: u8,
    /// Open-string note names, lowest string first.
    #[serde(default)]
    pub tuning: Option<Vec<String>>,
    /// Per-chord overrides merged over the sheet-level style.
    #[serde(default)]
    pub style: StyleOverrides,
}

fn default_position() -> u8 {
    1
}

/// A finger placement tuple: `[string, fret]` or `[string, fret, label]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FingerSpec {
    Placed(u8, FretSpec),
    Labelled(u8, FretSpec, String),
}

impl FingerSpec {
    pub fn string(&self) -> u8 {
        match self {
            Self::Placed(s, _) | Self::Labelled(s, _, _) => *s,
        }
    }

    pub fn fret(&self) -> &FretSpec {
        match self {
            Self::Placed(_, f) | Self::Labelled(_, f, _) => f,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Placed(..) => None,
            Self::Labelled(_, _, label) => Some(label.as_str()),
        }
    }
}

/// A fret value: a number (`0` meaning open) or `"x"` for a muted string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FretSpec {
    Number(u8),
    Text(String),
}

/// A barre across several strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarreSpec {
    /// Highest-numbered (lowest-pitched) string covered.
    pub from_string: u8,
    /// Lowest-numbered string covered.
    pub to_string: u8,
    pub fret: u8,
}

/// Styling knobs accepted both at sheet level and per chord.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleOverrides {
    pub strings: Option<u8>,
    pub frets: Option<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub show_tuning: Option<bool>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub font: Option<String>,
    pub title_size: Option<u32>,
}

/// Resolved styling for a whole sheet; every field has a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetStyle {
    pub strings: u8,
    pub frets: u8,
    pub width: u32,
    pub height: u32,
    pub show_tuning: bool,
    pub color: String,
    pub background: String,
    pub font: String,
    pub title_size: u32,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            strings: 6,
            frets: 4,
            // The chart script draws at roughly 1.2:1 height to width; the
            // repair engine's fallback aspect assumes the same shape.
            width: 100,
            height: 120,
            show_tuning: true,
            color: "#444".to_string(),
            background: "none".to_string(),
            font: "sans-serif".to_string(),
            title_size: 14,
        }
    }
}

impl SheetStyle {
    /// Applies per-chord overrides on top of this style.
    pub fn merged(&self, over: &StyleOverrides) -> Self {
        Self {
            strings: over.strings.unwrap_or(self.strings),
            frets: over.frets.unwrap_or(self.frets),
            width: over.width.unwrap_or(self.width),
            height: over.height.unwrap_or(self.height),
            show_tuning: over.show_tuning.unwrap_or(self.show_tuning),
            color: over.color.clone().unwrap_or_else(|| self.color.clone()),
            background: over.background.clone().unwrap_or_else(|| self.background.clone()),
            font: over.font.clone().unwrap_or_else(|| self.font.clone()),
            title_size: over.title_size.unwrap_or(self.title_size),
        }
    }
}

/// A validated finger placement in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finger {
    pub string: u8,
    /// `None` means the string is muted.
    pub fret: Option<u8>,
    pub label: Option<String>,
}

/// A validated barre in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Barre {
    pub from_string: u8,
    pub to_string: u8,
    pub fret: u8,
}

/// One chord in the shape the chart script consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chord {
    pub title: Option<String>,
    pub fingers: Vec<Finger>,
    pub barres: Vec<Barre>,
    pub position: u8,
    pub tuning: Vec<String>,
    pub style: SheetStyle,
}

/// The canonical payload for one fenced block: every chord validated, every
/// style fully resolved. Serialized as JSON into the browser harness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordSheet {
    pub chords: Vec<Chord>,
}

impl ChordSheet {
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}
