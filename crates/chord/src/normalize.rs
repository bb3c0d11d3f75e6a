//! Validation of author input into the canonical [`ChordSheet`].

use crate::error::{ErrorKind, Result};
use crate::model::{Barre, Chord, ChordDef, ChordInput, ChordSheet, Finger, FretSpec, SheetStyle};
use tracing::instrument;

/// Standard guitar tuning, lowest string first.
const STANDARD_TUNING: [&str; 6] = ["E", "A", "D", "G", "B", "E"];

/// Parses and validates one fenced block's JSON payload.
///
/// Accepts a single chord object or an array of them. Every finger, barre
/// and tuning entry is checked against the (merged) style's string and fret
/// counts; the first violation fails the whole block. Fret numbers are
/// relative to the displayed window: `0` is an open string, `1` through
/// `frets` are rows of the diagram, and `"x"` mutes the string.
#[instrument(skip_all, fields(payload_size = payload.len()))]
pub fn normalize(payload: &str, defaults: &SheetStyle) -> Result<ChordSheet> {
    let input: ChordInput = match serde_json::from_str(payload) {
        Ok(input) => input,
        Err(err) => exn::bail!(ErrorKind::Json(err.to_string())),
    };
    let defs = input.into_vec();
    if defs.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }
    let chords = defs.into_iter().map(|def| normalize_chord(def, defaults)).collect::<Result<Vec<_>>>()?;
    tracing::debug!(chords = chords.len(), "chord block normalized");
    Ok(ChordSheet { chords })
}

fn normalize_chord(def: ChordDef, defaults: &SheetStyle) -> Result<Chord> {
    let style = defaults.merged(&def.style);
    let fingers = def
        .fingers
        .iter()
        .map(|spec| {
            let string = spec.string();
            if string == 0 || string > style.strings {
                exn::bail!(ErrorKind::StringOutOfRange { string, strings: style.strings });
            }
            let fret = match spec.fret() {
                FretSpec::Number(n) => {
                    if *n > style.frets {
                        exn::bail!(ErrorKind::FretOutOfRange {
                            fret: *n,
                            frets: style.frets,
                            position: def.position,
                        });
                    }
                    Some(*n)
                }
                FretSpec::Text(s) if s.eq_ignore_ascii_case("x") => None,
                FretSpec::Text(s) => {
                    exn::bail!(ErrorKind::Json(format!("unrecognized fret value {s:?}")))
                }
            };
            Ok(Finger { string, fret, label: spec.label().map(str::to_string) })
        })
        .collect::<Result<Vec<_>>>()?;
    let barres = def
        .barres
        .iter()
        .map(|spec| {
            if spec.from_string <= spec.to_string {
                exn::bail!(ErrorKind::BarreSpan);
            }
            for string in [spec.from_string, spec.to_string] {
                if string == 0 || string > style.strings {
                    exn::bail!(ErrorKind::StringOutOfRange { string, strings: style.strings });
                }
            }
            if spec.fret == 0 || spec.fret > style.frets {
                exn::bail!(ErrorKind::FretOutOfRange {
                    fret: spec.fret,
                    frets: style.frets,
                    position: def.position,
                });
            }
            Ok(Barre { from_string: spec.from_string, to_string: spec.to_string, fret: spec.fret })
        })
        .collect::<Result<Vec<_>>>()?;
    let tuning = match def.tuning {
        Some(tuning) => {
            if tuning.len() != usize::from(style.strings) {
                exn::bail!(ErrorKind::TuningMismatch { listed: tuning.len(), strings: style.strings });
            }
            tuning
        }
        // Only the six-string default has a canonical tuning; anything else
        // draws without note names unless the author supplies them.
        None if style.strings == 6 => STANDARD_TUNING.iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };
    Ok(Chord { title: def.title, fingers, barres, position: def.position.max(1), tuning, style })
}
