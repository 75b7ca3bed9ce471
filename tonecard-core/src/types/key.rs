//! Keys, key signatures and diatonic scales.
//!
//! Major scales are derived the way a musician reads a key signature: find the
//! key on the circle of fifths (sharp side) or fourths (flat side), take as many
//! accidentals as its distance from C, and apply them to the seven letters
//! starting at the key's letter.

use crate::error::{Result, TheoryError};
use crate::types::pitch::{sanitize_spelling, CHROMATIC_SLOTS, NATURAL_LETTERS};
use std::fmt;

/// Number of leaps walked around the circle from C in either direction
const CIRCLE_LEAPS: usize = 7;

/// Which accidental a key signature uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccidentalKind {
    Natural,
    Sharp,
    Flat,
}

impl AccidentalKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            AccidentalKind::Natural => "",
            AccidentalKind::Sharp => "#",
            AccidentalKind::Flat => "b",
        }
    }
}

/// A key signature: its accidental and the letters it alters, in signature order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySignature {
    pub accidental: AccidentalKind,
    pub altered: Vec<char>,
}

impl KeySignature {
    /// Number of sharps or flats
    pub fn count(&self) -> usize {
        self.altered.len()
    }

    fn alters(&self, letter: char) -> bool {
        self.altered.contains(&letter)
    }
}

/// The seven church modes of the major scale, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    pub fn from_number(number: u8) -> Result<Mode> {
        match number {
            1..=7 => Ok(Self::ALL[number as usize - 1]),
            _ => Err(TheoryError::InvalidMode(number)),
        }
    }

    /// Parse a mode name (case-insensitive); "major" and "minor" are accepted as
    /// Ionian and Aeolian
    pub fn from_name(name: &str) -> Option<Mode> {
        match name.trim().to_lowercase().as_str() {
            "ionian" | "major" => Some(Mode::Ionian),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" | "minor" => Some(Mode::Aeolian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }

    /// Position of the mode's root in the parent major scale (1-7)
    pub fn number(&self) -> u8 {
        match self {
            Mode::Ionian => 1,
            Mode::Dorian => 2,
            Mode::Phrygian => 3,
            Mode::Lydian => 4,
            Mode::Mixolydian => 5,
            Mode::Aeolian => 6,
            Mode::Locrian => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Collect `leaps + 1` entries of `scale`, stepping `interval` positions at a time
/// from `start` (both ends included).
pub fn build_interval_cycle<S: AsRef<str>>(
    interval: usize,
    leaps: usize,
    scale: &[S],
    start: usize,
) -> Vec<String> {
    if scale.is_empty() {
        return Vec::new();
    }
    (0..=leaps)
        .map(|i| scale[(start + interval * i) % scale.len()].as_ref().to_string())
        .collect()
}

/// The circle of fourths (flat keys) and fifths (sharp keys), 8 entries each
/// starting at C: `[C, F, Bb, Eb, Ab, Db, Gb, Cb]` and `[C, G, D, A, E, B, F#, C#]`.
pub fn build_circle_of_fifths() -> (Vec<String>, Vec<String>) {
    let flat_keys = build_interval_cycle(5, CIRCLE_LEAPS, &CHROMATIC_SLOTS, 0)
        .iter()
        .map(|entry| sanitize_spelling(entry, false))
        .collect();
    let sharp_keys = build_interval_cycle(7, CIRCLE_LEAPS, &CHROMATIC_SLOTS, 0)
        .iter()
        .map(|entry| sanitize_spelling(entry, true))
        .collect();
    (flat_keys, sharp_keys)
}

/// All 15 conventional major keys: C, then the flat side, then the sharp side
pub fn all_major_keys() -> Vec<String> {
    let (flat_keys, sharp_keys) = build_circle_of_fifths();
    let mut keys = flat_keys;
    keys.extend(sharp_keys.into_iter().skip(1));
    keys
}

/// Upper-case the first letter of a key name ("bb" -> "Bb")
pub fn normalize_key_name(key: &str) -> String {
    let key = key.trim();
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Work out the key signature of a major key from its place on the circle
pub fn key_signature(key: &str) -> Result<KeySignature> {
    let key = normalize_key_name(key);
    let (flat_keys, sharp_keys) = build_circle_of_fifths();

    let (accidental, count) = if let Some(pos) = flat_keys.iter().position(|k| *k == key) {
        (AccidentalKind::Flat, pos)
    } else if let Some(pos) = sharp_keys.iter().position(|k| *k == key) {
        (AccidentalKind::Sharp, pos)
    } else {
        return Err(TheoryError::UnknownKey(key));
    };

    if count == 0 {
        return Ok(KeySignature {
            accidental: AccidentalKind::Natural,
            altered: Vec::new(),
        });
    }

    // Sharps enter F C G D A E B, flats B E A D G C F
    let (interval, first) = match accidental {
        AccidentalKind::Sharp => (4, 'F'),
        _ => (3, 'B'),
    };
    let start = NATURAL_LETTERS
        .iter()
        .position(|&l| l == first)
        .unwrap_or_default();
    let letters: Vec<String> = NATURAL_LETTERS.iter().map(|l| l.to_string()).collect();
    let altered = build_interval_cycle(interval, count - 1, &letters, start)
        .iter()
        .filter_map(|l| l.chars().next())
        .collect();

    Ok(KeySignature {
        accidental,
        altered,
    })
}

/// Build the major scale of `key`, e.g. `F` -> `[F, G, A, Bb, C, D, E]`
pub fn build_major_scale(key: &str) -> Result<Vec<String>> {
    let signature = key_signature(key)?;
    let key = normalize_key_name(key);
    let first = key
        .chars()
        .next()
        .ok_or_else(|| TheoryError::UnknownKey(key.clone()))?;
    let start = NATURAL_LETTERS
        .iter()
        .position(|&l| l == first)
        .ok_or_else(|| TheoryError::UnknownKey(key.clone()))?;

    let scale = (0..NATURAL_LETTERS.len())
        .map(|i| {
            let letter = NATURAL_LETTERS[(start + i) % NATURAL_LETTERS.len()];
            let mut note = letter.to_string();
            if signature.alters(letter) {
                note.push_str(signature.accidental.symbol());
            }
            note
        })
        .collect();

    Ok(scale)
}

/// Rotate a scale so that it starts on degree `mode` (1-based)
pub fn build_modal_scale<T: Clone>(scale: &[T], mode: u8) -> Result<Vec<T>> {
    if mode == 0 || mode as usize > scale.len() {
        return Err(TheoryError::InvalidMode(mode));
    }
    let mut rotated = scale.to_vec();
    rotated.rotate_left(mode as usize - 1);
    Ok(rotated)
}

/// What a [`Scale`] was built from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleKind {
    /// A mode of a major key; Ionian is the major scale itself
    Diatonic { key: String, mode: Mode },
    /// All twelve chromatic slots, no key
    Chromatic,
}

/// The active tonal context: an ordered list of note spellings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    kind: ScaleKind,
    notes: Vec<String>,
    parent: Vec<String>,
}

impl Scale {
    /// The major scale of `key`
    pub fn major(key: &str) -> Result<Self> {
        Self::modal(key, Mode::Ionian)
    }

    /// A mode of the major scale of `key`
    pub fn modal(key: &str, mode: Mode) -> Result<Self> {
        let parent = build_major_scale(key)?;
        let notes = build_modal_scale(&parent, mode.number())?;
        Ok(Scale {
            kind: ScaleKind::Diatonic {
                key: normalize_key_name(key),
                mode,
            },
            notes,
            parent,
        })
    }

    /// The chromatic pseudo-key: all twelve paired slots
    pub fn chromatic() -> Self {
        let notes: Vec<String> = CHROMATIC_SLOTS.iter().map(|s| s.to_string()).collect();
        Scale {
            kind: ScaleKind::Chromatic,
            parent: notes.clone(),
            notes,
        }
    }

    /// Parse a key name: `"Bb"`, `"chromatic"`, or a mode rooted on a note
    /// such as `"D dorian"` or `"A minor"`.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("chromatic") {
            return Ok(Self::chromatic());
        }

        let mut parts = name.split_whitespace();
        let root = parts.next().unwrap_or_default();
        let mode = match parts.next() {
            None => return Self::major(root),
            Some(mode_name) => {
                Mode::from_name(mode_name).ok_or_else(|| TheoryError::UnknownKey(name.into()))?
            }
        };
        if parts.next().is_some() {
            return Err(TheoryError::UnknownKey(name.to_string()));
        }

        // Find the major key whose `mode`th degree is the requested root
        let root = normalize_key_name(root);
        for key in all_major_keys() {
            let parent = build_major_scale(&key)?;
            if parent[mode.number() as usize - 1] == root {
                return Self::modal(&key, mode);
            }
        }
        Err(TheoryError::UnknownKey(name.to_string()))
    }

    pub fn kind(&self) -> &ScaleKind {
        &self.kind
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// The parent major scale (the chromatic slots for the chromatic pseudo-key)
    pub fn parent_major(&self) -> &[String] {
        &self.parent
    }

    pub fn is_chromatic(&self) -> bool {
        matches!(self.kind, ScaleKind::Chromatic)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn tonic(&self) -> &str {
        self.notes.first().map(String::as_str).unwrap_or_default()
    }

    /// Display name: "C Major", "D Dorian" or "Chromatic"
    pub fn name(&self) -> String {
        match &self.kind {
            ScaleKind::Chromatic => "Chromatic".to_string(),
            ScaleKind::Diatonic {
                key,
                mode: Mode::Ionian,
            } => format!("{} Major", key),
            ScaleKind::Diatonic { mode, .. } => format!("{} {}", self.tonic(), mode),
        }
    }

    /// A different mode of the same parent key
    pub fn with_mode(&self, mode: Mode) -> Result<Self> {
        match &self.kind {
            ScaleKind::Diatonic { key, .. } => Self::modal(key, mode),
            ScaleKind::Chromatic => Err(TheoryError::InvalidMode(mode.number())),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]", self.name(), self.notes.join(", "))
    }
}
