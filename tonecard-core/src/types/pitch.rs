use crate::error::{Result, TheoryError};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The twelve chromatic slots, starting at C.
/// E# and B# have no slot of their own; they land on F and C.
pub const CHROMATIC_SLOTS: [&str; 12] = [
    "C", "C#/Db", "D", "D#/Eb", "E/Fb", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B/Cb",
];

/// The seven natural letters in scale order
pub const NATURAL_LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Height of A4 in semitones above C0
const A4_HEIGHT: i32 = 57;

/// Equal-tempered frequency of an absolute height (semitones above C0), A4 = 440Hz
pub fn frequency_of_height(height: i32) -> f32 {
    440.0 * 2.0_f32.powf((height - A4_HEIGHT) as f32 / 12.0)
}

/// Letter value (0-11) and accidental (-1, 0, 1) of a single spelling.
/// The letter is case-insensitive; the flat sign must be a lowercase `b`
/// (an uppercase second `B` is not an accidental).
fn parse_spelling(spelling: &str) -> Result<(u8, i8)> {
    let not_found = || TheoryError::PitchClassNotFound(spelling.to_string());
    let mut chars = spelling.trim().chars();

    let letter = chars.next().ok_or_else(not_found)?.to_ascii_uppercase();
    let natural: u8 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(not_found()),
    };

    let shift: i8 = match (chars.next(), chars.next()) {
        (None, _) => 0,
        (Some('#'), None) => 1,
        (Some('b'), None) => -1,
        _ => return Err(not_found()),
    };
    Ok((natural, shift))
}

/// Semitones from the C of a note's own octave, without wrapping:
/// `Cb` is -1 (the B below) and `B#` is 12 (the C above).
/// Paired slot labels use their first spelling.
pub fn semitones_above_c(name: &str) -> Result<i8> {
    let first = name.split('/').next().unwrap_or(name);
    let (natural, shift) =
        parse_spelling(first).map_err(|_| TheoryError::PitchClassNotFound(name.to_string()))?;
    Ok(natural as i8 + shift)
}

/// A position on the chromatic cycle (0=C, 1=C#/Db, ... 11=B).
///
/// Spelling is not part of the identity: `C#` and `Db` parse to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create a pitch class from its chromatic index (0-11)
    pub fn new(index: u8) -> Result<Self> {
        if index > 11 {
            return Err(TheoryError::InvalidPitchClass(index));
        }
        Ok(PitchClass(index))
    }

    /// Chromatic index (0-11)
    pub fn index(self) -> u8 {
        self.0
    }

    /// The chromatic slot label this pitch class occupies (e.g. "C#/Db")
    pub fn slot(self) -> &'static str {
        CHROMATIC_SLOTS[self.0 as usize]
    }

    /// Ascending distance in semitones from `self` up to `other` (0-11)
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Move by a number of semitones, wrapping around the cycle
    pub fn transpose(self, semitones: i8) -> PitchClass {
        PitchClass((self.0 as i32 + semitones as i32).rem_euclid(12) as u8)
    }

    /// Frequency of this pitch class in the given octave (octave 4 holds A440)
    pub fn frequency(self, octave: u8) -> f32 {
        frequency_of_height(octave as i32 * 12 + self.0 as i32)
    }

    /// Parse a single spelling: a letter followed by at most one `#` or `b`
    pub fn from_spelling(spelling: &str) -> Result<Self> {
        let (natural, shift) = parse_spelling(spelling)?;
        Ok(PitchClass(natural).transpose(shift))
    }

    /// Parse a note name that may be a paired slot label ("C#/Db") or a single spelling
    pub fn from_name(name: &str) -> Result<Self> {
        let first = name.split('/').next().unwrap_or(name);
        Self::from_spelling(first).map_err(|_| TheoryError::PitchClassNotFound(name.to_string()))
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot())
    }
}

impl Add<i8> for PitchClass {
    type Output = PitchClass;

    fn add(self, semitones: i8) -> Self::Output {
        self.transpose(semitones)
    }
}

impl Sub<i8> for PitchClass {
    type Output = PitchClass;

    fn sub(self, semitones: i8) -> Self::Output {
        self.transpose(-semitones)
    }
}

// Interval between two pitch classes, measured upward from the right operand
impl Sub<PitchClass> for PitchClass {
    type Output = u8;

    fn sub(self, other: PitchClass) -> Self::Output {
        other.interval_to(self)
    }
}

/// The fixed 12-slot chromatic scale with paired enharmonic spellings
pub fn chromatic_scale() -> Vec<String> {
    CHROMATIC_SLOTS.iter().map(|s| s.to_string()).collect()
}

/// Every individual spelling in the chromatic scale, pairs split apart (C, C#, Db, D, ...)
pub fn chromatic_spellings() -> Vec<String> {
    CHROMATIC_SLOTS
        .iter()
        .flat_map(|slot| slot.split('/'))
        .map(|s| s.to_string())
        .collect()
}

/// Resolve a spelling to the chromatic slot label it falls on.
///
/// `C#` and `Db` both give `"C#/Db"`, `E` and `Fb` give `"E/Fb"`, and `E#` gives `"F"`.
pub fn resolve_enharmonic_name(spelling: &str) -> Result<&'static str> {
    PitchClass::from_name(spelling).map(PitchClass::slot)
}

/// Find the position of `name` in `scale`, matching either half of a paired
/// entry ("C#/Db") without regard to case.
pub fn find_pitch_class_index<S: AsRef<str>>(name: &str, scale: &[S]) -> Option<usize> {
    let name = name.trim();
    scale.iter().position(|entry| {
        entry
            .as_ref()
            .split('/')
            .any(|half| half.eq_ignore_ascii_case(name))
    })
}

/// Swap a paired slot label for one of its halves: sharps keep the first half,
/// flats the second. Unpaired entries pass through unchanged.
pub(crate) fn sanitize_spelling(entry: &str, prefer_sharp: bool) -> String {
    match entry.split_once('/') {
        Some((sharp, flat)) => {
            if prefer_sharp {
                sharp.to_string()
            } else {
                flat.to_string()
            }
        }
        None => entry.to_string(),
    }
}
