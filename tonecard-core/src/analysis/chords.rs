//! Triad and seventh-chord detection over a tally.
//!
//! Both detectors walk every occupied entry as a candidate root and look for
//! chord members by semitone offset. Sevenths are found from scratch rather
//! than layered on the triad results.

use crate::analysis::tally::{Tally, TallyEntry};
use crate::catalog::{create_diatonic_structure, create_harmonic_structure};
use crate::types::card::Card;
use crate::types::key::Scale;
use crate::types::pitch::PitchClass;
use std::fmt;

const MINOR_THIRD: i8 = 3;
const MAJOR_THIRD: i8 = 4;
const DIMINISHED_FIFTH: i8 = 6;
const PERFECT_FIFTH: i8 = 7;
const AUGMENTED_FIFTH: i8 = 8;
const MINOR_SEVENTH: i8 = 10;
const MAJOR_SEVENTH: i8 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl TriadQuality {
    pub fn name(&self) -> &'static str {
        match self {
            TriadQuality::Major => "Major",
            TriadQuality::Minor => "Minor",
            TriadQuality::Diminished => "Diminished",
            TriadQuality::Augmented => "Augmented",
        }
    }

    /// Name of the matching chromatic chord in the catalog
    fn structure(&self) -> &'static str {
        match self {
            TriadQuality::Major => "majorTriad",
            TriadQuality::Minor => "minorTriad",
            TriadQuality::Diminished => "dimTriad",
            TriadQuality::Augmented => "augTriad",
        }
    }
}

impl fmt::Display for TriadQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeventhQuality {
    Major7,
    Minor7,
    Dominant7,
    HalfDiminished,
}

impl SeventhQuality {
    pub fn name(&self) -> &'static str {
        match self {
            SeventhQuality::Major7 => "Major 7",
            SeventhQuality::Minor7 => "Minor 7",
            SeventhQuality::Dominant7 => "Dominant 7",
            SeventhQuality::HalfDiminished => "Half-diminished (minor7\u{266d}5)",
        }
    }

    fn structure(&self) -> &'static str {
        match self {
            SeventhQuality::Major7 => "majorSeventhChord",
            SeventhQuality::Minor7 => "minorSeventhChord",
            SeventhQuality::Dominant7 => "dominantSeventhChord",
            SeventhQuality::HalfDiminished => "minor7flat5",
        }
    }
}

impl fmt::Display for SeventhQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A triad rooted on a held note
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriadMatch {
    pub root: String,
    pub quality: TriadQuality,
    /// Chord members that are held, as spelled in the scale
    pub members: Vec<String>,
    pub cards: Vec<Card>,
}

impl TriadMatch {
    pub fn label(&self) -> String {
        format!("{} {} Triad", self.root, self.quality)
    }
}

/// A seventh chord rooted on a held note
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeventhMatch {
    pub root: String,
    pub quality: SeventhQuality,
    pub members: Vec<String>,
    pub cards: Vec<Card>,
}

impl SeventhMatch {
    pub fn label(&self) -> String {
        format!("{} {}", self.root, self.quality)
    }
}

/// Occupied entries above one root, looked up by semitone offset
struct RootView<'a> {
    tally: &'a Tally,
    root: &'a TallyEntry,
}

impl RootView<'_> {
    fn has(&self, semitones: i8) -> bool {
        self.tally.is_occupied(self.root.pitch_class + semitones)
    }

    fn triads(&self) -> Vec<TriadQuality> {
        let mut found = Vec::new();
        if self.has(PERFECT_FIFTH) {
            if self.has(MINOR_THIRD) {
                found.push(TriadQuality::Minor);
            }
            if self.has(MAJOR_THIRD) {
                found.push(TriadQuality::Major);
            }
        } else {
            if self.has(DIMINISHED_FIFTH) && self.has(MINOR_THIRD) {
                found.push(TriadQuality::Diminished);
            }
            if self.has(AUGMENTED_FIFTH) && self.has(MAJOR_THIRD) {
                found.push(TriadQuality::Augmented);
            }
        }
        found
    }

    fn sevenths(&self) -> Vec<SeventhQuality> {
        let mut found = Vec::new();
        if self.has(PERFECT_FIFTH) {
            if self.has(MINOR_THIRD) && self.has(MINOR_SEVENTH) {
                found.push(SeventhQuality::Minor7);
            }
            if self.has(MAJOR_THIRD) {
                if self.has(MAJOR_SEVENTH) {
                    found.push(SeventhQuality::Major7);
                } else if self.has(MINOR_SEVENTH) {
                    found.push(SeventhQuality::Dominant7);
                }
            }
        } else if self.has(DIMINISHED_FIFTH) && self.has(MINOR_THIRD) && self.has(MINOR_SEVENTH) {
            found.push(SeventhQuality::HalfDiminished);
        }
        found
    }
}

/// Realize the chord shape on `root`: the diatonic stack from the active
/// scale, or the named chromatic chord under the Chromatic key.
fn chord_shape(root: &TallyEntry, scale: &Scale, diatonic: &str, chromatic: &str) -> Vec<String> {
    let realized = if scale.is_chromatic() {
        create_harmonic_structure(&root.name, chromatic)
    } else {
        match scale.notes().iter().position(|n| n == &root.name) {
            Some(index) => create_diatonic_structure(index, scale.notes(), diatonic),
            None => return Vec::new(),
        }
    };
    realized.unwrap_or_else(|e| {
        log::warn!("could not realize {} on {}: {}", diatonic, root.name, e);
        Vec::new()
    })
}

/// Keep the shape members that are held, with their cards
fn held_members(tally: &Tally, shape: &[String]) -> (Vec<String>, Vec<Card>) {
    let mut members = Vec::new();
    let mut cards = Vec::new();
    for note in shape {
        let Ok(pitch_class) = PitchClass::from_name(note) else {
            continue;
        };
        if let Some(entry) = tally.find(pitch_class) {
            members.push(entry.name.clone());
            cards.extend(entry.cards.iter().cloned());
        }
    }
    (members, cards)
}

/// Find every triad rooted on an occupied entry of the tally
pub fn identify_triads(tally: &Tally, scale: &Scale) -> Vec<TriadMatch> {
    let mut matches = Vec::new();
    for root in tally.iter().filter(|e| !e.is_empty()) {
        let view = RootView { tally, root };
        for quality in view.triads() {
            let shape = chord_shape(root, scale, "triad", quality.structure());
            let (members, cards) = held_members(tally, &shape);
            log::trace!("{} {} triad over {:?}", root.name, quality, members);
            matches.push(TriadMatch {
                root: root.name.clone(),
                quality,
                members,
                cards,
            });
        }
    }
    matches
}

/// Find every seventh chord rooted on an occupied entry of the tally
pub fn identify_sevenths(tally: &Tally, scale: &Scale) -> Vec<SeventhMatch> {
    let mut matches = Vec::new();
    for root in tally.iter().filter(|e| !e.is_empty()) {
        let view = RootView { tally, root };
        for quality in view.sevenths() {
            let shape = chord_shape(root, scale, "seventhChord", quality.structure());
            let (members, cards) = held_members(tally, &shape);
            log::trace!("{} {} over {:?}", root.name, quality, members);
            matches.push(SeventhMatch {
                root: root.name.clone(),
                quality,
                members,
                cards,
            });
        }
    }
    matches
}
