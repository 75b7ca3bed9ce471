//! Harmonic analysis of a played hand.
//!
//! [`analyze_hand`] groups the cards by scale note, then runs four detectors
//! side by side: intervals, triads, sevenths and scales. Each detector sees
//! the same tally and none suppresses another, so a hand can be a triad and
//! part of a scale at once. Repeated notes (or the single highest note when
//! nothing repeats) fill the octaves slot.

pub mod chords;
pub mod intervals;
pub mod scales;
pub mod tally;

pub use chords::{
    identify_sevenths, identify_triads, SeventhMatch, SeventhQuality, TriadMatch, TriadQuality,
};
pub use intervals::{identify_intervals, IntervalClass, IntervalMatch, IntervalPair};
pub use scales::{identify_scales, ScaleMatch, ScaleShape};
pub use tally::{
    consolidate_octaves, drop_empty_entries, sort_by_occurrence_descending, Tally, TallyEntry,
};

use crate::error::Result;
use crate::types::card::Card;
use crate::types::key::Scale;

/// The key a hand is analyzed in
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameContext {
    pub scale: Scale,
    pub key_label: String,
}

impl GameContext {
    pub fn new(scale: Scale) -> Self {
        let key_label = scale.name();
        GameContext { scale, key_label }
    }

    /// Context for a key name accepted by [`Scale::parse`]
    pub fn from_key(key: &str) -> Result<Self> {
        Scale::parse(key).map(Self::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OctaveKind {
    /// At least one note was played in more than one octave
    Octave,
    /// Nothing repeats; the highest card stands alone
    HighNote,
}

/// One note of the octaves slot with the cards that hold it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctaveMatch {
    pub name: String,
    pub count: usize,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctavesResult {
    pub kind: OctaveKind,
    pub matches: Vec<OctaveMatch>,
}

impl OctavesResult {
    pub fn labels(&self) -> Vec<String> {
        match self.kind {
            OctaveKind::Octave => self.matches.iter().map(|m| m.name.clone()).collect(),
            OctaveKind::HighNote => self
                .matches
                .iter()
                .flat_map(|m| m.cards.iter().map(Card::to_string))
                .collect(),
        }
    }
}

/// Everything found in one hand. A slot is `None` when its detector found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandAnalysis {
    pub octaves: Option<OctavesResult>,
    pub intervals: Option<Vec<IntervalMatch>>,
    pub triads: Option<Vec<TriadMatch>>,
    pub sevenths: Option<Vec<SeventhMatch>>,
    pub scales: Option<Vec<ScaleMatch>>,
}

impl HandAnalysis {
    pub fn is_empty(&self) -> bool {
        self.octaves.is_none()
            && self.intervals.is_none()
            && self.triads.is_none()
            && self.sevenths.is_none()
            && self.scales.is_none()
    }
}

fn non_empty<T>(found: Vec<T>) -> Option<Vec<T>> {
    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

/// Repeated notes, or the highest card when every note is played once
fn identify_octaves(tally: &Tally) -> Option<OctavesResult> {
    let sorted = sort_by_occurrence_descending(drop_empty_entries(tally.clone()));
    let top = sorted.entries().first()?.count();

    if top > 1 {
        let matches = sorted
            .into_iter()
            .take_while(|e| e.count() == top)
            .map(|e| OctaveMatch {
                count: e.count(),
                name: e.name,
                cards: e.cards,
            })
            .collect();
        return Some(OctavesResult {
            kind: OctaveKind::Octave,
            matches,
        });
    }

    let (entry, card) = sorted
        .iter()
        .flat_map(|e| e.cards.iter().map(move |c| (e, c)))
        .max_by_key(|(_, c)| c.pitch_height())?;
    Some(OctavesResult {
        kind: OctaveKind::HighNote,
        matches: vec![OctaveMatch {
            name: entry.name.clone(),
            count: 1,
            cards: vec![card.clone()],
        }],
    })
}

/// Analyze `cards` in the context's key.
///
/// Cards whose rank is not spelled in the scale are ignored. An empty hand
/// gives an empty analysis; a single card only ever fills the octaves slot.
pub fn analyze_hand(cards: &[Card], context: &GameContext) -> HandAnalysis {
    let tally = consolidate_octaves(cards, context.scale.notes());

    let analysis = HandAnalysis {
        octaves: identify_octaves(&tally),
        intervals: non_empty(identify_intervals(&tally)),
        triads: non_empty(identify_triads(&tally, &context.scale)),
        sevenths: non_empty(identify_sevenths(&tally, &context.scale)),
        scales: non_empty(identify_scales(&tally, &context.scale)),
    };

    log::debug!(
        "analyzed {} card(s) in {}: {} interval class(es), {} triad(s), {} seventh(s), {} scale(s)",
        cards.len(),
        context.key_label,
        analysis.intervals.as_ref().map_or(0, Vec::len),
        analysis.triads.as_ref().map_or(0, Vec::len),
        analysis.sevenths.as_ref().map_or(0, Vec::len),
        analysis.scales.as_ref().map_or(0, Vec::len),
    );
    analysis
}
