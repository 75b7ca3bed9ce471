//! Hand normalization: group played cards by the scale note they spell.

use crate::types::card::Card;
use crate::types::pitch::PitchClass;

/// The cards that spelled one scale note
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TallyEntry {
    /// Spelling of the note as it appears in the scale
    pub name: String,
    pub pitch_class: PitchClass,
    pub cards: Vec<Card>,
}

impl TallyEntry {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn octaves(&self) -> Vec<u8> {
        self.cards.iter().map(|c| c.octave).collect()
    }
}

/// Per-note grouping of a hand, one entry per scale note
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    entries: Vec<TallyEntry>,
}

impl Tally {
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TallyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of cards across all entries
    pub fn card_count(&self) -> usize {
        self.entries.iter().map(TallyEntry::count).sum()
    }

    /// Number of entries holding at least one card
    pub fn occupied_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_empty()).count()
    }

    /// First non-empty entry on the given pitch class
    pub fn find(&self, pitch_class: PitchClass) -> Option<&TallyEntry> {
        self.entries
            .iter()
            .find(|e| e.pitch_class == pitch_class && !e.is_empty())
    }

    pub fn is_occupied(&self, pitch_class: PitchClass) -> bool {
        self.find(pitch_class).is_some()
    }
}

impl IntoIterator for Tally {
    type Item = TallyEntry;
    type IntoIter = std::vec::IntoIter<TallyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<TallyEntry> for Tally {
    fn from_iter<I: IntoIterator<Item = TallyEntry>>(iter: I) -> Self {
        Tally {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Does `rank` spell this scale entry? Either half of a paired entry counts.
fn spells(entry: &str, rank: &str) -> bool {
    entry == rank || entry.split('/').any(|half| half == rank)
}

/// Group `cards` under the scale notes they spell, in scale order.
///
/// Matching is on the scale's own spelling: in F major a card ranked `A#` is
/// not `Bb`. Cards whose rank is not in the scale are left out.
pub fn consolidate_octaves<S: AsRef<str>>(cards: &[Card], scale: &[S]) -> Tally {
    let tally: Tally = scale
        .iter()
        .filter_map(|entry| {
            let name = entry.as_ref();
            let pitch_class = match PitchClass::from_name(name) {
                Ok(pc) => pc,
                Err(e) => {
                    log::warn!("skipping scale entry: {}", e);
                    return None;
                }
            };
            let cards = cards
                .iter()
                .filter(|card| spells(name, &card.rank))
                .cloned()
                .collect();
            Some(TallyEntry {
                name: name.to_string(),
                pitch_class,
                cards,
            })
        })
        .collect();

    let dropped = cards.len().saturating_sub(tally.card_count());
    if dropped > 0 {
        log::debug!("{} card(s) outside the scale left out of the tally", dropped);
    }
    tally
}

/// Stable sort by card count, most cards first
pub fn sort_by_occurrence_descending(tally: Tally) -> Tally {
    let mut entries = tally.entries;
    entries.sort_by(|a, b| b.count().cmp(&a.count()));
    Tally { entries }
}

/// Keep only entries that hold at least one card
pub fn drop_empty_entries(tally: Tally) -> Tally {
    tally.into_iter().filter(|e| !e.is_empty()).collect()
}
