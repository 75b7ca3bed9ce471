use crate::analysis::tally::Tally;
use crate::catalog::create_diatonic_structure;
use crate::types::card::Card;
use crate::types::key::Scale;
use crate::types::pitch::PitchClass;
use std::fmt;

const PENTATONIC_SIZE: usize = 5;
const HEPTATONIC_SIZE: usize = 7;
const RELATIVE_MINOR_DEGREE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleShape {
    MajorPentatonic,
    MinorPentatonic,
    Full,
}

impl fmt::Display for ScaleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleShape::MajorPentatonic => write!(f, "Major Pentatonic"),
            ScaleShape::MinorPentatonic => write!(f, "Minor Pentatonic"),
            ScaleShape::Full => write!(f, "Scale"),
        }
    }
}

/// A scale contained entirely in the hand
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleMatch {
    pub label: String,
    pub shape: ScaleShape,
    pub notes: Vec<String>,
    /// Cards held on the scale's notes
    pub cards: Vec<Card>,
}

impl ScaleMatch {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// Cards for every note of `notes`, or `None` if any note is not held
fn held_cards(tally: &Tally, notes: &[String]) -> Option<Vec<Card>> {
    let mut cards = Vec::new();
    for note in notes {
        let pitch_class = PitchClass::from_name(note).ok()?;
        let entry = tally.find(pitch_class)?;
        cards.extend(entry.cards.iter().cloned());
    }
    Some(cards)
}

/// Find the pentatonics of the parent major key and the full active scale
/// inside the hand. The Chromatic key has no scales to find.
///
/// Matches come out in the order major pentatonic, minor pentatonic, full
/// scale, so the last one is the largest.
pub fn identify_scales(tally: &Tally, scale: &Scale) -> Vec<ScaleMatch> {
    if scale.is_chromatic() {
        return Vec::new();
    }

    let distinct = tally.occupied_count();
    let parent = scale.parent_major();
    let mut candidates: Vec<(ScaleShape, String, Vec<String>)> = Vec::new();

    if distinct >= PENTATONIC_SIZE {
        let pentatonics = [
            (ScaleShape::MajorPentatonic, 0, "majorPenta"),
            (ScaleShape::MinorPentatonic, RELATIVE_MINOR_DEGREE, "minorPenta"),
        ];
        for (shape, degree, structure) in pentatonics {
            match create_diatonic_structure(degree, parent, structure) {
                Ok(notes) => {
                    let label = format!("{} {}", parent[degree], shape);
                    candidates.push((shape, label, notes));
                }
                Err(e) => log::warn!("could not build {}: {}", structure, e),
            }
        }
    }

    if distinct >= HEPTATONIC_SIZE && scale.len() == HEPTATONIC_SIZE {
        let label = format!("{} {}", scale.name(), ScaleShape::Full);
        candidates.push((ScaleShape::Full, label, scale.notes().to_vec()));
    }

    candidates
        .into_iter()
        .filter_map(|(shape, label, notes)| {
            let cards = held_cards(tally, &notes)?;
            log::trace!("hand contains {}", label);
            Some(ScaleMatch {
                label,
                shape,
                notes,
                cards,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tally::consolidate_octaves;
    use crate::types::key::Mode;

    fn tally_of(scale: &Scale, notes: &[&str]) -> Tally {
        let cards: Vec<Card> = notes.iter().map(|r| Card::new(*r, 4)).collect();
        consolidate_octaves(&cards, scale.notes())
    }

    #[test]
    fn test_major_pentatonic() {
        let scale = Scale::major("C").unwrap();
        let tally = tally_of(&scale, &["C", "D", "E", "G", "A"]);
        let scales = identify_scales(&tally, &scale);
        // The same notes are also A minor pentatonic
        assert_eq!(scales.len(), 2);
        assert_eq!(scales[0].label, "C Major Pentatonic");
        assert_eq!(scales[0].shape, ScaleShape::MajorPentatonic);
        assert_eq!(scales[0].count(), 5);
    }

    #[test]
    fn test_minor_pentatonic_from_sixth_degree() {
        let scale = Scale::major("C").unwrap();
        let tally = tally_of(&scale, &["A", "C", "D", "E", "G"]);
        let labels: Vec<String> = identify_scales(&tally, &scale)
            .into_iter()
            .map(|m| m.label)
            .collect();
        // same five pitch classes as the major pentatonic
        assert_eq!(labels, vec!["C Major Pentatonic", "A Minor Pentatonic"]);
    }

    #[test]
    fn test_full_scale_upgrade() {
        let scale = Scale::major("C").unwrap();
        let tally = tally_of(&scale, &["C", "D", "E", "G", "A", "F", "B"]);
        let scales = identify_scales(&tally, &scale);
        let shapes: Vec<ScaleShape> = scales.iter().map(|m| m.shape).collect();
        assert_eq!(
            shapes,
            vec![ScaleShape::MajorPentatonic, ScaleShape::MinorPentatonic, ScaleShape::Full]
        );
        assert_eq!(scales[2].label, "C Major Scale");
        assert_eq!(scales[2].count(), 7);
    }

    #[test]
    fn test_missing_member_aborts() {
        let scale = Scale::major("C").unwrap();
        let tally = tally_of(&scale, &["C", "D", "E", "F", "B"]);
        assert!(identify_scales(&tally, &scale).is_empty());

        let tally = tally_of(&scale, &["C", "D", "E", "G"]);
        assert!(identify_scales(&tally, &scale).is_empty());
    }

    #[test]
    fn test_modal_scale_uses_parent_pentatonics() {
        let scale = Scale::modal("C", Mode::Dorian).unwrap();
        assert_eq!(scale.tonic(), "D");
        let tally = tally_of(&scale, &["D", "E", "F", "G", "A", "B", "C"]);
        let labels: Vec<String> = identify_scales(&tally, &scale)
            .into_iter()
            .map(|m| m.label)
            .collect();
        assert_eq!(
            labels,
            vec!["C Major Pentatonic", "A Minor Pentatonic", "D Dorian Scale"]
        );
    }

    #[test]
    fn test_chromatic_key_has_no_scales() {
        let scale = Scale::chromatic();
        let tally = tally_of(&scale, &["C", "D", "E", "F", "G", "A", "B"]);
        assert!(identify_scales(&tally, &scale).is_empty());
    }
}
