use crate::analysis::tally::{Tally, TallyEntry};
use crate::types::card::Card;
use std::fmt;

/// The twelve interval classes, by semitone distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntervalClass {
    Unison,
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    Tritone,
    PerfectFifth,
    MinorSixth,
    MajorSixth,
    MinorSeventh,
    MajorSeventh,
}

impl IntervalClass {
    pub const ALL: [IntervalClass; 12] = [
        IntervalClass::Unison,
        IntervalClass::MinorSecond,
        IntervalClass::MajorSecond,
        IntervalClass::MinorThird,
        IntervalClass::MajorThird,
        IntervalClass::PerfectFourth,
        IntervalClass::Tritone,
        IntervalClass::PerfectFifth,
        IntervalClass::MinorSixth,
        IntervalClass::MajorSixth,
        IntervalClass::MinorSeventh,
        IntervalClass::MajorSeventh,
    ];

    pub fn from_semitones(semitones: u8) -> Option<IntervalClass> {
        Self::ALL.get(semitones as usize).copied()
    }

    pub fn semitones(&self) -> u8 {
        *self as u8
    }

    /// Short scale-degree symbol ("b3", "P4", "#4", ...)
    pub fn symbol(&self) -> &'static str {
        match self {
            IntervalClass::Unison => "1",
            IntervalClass::MinorSecond => "b2",
            IntervalClass::MajorSecond => "2",
            IntervalClass::MinorThird => "b3",
            IntervalClass::MajorThird => "3",
            IntervalClass::PerfectFourth => "P4",
            IntervalClass::Tritone => "#4",
            IntervalClass::PerfectFifth => "5",
            IntervalClass::MinorSixth => "b6",
            IntervalClass::MajorSixth => "6",
            IntervalClass::MinorSeventh => "b7",
            IntervalClass::MajorSeventh => "7",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntervalClass::Unison => "unison",
            IntervalClass::MinorSecond => "minor 2nd",
            IntervalClass::MajorSecond => "major 2nd",
            IntervalClass::MinorThird => "minor 3rd",
            IntervalClass::MajorThird => "major 3rd",
            IntervalClass::PerfectFourth => "perfect 4th",
            IntervalClass::Tritone => "tritone",
            IntervalClass::PerfectFifth => "perfect 5th",
            IntervalClass::MinorSixth => "minor 6th",
            IntervalClass::MajorSixth => "major 6th",
            IntervalClass::MinorSeventh => "minor 7th",
            IntervalClass::MajorSeventh => "major 7th",
        }
    }
}

impl fmt::Display for IntervalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One pair of held notes, in the order the pair was found
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalPair {
    pub from: String,
    pub to: String,
}

/// Every pair of held notes at one interval class
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalMatch {
    pub interval: IntervalClass,
    pub pairs: Vec<IntervalPair>,
    /// Sum over the pairs of the smaller card count of the two notes
    pub weight: usize,
    /// Cards of every note taking part in a pair
    pub cards: Vec<Card>,
}

impl IntervalMatch {
    pub fn label(&self) -> String {
        self.interval.name().to_string()
    }
}

/// Find every interval between the held notes.
///
/// Distances are semitones on the chromatic cycle, counted up from whichever
/// note of the pair sits lower in C-to-B order, so the key never matters.
/// Every pair is found once from each side and both land in the same class.
/// Results are sorted by pair count, most first; ties keep ascending order.
pub fn identify_intervals(tally: &Tally) -> Vec<IntervalMatch> {
    let occupied: Vec<&TallyEntry> = tally.iter().filter(|e| !e.is_empty()).collect();

    let mut buckets: Vec<IntervalMatch> = IntervalClass::ALL
        .iter()
        .map(|&interval| IntervalMatch {
            interval,
            pairs: Vec::new(),
            weight: 0,
            cards: Vec::new(),
        })
        .collect();

    for (i, from) in occupied.iter().enumerate() {
        for (j, to) in occupied.iter().enumerate() {
            if i == j {
                continue;
            }
            let (low, high) = if from.pitch_class <= to.pitch_class {
                (from.pitch_class, to.pitch_class)
            } else {
                (to.pitch_class, from.pitch_class)
            };
            let distance = low.interval_to(high);
            let bucket = &mut buckets[distance as usize];
            bucket.pairs.push(IntervalPair {
                from: from.name.clone(),
                to: to.name.clone(),
            });
            bucket.weight += from.count().min(to.count());
            for card in from.cards.iter().chain(to.cards.iter()) {
                if !bucket.cards.contains(card) {
                    bucket.cards.push(card.clone());
                }
            }
        }
    }

    let mut found: Vec<IntervalMatch> = buckets
        .into_iter()
        .filter(|b| !b.pairs.is_empty())
        .collect();
    found.sort_by(|a, b| b.pairs.len().cmp(&a.pairs.len()));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tally::consolidate_octaves;
    use crate::types::key::Scale;

    fn tally_of(key: &str, notes: &[(&str, u8)]) -> Tally {
        let scale = Scale::parse(key).unwrap();
        let cards: Vec<Card> = notes.iter().map(|(r, o)| Card::new(*r, *o)).collect();
        consolidate_octaves(&cards, scale.notes())
    }

    #[test]
    fn test_interval_class_lookup() {
        assert_eq!(IntervalClass::from_semitones(7), Some(IntervalClass::PerfectFifth));
        assert_eq!(IntervalClass::from_semitones(12), None);
        assert_eq!(IntervalClass::MinorThird.semitones(), 3);
        assert_eq!(IntervalClass::Tritone.symbol(), "#4");
    }

    #[test]
    fn test_two_notes_record_both_directions() {
        let tally = tally_of("C", &[("G", 3), ("C", 4)]);
        let intervals = identify_intervals(&tally);

        assert_eq!(intervals.len(), 1);
        let fifth = &intervals[0];
        assert_eq!(fifth.interval, IntervalClass::PerfectFifth);
        assert_eq!(fifth.pairs.len(), 2);
        assert_eq!(fifth.pairs[0].from, "C");
        assert_eq!(fifth.pairs[0].to, "G");
        assert_eq!(fifth.pairs[1].from, "G");
        assert_eq!(fifth.pairs[1].to, "C");
        assert_eq!(fifth.weight, 2);
    }

    #[test]
    fn test_distance_ignores_key_order() {
        // G major lists G before F#, but F# is the lower slot
        let tally = tally_of("G", &[("G", 4), ("F#", 4)]);
        let intervals = identify_intervals(&tally);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].interval, IntervalClass::MinorSecond);
    }

    #[test]
    fn test_tritone_lands_in_one_class() {
        let tally = tally_of("C", &[("F", 2), ("B", 3)]);
        let intervals = identify_intervals(&tally);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].interval, IntervalClass::Tritone);
        assert_eq!(intervals[0].pairs.len(), 2);
        assert_eq!(intervals[0].weight, 2);
        assert_eq!(intervals[0].cards.len(), 2);
    }

    #[test]
    fn test_weight_uses_smaller_count() {
        let tally = tally_of("C", &[("C", 1), ("C", 2), ("C", 3), ("E", 1)]);
        let intervals = identify_intervals(&tally);
        let third = intervals
            .iter()
            .find(|m| m.interval == IntervalClass::MajorThird)
            .unwrap();
        // min(3, 1) once for each direction of the pair
        assert_eq!(third.weight, 2);
        assert_eq!(third.cards.len(), 4);
    }

    #[test]
    fn test_sorted_by_pair_count() {
        let tally = tally_of("C", &[("C", 4), ("E", 4), ("G", 4)]);
        let intervals = identify_intervals(&tally);
        let classes: Vec<IntervalClass> = intervals.iter().map(|m| m.interval).collect();
        assert_eq!(
            classes,
            vec![
                IntervalClass::MinorThird,
                IntervalClass::MajorThird,
                IntervalClass::PerfectFifth
            ]
        );
        assert!(intervals.iter().all(|m| m.pairs.len() == 2));

        let tally = tally_of("C", &[("C", 4), ("D", 4), ("E", 4)]);
        let intervals = identify_intervals(&tally);
        assert_eq!(intervals[0].interval, IntervalClass::MajorSecond);
        assert_eq!(intervals[0].pairs.len(), 4);
    }

    #[test]
    fn test_single_note_and_empty_hands() {
        assert!(identify_intervals(&tally_of("C", &[("C", 4)])).is_empty());
        assert!(identify_intervals(&tally_of("C", &[("C", 4), ("C", 5)])).is_empty());
        assert!(identify_intervals(&tally_of("C", &[])).is_empty());
    }
}
