//! Property-based tests for hand analysis.
//!
//! Random hands drawn from the chromatic slots: the analyzer must never
//! panic, intervals must come in pairs, and the octaves the cards sit in must
//! not change which chords are found.

use proptest::prelude::*;

use tonecard_core::analysis::{analyze_hand, GameContext};
use tonecard_core::scoring::{score_hand, ScoreTable, SelectionStrategy};
use tonecard_core::types::{chromatic_spellings, Card};

/// Cards spelled any way the chromatic key accepts, octaves 1..=7
fn arbitrary_hand() -> impl Strategy<Value = Vec<Card>> {
    let spellings = chromatic_spellings();
    prop::collection::vec(
        (prop::sample::select(spellings), 1u8..=7)
            .prop_map(|(rank, octave)| Card::new(rank, octave)),
        0..=7,
    )
}

proptest! {
    #[test]
    fn analysis_never_panics(hand in arbitrary_hand()) {
        let context = GameContext::from_key("chromatic").unwrap();
        let analysis = analyze_hand(&hand, &context);
        let _ = score_hand(&analysis, SelectionStrategy::HighestScore, &ScoreTable::default());
    }

    #[test]
    fn interval_pairs_are_even(hand in arbitrary_hand()) {
        let context = GameContext::from_key("chromatic").unwrap();
        let analysis = analyze_hand(&hand, &context);
        for found in analysis.intervals.iter().flatten() {
            prop_assert_eq!(found.pairs.len() % 2, 0, "{}", found.label());
        }
    }

    #[test]
    fn octaves_do_not_change_chords(hand in arbitrary_hand()) {
        let context = GameContext::from_key("chromatic").unwrap();
        let lowered: Vec<Card> = hand
            .iter()
            .map(|c| Card::new(c.rank.clone(), 1 + (c.octave - 1) / 2))
            .collect();

        let original = analyze_hand(&hand, &context);
        let moved = analyze_hand(&lowered, &context);

        let triads = |a: &tonecard_core::HandAnalysis| -> Vec<String> {
            a.triads.iter().flatten().map(|t| t.label()).collect()
        };
        let sevenths = |a: &tonecard_core::HandAnalysis| -> Vec<String> {
            a.sevenths.iter().flatten().map(|s| s.label()).collect()
        };
        prop_assert_eq!(triads(&original), triads(&moved));
        prop_assert_eq!(sevenths(&original), sevenths(&moved));
    }

    #[test]
    fn score_is_zero_only_without_category(hand in arbitrary_hand()) {
        let context = GameContext::from_key("chromatic").unwrap();
        let analysis = analyze_hand(&hand, &context);
        let score = score_hand(&analysis, SelectionStrategy::LastDeclared, &ScoreTable::default());
        prop_assert_eq!(score.score == 0, score.category.is_none());
    }
}
