//! Game state: deck, hand and selection.
//!
//! A [`GameSession`] is a value. Every operation hands back the session that
//! replaces it, so a play (analyze, score, discard, refill) happens in one step
//! and a failed operation leaves the caller's session untouched.

use crate::analysis::{analyze_hand, GameContext, HandAnalysis};
use crate::error::{Result, TheoryError};
use crate::scoring::{score_hand, HandScore, ScoreTable, SelectionStrategy};
use crate::types::card::{Card, Deck};
use crate::types::key::Scale;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionSettings {
    /// Cards dealt at the start and after a key change
    pub hand_size: usize,
    pub max_selected: usize,
    /// The deck holds every scale note in octaves 1 through this
    pub octaves: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            hand_size: 10,
            max_selected: 7,
            octaves: 7,
        }
    }
}

/// What one play produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub played: Vec<Card>,
    pub analysis: HandAnalysis,
    pub score: HandScore,
    /// Replacement cards drawn into the hand
    pub drawn: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    context: GameContext,
    settings: SessionSettings,
    deck: Deck,
    hand: Vec<Card>,
    selected: Vec<Card>,
}

impl GameSession {
    /// Build the deck for `scale` and deal a full hand
    pub fn new<R: Rng + ?Sized>(scale: Scale, settings: SessionSettings, rng: &mut R) -> Self {
        let deck = Deck::build(&scale, settings.octaves);
        let session = GameSession {
            context: GameContext::new(scale),
            settings,
            deck,
            hand: Vec::new(),
            selected: Vec::new(),
        };
        session.fill_hand(rng)
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn scale(&self) -> &Scale {
        &self.context.scale
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Selected cards in the order they were picked
    pub fn selected(&self) -> &[Card] {
        &self.selected
    }

    pub fn is_selected(&self, card: &Card) -> bool {
        self.selected.contains(card)
    }

    /// Draw up to `count` cards into the hand, stopping early if the deck runs out
    pub fn draw<R: Rng + ?Sized>(mut self, count: usize, rng: &mut R) -> (Self, Vec<Card>) {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.deck.draw(rng) {
                Ok(card) => drawn.push(card),
                Err(e) => {
                    log::info!("{} after drawing {} of {}", e, drawn.len(), count);
                    break;
                }
            }
        }
        self.hand.extend(drawn.iter().cloned());
        (self, drawn)
    }

    /// Top the hand up to the configured hand size
    pub fn fill_hand<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let missing = self.settings.hand_size.saturating_sub(self.hand.len());
        self.draw(missing, rng).0
    }

    /// Select or deselect the card at `index` in the hand.
    ///
    /// Deselecting always succeeds; selecting fails once `max_selected` cards
    /// are already chosen.
    pub fn toggle_select(&self, index: usize) -> Result<Self> {
        let card = self
            .hand
            .get(index)
            .ok_or(TheoryError::CardIndexOutOfRange {
                index,
                len: self.hand.len(),
            })?;

        let mut next = self.clone();
        if let Some(position) = next.selected.iter().position(|c| c == card) {
            next.selected.remove(position);
        } else if next.selected.len() >= next.settings.max_selected {
            return Err(TheoryError::SelectionFull(next.settings.max_selected));
        } else {
            next.selected.push(card.clone());
        }
        Ok(next)
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected.clear();
        self
    }

    /// Analyze and score the selection, discard it and draw as many cards as were played.
    ///
    /// An empty selection scores nothing and leaves the hand as it was.
    pub fn play<R: Rng + ?Sized>(
        mut self,
        rng: &mut R,
        strategy: SelectionStrategy,
        table: &ScoreTable,
    ) -> (Self, PlayOutcome) {
        let played = std::mem::take(&mut self.selected);
        let analysis = analyze_hand(&played, &self.context);
        let score = score_hand(&analysis, strategy, table);

        self.hand.retain(|card| !played.contains(card));
        let (next, drawn) = self.draw(played.len(), rng);

        log::debug!(
            "played {} card(s) for {} point(s), drew {}",
            played.len(),
            score.score,
            drawn.len()
        );
        (
            next,
            PlayOutcome {
                played,
                analysis,
                score,
                drawn,
            },
        )
    }

    /// Switch to a new key: fresh deck, fresh hand
    pub fn change_key<R: Rng + ?Sized>(self, scale: Scale, rng: &mut R) -> Self {
        log::info!("changing key to {}", scale.name());
        GameSession::new(scale, self.settings, rng)
    }

    /// Order the hand from lowest to highest pitch
    pub fn sort_hand(mut self) -> Self {
        self.hand.sort_by_key(|card| card.pitch_height());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(key: &str, settings: SessionSettings) -> (GameSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let session = GameSession::new(Scale::parse(key).unwrap(), settings, &mut rng);
        (session, rng)
    }

    #[test]
    fn test_new_deals_full_hand() {
        let (session, _) = session("A", SessionSettings::default());
        assert_eq!(session.hand().len(), 10);
        assert_eq!(session.deck().len(), 49 - 10);
        assert!(session.selected().is_empty());
        assert_eq!(session.context().key_label, "A Major");
    }

    #[test]
    fn test_small_deck_deals_what_it_has() {
        let settings = SessionSettings {
            hand_size: 10,
            max_selected: 7,
            octaves: 1,
        };
        let (session, _) = session("C", settings);
        assert_eq!(session.hand().len(), 7);
        assert!(session.deck().is_empty());
    }

    #[test]
    fn test_toggle_select_limits() {
        let settings = SessionSettings {
            max_selected: 2,
            ..SessionSettings::default()
        };
        let (session, _) = session("C", settings);

        let session = session.toggle_select(0).unwrap();
        let session = session.toggle_select(1).unwrap();
        assert_eq!(session.selected().len(), 2);
        assert_eq!(session.toggle_select(2), Err(TheoryError::SelectionFull(2)));

        // deselecting is always allowed
        let session = session.toggle_select(0).unwrap();
        assert_eq!(session.selected(), &[session.hand()[1].clone()]);

        assert_eq!(
            session.toggle_select(99),
            Err(TheoryError::CardIndexOutOfRange { index: 99, len: 10 })
        );
        assert!(session.clear_selection().selected().is_empty());
    }

    #[test]
    fn test_play_replaces_played_cards() {
        let (session, mut rng) = session("C", SessionSettings::default());
        let session = session.toggle_select(0).unwrap().toggle_select(3).unwrap();
        let chosen = session.selected().to_vec();
        let deck_before = session.deck().len();

        let (session, outcome) =
            session.play(&mut rng, SelectionStrategy::LastDeclared, &ScoreTable::default());

        assert_eq!(outcome.played, chosen);
        assert_eq!(outcome.drawn.len(), 2);
        assert!(outcome.score.category.is_some());
        assert!(outcome.score.score > 0);
        assert_eq!(session.hand().len(), 10);
        assert_eq!(session.deck().len(), deck_before - 2);
        assert!(session.selected().is_empty());
        for card in &chosen {
            assert!(!session.hand().contains(card));
        }
    }

    #[test]
    fn test_empty_play_changes_nothing() {
        let (session, mut rng) = session("C", SessionSettings::default());
        let hand = session.hand().to_vec();
        let (session, outcome) =
            session.play(&mut rng, SelectionStrategy::LastDeclared, &ScoreTable::default());
        assert!(outcome.analysis.is_empty());
        assert_eq!(outcome.score.category, None::<Category>);
        assert_eq!(outcome.score.score, 0);
        assert_eq!(session.hand(), hand.as_slice());
    }

    #[test]
    fn test_change_key_redeals() {
        let (session, mut rng) = session("C", SessionSettings::default());
        let session = session.toggle_select(0).unwrap();
        let session = session.change_key(Scale::chromatic(), &mut rng);
        assert_eq!(session.scale().name(), "Chromatic");
        assert_eq!(session.deck().len(), 84 - 10);
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_sort_hand() {
        let (session, _) = session("C", SessionSettings::default());
        let sorted = session.sort_hand();
        let heights: Vec<Option<i32>> = sorted.hand().iter().map(Card::pitch_height).collect();
        let mut expected = heights.clone();
        expected.sort();
        assert_eq!(heights, expected);
    }
}
