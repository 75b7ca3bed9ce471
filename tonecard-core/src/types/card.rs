use crate::error::{Result, TheoryError};
use crate::types::key::Scale;
use crate::types::pitch::{frequency_of_height, semitones_above_c, PitchClass};
use rand::Rng;
use std::fmt;

/// A playing card: a note name and the octave it sounds in.
///
/// Cards never change after they are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub rank: String,
    pub octave: u8,
}

impl Card {
    pub fn new(rank: impl Into<String>, octave: u8) -> Self {
        Card {
            rank: rank.into(),
            octave,
        }
    }

    /// Pitch class of the rank, if the rank is a recognizable note name
    pub fn pitch_class(&self) -> Result<PitchClass> {
        PitchClass::from_name(&self.rank)
    }

    /// Absolute pitch in semitones above C0, used to order cards by height.
    /// Spelled, not wrapped: Cb4 sits just below C4 and B#3 equals C4.
    pub fn pitch_height(&self) -> Option<i32> {
        semitones_above_c(&self.rank)
            .ok()
            .map(|offset| self.octave as i32 * 12 + offset as i32)
    }

    pub fn frequency(&self) -> Option<f32> {
        self.pitch_height().map(frequency_of_height)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.octave)
    }
}

/// Cards left to draw. Drawing removes a random card; cards are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// One card per scale note in each octave from 1 to `octaves`
    pub fn build(scale: &Scale, octaves: u8) -> Self {
        let cards = (1..=octaves)
            .flat_map(|octave| {
                scale
                    .notes()
                    .iter()
                    .map(move |note| Card::new(note.clone(), octave))
            })
            .collect();
        Deck { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Remove and return a random card
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card> {
        if self.cards.is_empty() {
            return Err(TheoryError::EmptyDeck);
        }
        let index = rng.gen_range(0..self.cards.len());
        Ok(self.cards.remove(index))
    }
}
