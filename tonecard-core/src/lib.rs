//! # Tonecard Core
//!
//! Harmonic analysis engine for a note-card game. A hand of cards, each a
//! note name in an octave, is grouped by the active key's notes and searched
//! for intervals, triads, seventh chords and scales; the result is reduced to
//! a single scored hand type.
//!
//! ## Features
//!
//! - **serde**: Serialize analysis results and deserialize settings
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//! - **colored**: Enable colored terminal output (disabled in WASM)
//!
//! ## Example
//!
//! ```
//! use tonecard_core::{analyze_hand, score_hand, Card, GameContext, ScoreTable, SelectionStrategy};
//!
//! let context = GameContext::from_key("C").unwrap();
//! let hand = vec![Card::new("C", 4), Card::new("E", 4), Card::new("G", 4)];
//! let analysis = analyze_hand(&hand, &context);
//! let score = score_hand(&analysis, SelectionStrategy::default(), &ScoreTable::default());
//! assert_eq!(score.labels, vec!["C Major Triad"]);
//! ```

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod presentation;
pub mod scoring;
pub mod session;
pub mod types;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use analysis::{analyze_hand, GameContext, HandAnalysis, OctaveKind};
pub use catalog::{
    build_mode_table, build_mode_table_for, catalog, create_harmonic_structure, Catalog, ModeEntry,
    Structure,
};
pub use error::{Result, TheoryError};
pub use presentation::{performance_sequence, HandReport, PerformedNote, Presenter};
pub use scoring::{
    calculate_score, choose_top_category, score_hand, Category, HandScore, ScoreTable,
    SelectionStrategy,
};
pub use session::{GameSession, PlayOutcome, SessionSettings};
pub use types::{Card, Deck, Mode, PitchClass, Scale};
