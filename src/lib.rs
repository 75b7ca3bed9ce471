//! # Tonecard
//!
//! Terminal front end for the Tonecard note-card game. The harmonic analysis
//! and scoring live in `tonecard-core`; this crate adds the interactive shell,
//! configuration and audio.
//!
//! ## Modules
//!
//! - `audio`: A cpal sine mixer and the background thread that sounds played hands.
//! - `commands`: The prefix-matched command registry and every REPL command.
//! - `config`: Embedded defaults overlaid with the user's `config.toml`.
//! - `presenter`: Prints hand reports and forwards performances to the audio thread.
//! - `repl`: The Read-Eval-Print Loop tying input, commands and audio events together.

pub mod audio;
pub mod commands;
pub mod config;
pub mod presenter;
pub mod repl;

// Re-export commonly used types and functions for convenience
pub use crate::config::Config;
pub use crate::repl::start;
pub use tonecard_core::{analyze_hand, score_hand, Card, GameContext, GameSession, Scale};
