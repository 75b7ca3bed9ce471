use thiserror::Error;

/// Errors raised by the theory engine and the game session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("Unknown key: {0} is not a standard major key")]
    UnknownKey(String),

    #[error("Pitch class not found for note name: {0}")]
    PitchClassNotFound(String),

    #[error("Pitch class must be 0-11, got {0}")]
    InvalidPitchClass(u8),

    #[error("Mode number must be 1-7, got {0}")]
    InvalidMode(u8),

    #[error("Unknown harmonic structure: {0}")]
    UnknownStructure(String),

    #[error("Mode tables need a seven-note scale, got {0} notes")]
    NotHeptatonic(usize),

    #[error("Unknown selection strategy: {0}")]
    UnknownStrategy(String),

    #[error("The deck is empty")]
    EmptyDeck,

    #[error("Cannot select more than {0} cards")]
    SelectionFull(usize),

    #[error("No card at position {index} (hand has {len} cards)")]
    CardIndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, TheoryError>;
