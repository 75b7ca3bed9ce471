// tonecard-core/src/types/mod.rs

pub mod card;
pub mod key;
pub mod pitch;

pub use card::{Card, Deck};
pub use key::{
    all_major_keys, build_circle_of_fifths, build_major_scale, build_modal_scale, key_signature,
    AccidentalKind, KeySignature, Mode, Scale, ScaleKind,
};
pub use pitch::{
    chromatic_scale, chromatic_spellings, find_pitch_class_index, frequency_of_height,
    resolve_enharmonic_name, semitones_above_c, PitchClass,
};
