pub mod performer;
pub mod player;

pub use performer::{AudioEvent, Performance, PerformanceSettings, Performer};
pub use player::AudioPlayer;
