use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tonecard_core::{Scale, ScoreTable, SelectionStrategy, SessionSettings};

use crate::audio::PerformanceSettings;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    game: GameConfig,
    #[serde(default)]
    scoring: ScoringConfig,
    #[serde(default)]
    audio: AudioConfig,
}

#[derive(Deserialize, Default)]
struct GameConfig {
    key: Option<String>,
    hand_size: Option<usize>,
    max_selected: Option<usize>,
    octaves: Option<u8>,
    strategy: Option<String>,
}

#[derive(Deserialize, Default)]
struct ScoringConfig {
    highnote: Option<u32>,
    intervals: Option<u32>,
    octaves: Option<u32>,
    stacked: Option<u32>,
    triads: Option<u32>,
    sevenths: Option<u32>,
    scales: Option<u32>,
    flush: Option<u32>,
    bonus: Option<u32>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    enabled: Option<bool>,
    note_ms: Option<u64>,
    stagger_ms: Option<u64>,
    volume: Option<f32>,
}

pub struct Config {
    game: GameConfig,
    scoring: ScoringConfig,
    audio: AudioConfig,
}

impl Config {
    /// Embedded defaults overlaid with `~/.config/tonecard/config.toml`
    pub fn load() -> Self {
        let user = user_config_path().filter(|path| path.exists()).and_then(|path| {
            match std::fs::read_to_string(&path) {
                Ok(contents) => Some((path, contents)),
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                    None
                }
            }
        });

        match user {
            Some((path, contents)) => {
                log::debug!(target: "config", "loading {}", path.display());
                Self::load_from(Some(&contents))
            }
            None => Self::load_from(None),
        }
    }

    /// Embedded defaults overlaid with the given user file contents
    pub fn load_from(user: Option<&str>) -> Self {
        let mut base = match toml::from_str::<ConfigFile>(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {}", e);
                ConfigFile::default()
            }
        };

        if let Some(contents) = user {
            match toml::from_str::<ConfigFile>(contents) {
                Ok(user) => {
                    merge_game(&mut base.game, user.game);
                    merge_scoring(&mut base.scoring, user.scoring);
                    merge_audio(&mut base.audio, user.audio);
                }
                Err(e) => log::warn!(target: "config", "ignoring malformed config: {}", e),
            }
        }

        Config {
            game: base.game,
            scoring: base.scoring,
            audio: base.audio,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        let fallback = SessionSettings::default();
        SessionSettings {
            hand_size: self.game.hand_size.unwrap_or(fallback.hand_size).max(1),
            max_selected: self.game.max_selected.unwrap_or(fallback.max_selected).max(1),
            octaves: self.game.octaves.unwrap_or(fallback.octaves).clamp(1, 8),
        }
    }

    /// The starting key. An unparseable key falls back to A major.
    pub fn default_scale(&self) -> Scale {
        let name = self.game.key.as_deref().unwrap_or("A");
        Scale::parse(name)
            .or_else(|e| {
                log::warn!(target: "config", "unknown key {:?} ({}), using A", name, e);
                Scale::major("A")
            })
            .unwrap_or_else(|_| Scale::chromatic())
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.game
            .strategy
            .as_deref()
            .and_then(|s| match s.parse() {
                Ok(strategy) => Some(strategy),
                Err(e) => {
                    log::warn!(target: "config", "{}, using the default strategy", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn score_table(&self) -> ScoreTable {
        let fallback = ScoreTable::default();
        let s = &self.scoring;
        ScoreTable {
            highnote: s.highnote.unwrap_or(fallback.highnote),
            intervals: s.intervals.unwrap_or(fallback.intervals),
            octaves: s.octaves.unwrap_or(fallback.octaves),
            stacked: s.stacked.unwrap_or(fallback.stacked),
            triads: s.triads.unwrap_or(fallback.triads),
            sevenths: s.sevenths.unwrap_or(fallback.sevenths),
            scales: s.scales.unwrap_or(fallback.scales),
            flush: s.flush.unwrap_or(fallback.flush),
            bonus: s.bonus.unwrap_or(fallback.bonus),
        }
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio.enabled.unwrap_or(true)
    }

    /// Note timing and level; volume is clamped to 0..=1
    pub fn performance_settings(&self) -> PerformanceSettings {
        let fallback = PerformanceSettings::default();
        PerformanceSettings {
            note_length: self
                .audio
                .note_ms
                .map(Duration::from_millis)
                .unwrap_or(fallback.note_length),
            stagger: self
                .audio
                .stagger_ms
                .map(Duration::from_millis)
                .unwrap_or(fallback.stagger),
            volume: self.audio.volume.unwrap_or(fallback.volume).clamp(0.0, 1.0),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tonecard").join("config.toml"))
}

fn merge_game(base: &mut GameConfig, user: GameConfig) {
    if user.key.is_some() {
        base.key = user.key;
    }
    if user.hand_size.is_some() {
        base.hand_size = user.hand_size;
    }
    if user.max_selected.is_some() {
        base.max_selected = user.max_selected;
    }
    if user.octaves.is_some() {
        base.octaves = user.octaves;
    }
    if user.strategy.is_some() {
        base.strategy = user.strategy;
    }
}

fn merge_scoring(base: &mut ScoringConfig, user: ScoringConfig) {
    let fields = [
        (&mut base.highnote, user.highnote),
        (&mut base.intervals, user.intervals),
        (&mut base.octaves, user.octaves),
        (&mut base.stacked, user.stacked),
        (&mut base.triads, user.triads),
        (&mut base.sevenths, user.sevenths),
        (&mut base.scales, user.scales),
        (&mut base.flush, user.flush),
        (&mut base.bonus, user.bonus),
    ];
    for (field, value) in fields {
        if value.is_some() {
            *field = value;
        }
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.enabled.is_some() {
        base.enabled = user.enabled;
    }
    if user.note_ms.is_some() {
        base.note_ms = user.note_ms;
    }
    if user.stagger_ms.is_some() {
        base.stagger_ms = user.stagger_ms;
    }
    if user.volume.is_some() {
        base.volume = user.volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_builtin_defaults() {
        let config = Config::load_from(None);
        assert_eq!(config.session_settings(), SessionSettings::default());
        assert_eq!(config.score_table(), ScoreTable::default());
        assert_eq!(config.strategy(), SelectionStrategy::LastDeclared);
        assert_eq!(config.default_scale().name(), "A Major");
        assert!(config.audio_enabled());
        assert_eq!(config.performance_settings(), PerformanceSettings::default());
    }

    #[test]
    fn user_fields_override_one_at_a_time() {
        let config = Config::load_from(Some(
            r#"
            [game]
            key = "D dorian"
            strategy = "highest-score"

            [scoring]
            triads = 50
            "#,
        ));
        assert_eq!(config.default_scale().name(), "D Dorian");
        assert_eq!(config.strategy(), SelectionStrategy::HighestScore);
        assert_eq!(config.score_table().triads, 50);
        assert_eq!(config.score_table().scales, 7);
        assert_eq!(config.session_settings().hand_size, 10);
    }

    #[test]
    fn malformed_user_config_is_ignored() {
        let config = Config::load_from(Some("[game\nkey = "));
        assert_eq!(config.default_scale().name(), "A Major");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::load_from(Some(
            r#"
            [game]
            key = "H"
            strategy = "random"
            hand_size = 0

            [audio]
            volume = 4.0
            "#,
        ));
        assert_eq!(config.default_scale().name(), "A Major");
        assert_eq!(config.strategy(), SelectionStrategy::LastDeclared);
        assert_eq!(config.session_settings().hand_size, 1);
        assert_eq!(config.performance_settings().volume, 1.0);
    }
}
