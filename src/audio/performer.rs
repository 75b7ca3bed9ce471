//! Background thread that sounds played hands.
//!
//! The REPL sends a [`Performance`] and moves on; the performer owns the
//! audio stream and plays the notes one after another, each overlapping the
//! next, then lets them ring for the configured length.

use crate::audio::player::AudioPlayer;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tonecard_core::PerformedNote;

/// Timing and level for performances
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSettings {
    /// How long the last note rings before everything stops
    pub note_length: Duration,
    /// Gap between note onsets
    pub stagger: Duration,
    pub volume: f32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        PerformanceSettings {
            note_length: Duration::from_millis(600),
            stagger: Duration::from_millis(120),
            volume: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub notes: Vec<PerformedNote>,
}

impl Performance {
    /// Onset of each note relative to the start, and when the whole thing ends
    pub fn timeline(&self, settings: &PerformanceSettings) -> (Vec<Duration>, Duration) {
        let onsets: Vec<Duration> = (0..self.notes.len())
            .map(|i| settings.stagger * i as u32)
            .collect();
        let end = onsets.last().copied().unwrap_or_default() + settings.note_length;
        (onsets, end)
    }
}

enum PerformerCommand {
    Perform(Performance),
    Shutdown,
}

/// Things the performer reports back to the REPL
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// No output device; performances will be dropped
    Unavailable(String),
}

/// Handle to the performer thread
pub struct Performer {
    command_tx: Sender<PerformerCommand>,
    thread: Option<JoinHandle<()>>,
}

impl Performer {
    /// Spawn the performer. Audio failures are reported on the returned receiver.
    pub fn spawn(settings: PerformanceSettings) -> (Self, Receiver<AudioEvent>) {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let thread = thread::spawn(move || run(settings, command_rx, event_tx));

        (
            Performer {
                command_tx,
                thread: Some(thread),
            },
            event_rx,
        )
    }

    /// Queue a performance; never waits for it to play
    pub fn perform(&self, notes: &[PerformedNote]) {
        if notes.is_empty() {
            return;
        }
        let performance = Performance {
            notes: notes.to_vec(),
        };
        if self.command_tx.send(PerformerCommand::Perform(performance)).is_err() {
            log::warn!(target: "audio", "performer thread has stopped");
        }
    }
}

impl Drop for Performer {
    fn drop(&mut self) {
        let _ = self.command_tx.send(PerformerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run(
    settings: PerformanceSettings,
    commands: Receiver<PerformerCommand>,
    events: Sender<AudioEvent>,
) {
    let player = match AudioPlayer::new(settings.volume).and_then(|p| p.play().map(|_| p)) {
        Ok(player) => Some(player),
        Err(e) => {
            log::warn!(target: "audio", "audio disabled: {}", e);
            let _ = events.send(AudioEvent::Unavailable(e.to_string()));
            None
        }
    };

    for command in commands.iter() {
        match command {
            PerformerCommand::Shutdown => break,
            PerformerCommand::Perform(performance) => {
                if let Some(player) = &player {
                    if let Err(e) = perform(player, &performance, &settings) {
                        log::warn!(target: "audio", "performance failed: {}", e);
                    }
                }
            }
        }
    }
}

fn perform(
    player: &AudioPlayer,
    performance: &Performance,
    settings: &PerformanceSettings,
) -> anyhow::Result<()> {
    log::debug!(target: "audio", "performing {} note(s)", performance.notes.len());
    let (onsets, end) = performance.timeline(settings);

    let mut elapsed = Duration::ZERO;
    for (note, onset) in performance.notes.iter().zip(onsets) {
        thread::sleep(onset.saturating_sub(elapsed));
        elapsed = onset;
        player.add_note(note.frequency)?;
    }
    thread::sleep(end.saturating_sub(elapsed));
    player.silence()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str, frequency: f32) -> PerformedNote {
        PerformedNote {
            name: name.to_string(),
            octave: 4,
            frequency,
        }
    }

    #[test]
    fn test_timeline_staggers_onsets() {
        let settings = PerformanceSettings {
            note_length: Duration::from_millis(500),
            stagger: Duration::from_millis(100),
            volume: 0.2,
        };
        let performance = Performance {
            notes: vec![note("C", 261.63), note("E", 329.63), note("G", 392.0)],
        };
        let (onsets, end) = performance.timeline(&settings);
        assert_eq!(
            onsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(200)
            ]
        );
        assert_eq!(end, Duration::from_millis(700));
    }

    #[test]
    fn test_empty_timeline() {
        let performance = Performance { notes: vec![] };
        let (onsets, end) = performance.timeline(&PerformanceSettings::default());
        assert!(onsets.is_empty());
        assert_eq!(end, Duration::from_millis(600));
    }

    #[test]
    fn test_performer_shuts_down_cleanly() {
        // Works with or without an audio device
        let (performer, _events) = Performer::spawn(PerformanceSettings {
            note_length: Duration::from_millis(1),
            stagger: Duration::from_millis(1),
            volume: 0.0,
        });
        performer.perform(&[note("A", 440.0)]);
        drop(performer);
    }
}
