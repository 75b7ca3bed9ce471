use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

/// One sounding sine tone
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub frequency: f32,
    phase: f32,
}

impl Voice {
    pub fn new(frequency: f32) -> Self {
        Voice {
            frequency,
            phase: 0.0,
        }
    }
}

/// Shared between the output callback and the performer
#[derive(Debug, Clone, Default)]
pub struct AudioState {
    pub voices: Vec<Voice>,
}

/// A cpal output stream mixing any number of sine voices.
///
/// `Stream` is not `Send` on every platform, so the player lives on the
/// thread that created it.
pub struct AudioPlayer {
    stream: Stream,
    state: Arc<Mutex<AudioState>>,
}

impl AudioPlayer {
    pub fn new(volume: f32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();

        let state = Arc::new(Mutex::new(AudioState::default()));
        let shared = state.clone();
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, shared, volume)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, shared, volume)?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, shared, volume)?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        Ok(AudioPlayer { stream, state })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        state: Arc<Mutex<AudioState>>,
        volume: f32,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;

        let err_fn = |err| log::error!(target: "audio", "output stream error: {:?}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut state) = state.lock() else {
                        return;
                    };
                    let voice_count = state.voices.len().max(1) as f32;

                    for frame in data.chunks_mut(channels) {
                        let mut summed_value = 0.0;
                        for voice in state.voices.iter_mut() {
                            summed_value += Self::next_sine_value(
                                sample_rate,
                                &mut voice.phase,
                                voice.frequency,
                                volume,
                            );
                        }

                        let value: T = cpal::Sample::from_sample(summed_value / voice_count);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }

    fn with_state(&self, f: impl FnOnce(&mut AudioState)) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow!("Failed to lock audio state: {}", e))?;
        f(&mut state);
        Ok(())
    }

    /// Start sounding `frequency` alongside whatever is already playing
    pub fn add_note(&self, frequency: f32) -> Result<()> {
        self.with_state(|state| state.voices.push(Voice::new(frequency)))
    }

    pub fn silence(&self) -> Result<()> {
        self.with_state(|state| state.voices.clear())
    }

    /// Next sample of a sine at `frequency`; `phase` counts cycles and wraps at 1
    fn next_sine_value(sample_rate: f32, phase: &mut f32, frequency: f32, volume: f32) -> f32 {
        let value = volume * (2.0 * std::f32::consts::PI * *phase).sin();
        *phase = (*phase + frequency / sample_rate) % 1.0;
        value
    }

    pub fn play(&self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| anyhow!("Failed to play stream: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_player_creation() {
        // Fails on machines without an output device, which is fine
        match AudioPlayer::new(0.2) {
            Ok(player) => {
                assert!(player.add_note(440.0).is_ok());
                assert!(player.silence().is_ok());
            }
            Err(_) => println!("AudioPlayer creation failed - likely no audio device available"),
        }
    }

    #[test]
    fn test_sine_wave_generation() {
        let sample_rate = 44100.0;
        let mut phase = 0.0;

        for _ in 0..1000 {
            let value = AudioPlayer::next_sine_value(sample_rate, &mut phase, 440.0, 0.2);
            assert!(
                (-0.2..=0.2).contains(&value),
                "Sine value {} out of expected range",
                value
            );
        }
        assert!((0.0..1.0).contains(&phase));
    }

    #[test]
    fn test_sine_wave_periodicity() {
        let sample_rate = 44100.0;
        let frequency = 441.0;
        let samples_per_period = (sample_rate / frequency) as usize;

        let mut phase = 0.0;
        let first: Vec<f32> = (0..samples_per_period)
            .map(|_| AudioPlayer::next_sine_value(sample_rate, &mut phase, frequency, 0.2))
            .collect();
        let second: Vec<f32> = (0..samples_per_period)
            .map(|_| AudioPlayer::next_sine_value(sample_rate, &mut phase, frequency, 0.2))
            .collect();

        for (i, (a, b)) in first.iter().zip(second.iter()).enumerate() {
            assert!((a - b).abs() < 0.001, "Period mismatch at sample {}: {} vs {}", i, a, b);
        }
    }
}
