//! Procedural tone synthesis for sound cues.
//!
//! Tones are rendered into 16-bit mono PCM WAV buffers that macroquad can load
//! directly. Playback itself is only compiled with the `audio` feature.

use std::f32::consts::TAU;

use neon_snake_core::{Tone, Waveform};

/// Sample rate used for every synthesised tone.
pub const SAMPLE_RATE: u32 = 44_100;

const ATTACK_SECONDS: f32 = 0.005;
const PEAK_GAIN: f32 = 0.12;
const FLOOR_GAIN: f32 = 0.0001;
const RELEASE_TAIL_SECONDS: f32 = 0.02;

/// Renders `tone` into signed 16-bit samples at `sample_rate`.
///
/// The envelope ramps linearly to its peak over 5 ms, decays exponentially
/// to near silence by the end of the tone and is followed by a short tail.
#[must_use]
pub fn synthesize(tone: Tone, sample_rate: u32) -> Vec<i16> {
    if sample_rate == 0 {
        return Vec::new();
    }

    let duration = tone.duration.as_secs_f32();
    let total_seconds = duration + RELEASE_TAIL_SECONDS;
    let sample_count = (total_seconds * sample_rate as f32).round() as usize;
    let frequency = tone.frequency_hz as f32;

    (0..sample_count)
        .map(|index| {
            let t = index as f32 / sample_rate as f32;
            let phase = (t * frequency).fract();
            let value = oscillate(tone.waveform, phase) * envelope(t, duration);
            (value * i16::MAX as f32) as i16
        })
        .collect()
}

fn oscillate(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

fn envelope(t: f32, duration: f32) -> f32 {
    if t < ATTACK_SECONDS {
        return FLOOR_GAIN + (PEAK_GAIN - FLOOR_GAIN) * (t / ATTACK_SECONDS);
    }

    if t >= duration {
        return FLOOR_GAIN;
    }

    let decay = duration - ATTACK_SECONDS;
    if decay <= f32::EPSILON {
        return FLOOR_GAIN;
    }

    let progress = (t - ATTACK_SECONDS) / decay;
    PEAK_GAIN * (FLOOR_GAIN / PEAK_GAIN).powf(progress)
}

/// Wraps mono 16-bit samples in a RIFF/WAVE container.
#[must_use]
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let block_align: u16 = 2;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = (samples.len() * 2) as u32;
    let mut data = Vec::with_capacity(44 + samples.len() * 2);

    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&(36 + data_size).to_le_bytes());
    data.extend_from_slice(b"WAVE");

    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&sample_rate.to_le_bytes());
    data.extend_from_slice(&byte_rate.to_le_bytes());
    data.extend_from_slice(&block_align.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes());

    data.extend_from_slice(b"data");
    data.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

/// Synthesises `tone` and encodes it as a WAV buffer.
#[must_use]
pub fn tone_to_wav(tone: Tone) -> Vec<u8> {
    encode_wav(&synthesize(tone, SAMPLE_RATE), SAMPLE_RATE)
}

#[cfg(feature = "audio")]
pub(crate) use playback::SoundBank;

#[cfg(feature = "audio")]
mod playback {
    use std::collections::HashMap;

    use macroquad::audio::{load_sound_from_bytes, play_sound, PlaySoundParams, Sound};
    use neon_snake_core::{SoundCue, Tone};

    use super::tone_to_wav;

    /// Cache of loaded tones keyed by their descriptor.
    #[derive(Debug, Default)]
    pub(crate) struct SoundBank {
        sounds: HashMap<Tone, Sound>,
    }

    impl SoundBank {
        /// Loads every known cue up front so the first playback is not delayed.
        pub(crate) async fn preload() -> Self {
            let mut bank = Self::default();
            for cue in SoundCue::ALL {
                let _ = bank.load(cue.tone()).await;
            }
            bank
        }

        async fn load(&mut self, tone: Tone) -> Option<Sound> {
            if let Some(sound) = self.sounds.get(&tone) {
                return Some(*sound);
            }

            match load_sound_from_bytes(&tone_to_wav(tone)).await {
                Ok(sound) => {
                    let _ = self.sounds.insert(tone, sound);
                    Some(sound)
                }
                Err(error) => {
                    log::warn!("failed to load {} Hz tone: {error:?}", tone.frequency_hz);
                    None
                }
            }
        }

        /// Plays each tone once.
        pub(crate) async fn play(&mut self, tones: &[Tone]) {
            for tone in tones {
                if let Some(sound) = self.load(*tone).await {
                    play_sound(
                        sound,
                        PlaySoundParams {
                            looped: false,
                            volume: 1.0,
                        },
                    );
                }
            }
        }
    }
}
