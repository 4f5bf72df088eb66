//! Scenes: the full set of nodes sounding for one step.
//!
//! Every scene is the two-tone drone plus the layer for its label. Scenes are
//! built away from the audio callback (the noise layer allocates a two second
//! buffer) and handed to the engine whole.

use rand::Rng;

use super::envelope::GainEnvelope;
use super::filter::{LowPass, DEFAULT_Q};
use super::frame::StereoFrame;
use super::oscillator::{Oscillator, Waveform};
use super::sample_buffer::{LoopPlayer, SampleBuffer};
use super::voice::{Source, Voice};
use crate::audio_api::SoundLabel;

/// (frequency Hz, gain) of the two drone tones.
pub const DRONE: [(f32, f32); 2] = [(110.0, 0.05), (165.0, 0.03)];

const SPARKLE_COUNT: u64 = 5;
const SPARKLE_SPACING: f32 = 0.2; // seconds between sparkle onsets
const SPARKLE_LENGTH: f32 = 0.3;
const SPARKLE_GAIN: f32 = 0.1;
const SPARKLE_FLOOR: f32 = 0.001;
const SPARKLE_LOW_HZ: f32 = 2000.0;
const SPARKLE_HIGH_HZ: f32 = 3000.0;

const NOISE_SECONDS: f32 = 2.0;
const NOISE_CUTOFF_HZ: f32 = 800.0;
const NOISE_GAIN: f32 = 0.08;

const BUTTER_HZ: f32 = 150.0;
const BUTTER_GAIN: f32 = 0.06;
const BUTTER_SETTLE: f32 = 0.03;
const BUTTER_RAMP: f32 = 2.0; // seconds

pub struct Scene {
    label: SoundLabel,
    voices: Vec<Voice>,
    clock: u64, // samples rendered since the scene started
}

impl Scene {
    pub fn build<R: Rng>(label: SoundLabel, sample_rate: u32, rng: &mut R) -> Self {
        let sr = sample_rate as f32;
        let seconds = |s: f32| (s * sr).round() as u64;

        let mut voices: Vec<Voice> = DRONE
            .iter()
            .map(|&(freq, gain)| {
                Voice::new(
                    Source::Tone(Oscillator::new(Waveform::Sine, freq, sr)),
                    GainEnvelope::constant(gain),
                )
            })
            .collect();

        match label {
            SoundLabel::Sprinkle => {
                for i in 0..SPARKLE_COUNT {
                    let freq = rng.gen_range(SPARKLE_LOW_HZ..SPARKLE_HIGH_HZ);
                    let length = seconds(SPARKLE_LENGTH);
                    voices.push(
                        Voice::new(
                            Source::Tone(Oscillator::new(Waveform::Sine, freq, sr)),
                            GainEnvelope::exponential(SPARKLE_GAIN, SPARKLE_FLOOR, length),
                        )
                        .scheduled(i * seconds(SPARKLE_SPACING), length),
                    );
                }
            }
            SoundLabel::Sizzle | SoundLabel::Crisp => {
                let buffer = SampleBuffer::brown_noise(seconds(NOISE_SECONDS) as usize, rng);
                voices.push(
                    Voice::new(
                        Source::Noise(LoopPlayer::new(buffer)),
                        GainEnvelope::constant(NOISE_GAIN),
                    )
                    .with_filter(LowPass::new(NOISE_CUTOFF_HZ, DEFAULT_Q, sr)),
                );
            }
            SoundLabel::Butter => {
                voices.push(Voice::new(
                    Source::Tone(Oscillator::new(Waveform::Triangle, BUTTER_HZ, sr)),
                    GainEnvelope::exponential(BUTTER_GAIN, BUTTER_SETTLE, seconds(BUTTER_RAMP)),
                ));
            }
            SoundLabel::Ambient | SoundLabel::Complete => {}
        }

        Self {
            label,
            voices,
            clock: 0,
        }
    }

    pub fn label(&self) -> SoundLabel {
        self.label
    }

    /// Nodes still scheduled or sounding.
    pub fn live_nodes(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_stopped()).count()
    }

    #[cfg(test)]
    pub fn node_ids(&self) -> Vec<super::node_id::NodeId> {
        self.voices.iter().filter(|v| !v.is_stopped()).map(|v| v.id).collect()
    }

    #[cfg(test)]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn render_into(&mut self, out: &mut [StereoFrame]) {
        for voice in &mut self.voices {
            voice.render_into(self.clock, out);
        }
        self.clock += out.len() as u64;
        // self-stopping nodes are released as soon as they end
        self.voices.retain(|v| !v.is_stopped());
    }

    /// Stop every node, returning how many were live. The voices (and their
    /// buffers) are kept until the scene itself is dropped.
    pub fn stop_all(&mut self) -> usize {
        let released = self.live_nodes();
        for voice in &mut self.voices {
            voice.stop();
        }
        released
    }
}
