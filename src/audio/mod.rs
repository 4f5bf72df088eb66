use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio_api::AudioCommand;

mod engine;
mod envelope;
mod filter;
mod frame;
mod node_id;
mod oscillator;
pub mod render;
mod sample_buffer;
mod scene;
mod voice;

pub use engine::{Engine, EngineCommand};
pub use frame::StereoFrame;
pub use scene::Scene;

// Turns sequencer commands into engine commands. Scene construction
// (random pitches, the noise buffer) happens here, on the caller's thread.
pub struct SceneBuilder {
    sample_rate: u32,
    rng: StdRng,
}

impl SceneBuilder {
    pub fn new(sample_rate: u32, rng: StdRng) -> Self {
        Self { sample_rate, rng }
    }

    pub fn seeded(sample_rate: u32, seed: u64) -> Self {
        Self::new(sample_rate, StdRng::seed_from_u64(seed))
    }

    pub fn build(&mut self, cmd: AudioCommand) -> EngineCommand {
        match cmd {
            AudioCommand::Play(label) => {
                EngineCommand::Swap(Scene::build(label, self.sample_rate, &mut self.rng))
            }
            AudioCommand::Stop => EngineCommand::Stop,
            AudioCommand::SetVolume(v) => EngineCommand::SetVolume(v),
        }
    }
}

pub struct AudioHandle {
    tx: Sender<EngineCommand>,
    builder: SceneBuilder,
    live_nodes: Arc<AtomicUsize>,
    retired_rx: Receiver<Scene>,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&mut self, cmd: AudioCommand) {
        self.collect_retired();
        log::debug!(target: "audio", "{cmd:?}");
        match self.tx.try_send(self.builder.build(cmd)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::warn!(target: "audio", "command queue full, dropped {cmd:?}")
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!(target: "audio", "audio stream gone, dropped {cmd:?}")
            }
        }
    }

    /// Live sound nodes as last reported by the audio callback.
    pub fn active_nodes(&self) -> usize {
        self.collect_retired();
        self.live_nodes.load(Ordering::Relaxed)
    }

    // Scenes the callback let go of are freed here, on our side.
    fn collect_retired(&self) {
        for scene in self.retired_rx.try_iter() {
            drop(scene);
        }
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        // best effort: release the scene before the stream goes away
        let _ = self.tx.try_send(EngineCommand::Stop);
        log::info!(target: "audio", "audio shut down");
    }
}

pub fn start_audio(initial_volume: f32) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<EngineCommand>(64);
    let (retired_tx, retired_rx) = crossbeam_channel::bounded::<Scene>(64);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate: u32 = config.sample_rate();
    let channels = config.channels() as usize;
    log::info!(target: "audio", "output: {sample_rate} Hz, {channels} channel(s)");

    let engine = Engine::new(sample_rate)
        .with_volume(initial_volume)
        .with_retired(retired_tx);
    let live_nodes = engine.node_counter();

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(&device, &config.into(), rx, engine, channels)?;
            output_stream.play().context("failed to play output stream")?;

            Ok(AudioHandle {
                tx,
                builder: SceneBuilder::new(sample_rate, StdRng::from_entropy()),
                live_nodes,
                retired_rx,
                _output_stream: output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

// frames rendered per engine call; larger device buffers are split up
const BLOCK_FRAMES: usize = 1024;

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<EngineCommand>,
    mut engine: Engine,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut block = vec![StereoFrame::zero(); BLOCK_FRAMES];

    let err_fn = |err| log::error!(target: "audio", "output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            for chunk in data.chunks_mut(BLOCK_FRAMES * channels) {
                let n_frames = chunk.len() / channels;
                let frames = &mut block[..n_frames];
                engine.render_block(frames);
                write_interleaved(frames, chunk, channels);
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

// stereo into the first two channels, silence in any others, mono gets the left
fn write_interleaved(frames: &[StereoFrame], out: &mut [f32], channels: usize) {
    for (slot, frame) in out.chunks_exact_mut(channels).zip(frames) {
        slot.fill(0.0);
        slot[0] = frame.left;
        if channels > 1 {
            slot[1] = frame.right;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_api::SoundLabel;

    #[test]
    fn builder_maps_every_command() {
        let mut builder = SceneBuilder::seeded(48000, 1);
        match builder.build(AudioCommand::Play(SoundLabel::Butter)) {
            EngineCommand::Swap(scene) => assert_eq!(scene.label(), SoundLabel::Butter),
            _ => panic!("play should build a scene"),
        }
        assert!(matches!(builder.build(AudioCommand::Stop), EngineCommand::Stop));
        assert!(matches!(
            builder.build(AudioCommand::SetVolume(0.3)),
            EngineCommand::SetVolume(v) if v == 0.3
        ));
    }

    #[test]
    fn interleaving_fills_extra_channels_with_silence() {
        let frames = [
            StereoFrame { left: 0.1, right: 0.2 },
            StereoFrame { left: 0.3, right: 0.4 },
        ];
        let mut out = [9.0f32; 8];
        write_interleaved(&frames, &mut out, 4);
        assert_eq!(out, [0.1, 0.2, 0.0, 0.0, 0.3, 0.4, 0.0, 0.0]);

        let mut mono = [9.0f32; 2];
        write_interleaved(&frames, &mut mono, 1);
        assert_eq!(mono, [0.1, 0.3]);
    }
}
