//! Offline rendering: run the whole walkthrough through the sequencer and the
//! engine against a sample clock instead of the sound card, and write the
//! result to a WAV file.

use std::path::Path;

use anyhow::Context;

use super::engine::Engine;
use super::frame::StereoFrame;
use super::SceneBuilder;
use crate::audio_api::AudioCommand;
use crate::middle::Middle;

pub const EXPORT_SAMPLE_RATE: u32 = 44100;

/// Silence rendered after the final step, so the stop is audible.
pub const TAIL_SECONDS: f64 = 0.5;

const BLOCK_FRAMES: usize = 512;

#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub frames: usize,
    pub seconds: f64,
    pub steps: usize,
}

/// Render from `start` to the finished state. `middle` must be idle.
pub fn render_walkthrough(middle: &mut Middle, sample_rate: u32, seed: u64) -> Vec<StereoFrame> {
    let mut engine = Engine::new(sample_rate).with_volume(middle.state.volume);
    let mut builder = SceneBuilder::seeded(sample_rate, seed);
    let mut apply = |engine: &mut Engine, cmds: Vec<AudioCommand>| {
        for cmd in cmds {
            engine.handle_cmd(builder.build(cmd));
        }
    };

    let mut out = Vec::new();
    apply(&mut engine, middle.start());

    while let Some(remaining) = middle.step_remaining().filter(|_| middle.state.is_playing()) {
        let frames = (remaining * sample_rate as f64).round() as usize;
        render_frames(&mut engine, &mut out, frames);
        apply(&mut engine, middle.tick(remaining));
    }

    if !middle.state.is_finished() {
        log::warn!(target: "audio", "walkthrough stopped early at step {}", middle.state.step);
    }

    let tail = (TAIL_SECONDS * sample_rate as f64).round() as usize;
    render_frames(&mut engine, &mut out, tail);
    out
}

fn render_frames(engine: &mut Engine, out: &mut Vec<StereoFrame>, frames: usize) {
    let start = out.len();
    out.resize(start + frames, StereoFrame::zero());
    for block in out[start..].chunks_mut(BLOCK_FRAMES) {
        engine.render_block(block);
    }
}

pub fn write_wav(path: &Path, frames: &[StereoFrame], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("create {}", path.display()))?;
    for frame in frames {
        writer.write_sample(to_i16(frame.left))?;
        writer.write_sample(to_i16(frame.right))?;
    }
    writer.finalize().context("finalize wav")?;
    Ok(())
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

pub fn export_wav(path: &Path, volume: f32, time_scale: f64) -> anyhow::Result<ExportSummary> {
    log::info!(
        target: "audio",
        "rendering {:.1}s walkthrough at {EXPORT_SAMPLE_RATE} Hz",
        crate::recipe::total_duration().as_secs_f64() * time_scale
    );
    let mut middle = Middle::new(volume, time_scale);
    let frames = render_walkthrough(&mut middle, EXPORT_SAMPLE_RATE, rand::random());
    write_wav(path, &frames, EXPORT_SAMPLE_RATE)?;
    log::info!(target: "audio", "exported {} frames to {}", frames.len(), path.display());
    Ok(ExportSummary {
        frames: frames.len(),
        seconds: frames.len() as f64 / EXPORT_SAMPLE_RATE as f64,
        steps: crate::recipe::NUM_STEPS,
    })
}
