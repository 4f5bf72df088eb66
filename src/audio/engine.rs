use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use super::frame::StereoFrame;
use super::scene::Scene;

// ~10 ms glide on master volume changes so slider moves don't click
const VOLUME_GLIDE_SECONDS: f32 = 0.01;

// What the engine accepts. Scenes arrive fully built; the callback only swaps.
pub enum EngineCommand {
    Swap(Scene),
    Stop,
    SetVolume(f32),
}

pub struct Engine {
    scene: Option<Scene>, // at most one, ever
    volume: f32, // target master gain
    current_volume: f32, // what the last sample was scaled by
    glide: f32,
    live_nodes: Arc<AtomicUsize>,
    retired: Option<Sender<Scene>>, // old scenes go back here to be freed off the audio thread
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            scene: None,
            volume: 0.0,
            current_volume: 0.0,
            glide: 1.0 - (-1.0 / (VOLUME_GLIDE_SECONDS * sample_rate as f32)).exp(),
            live_nodes: Arc::new(AtomicUsize::new(0)),
            retired: None,
        }
    }

    // Without this, released scenes are dropped in place (fine offline).
    pub fn with_retired(mut self, tx: Sender<Scene>) -> Self {
        self.retired = Some(tx);
        self
    }

    /// Shared count of live nodes, readable from the UI thread.
    pub fn node_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_nodes)
    }

    pub fn handle_cmd(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Swap(scene) => {
                // the old scene is fully released before the new one is adopted
                self.release_scene();
                self.scene = Some(scene);
            }
            EngineCommand::Stop => self.release_scene(),
            EngineCommand::SetVolume(v) => self.volume = v.clamp(0.0, 1.0),
        }
        self.publish();
    }

    // master gain starts where it's told to, instead of gliding up from zero
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self.current_volume = self.volume;
        self
    }

    #[cfg(test)]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[cfg(test)]
    pub fn scene_label(&self) -> Option<crate::audio_api::SoundLabel> {
        self.scene.as_ref().map(Scene::label)
    }

    #[cfg(test)]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn active_nodes(&self) -> usize {
        self.scene.as_ref().map_or(0, Scene::live_nodes)
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        if let Some(scene) = self.scene.as_mut() {
            scene.render_into(out);
        }
        for frame in out.iter_mut() {
            self.current_volume += (self.volume - self.current_volume) * self.glide;
            frame.scale(self.current_volume);
        }
        self.publish();
    }

    fn release_scene(&mut self) {
        let Some(mut old) = self.scene.take() else {
            return;
        };
        old.stop_all();
        if let Some(tx) = &self.retired {
            // a full queue means the UI thread stalled; dropping here is the fallback
            let _ = tx.try_send(old);
        }
    }

    fn publish(&self) {
        self.live_nodes.store(self.active_nodes(), Ordering::Relaxed);
    }
}
