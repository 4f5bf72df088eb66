pub use crate::recipe::SoundLabel;

// What the sequencer asks of the sound side. The engine never sees these
// directly: `AudioHandle` builds the scene for a `Play` on the UI thread
// (noise buffers allocate) and hands the finished scene across.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCommand {
    // Tear down whatever is sounding, then start the scene for this label
    Play(SoundLabel),

    // Release every node of the current scene
    Stop,

    // Master output level, 0.0..=1.0; never interrupts the scene
    SetVolume(f32),
}
