// Types passed between the TUI and the sequencer.
//
// Keys (see tui/input.rs):
//   Enter          //  Start (only from the intro screen)
//   Space          //  TogglePlay
//   Left / p       //  Previous
//   Right / n      //  Next
//   r              //  Reset
//   - / Down       //  VolumeDown
//   = / Up         //  VolumeUp
//   0 .. 9         //  SetVolume(0.0 .. 1.0)
//   Esc / q        //  Quit
//
// The TUI only resolves keys to intents and draws whatever `DisplayState`
// says; the sequencer in middle.rs owns every decision.

pub const TITLE: &str = "CINEMATIC FISH RECIPE";
pub const SUBTITLE: &str = "An 8K Ultra Realistic Culinary Journey";
pub const HERO_ICON: &str = "🐟";
pub const HERO_TITLE: &str = "Master the Art of Fish";
pub const HERO_DESCRIPTION: &str = "Immerse yourself in a cinematic cooking experience with synchronized visuals, ambient soundscapes, and crispy ASMR cooking sounds.";
pub const FOOTER: &str = "🎵 Ambient soundscapes generated in real-time";

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Start,
    TogglePlay,
    Next,
    Previous,
    Reset,
    VolumeUp,
    VolumeDown,
    SetVolume(f32),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Intro, // nothing started yet, or just reset
    Step,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub screen: Screen,
    pub step: usize, // 0-based
    pub total_steps: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub sound: &'static str,
    pub playing: bool,
    pub volume: f32,
    pub can_previous: bool,
    pub can_next: bool,
    pub progress: f64, // (step + 1) / total
    pub step_remaining: Option<f64>, // seconds until auto-advance, None when not counting down
    pub active_nodes: usize, // live sound nodes reported by the engine
}

impl DisplayState {
    pub fn step_label(&self) -> String {
        format!("Step {} of {}", self.step + 1, self.total_steps)
    }
}
