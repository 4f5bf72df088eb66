// The middle layer: the step sequencer. It owns the playback state and the
// auto-advance timer, turns input events and elapsed time into state changes,
// and answers with the audio commands those changes need. Nothing in here
// touches the audio device or the terminal, so the whole walkthrough can be
// driven by calling `tick` with simulated time.

use crate::audio_api::{AudioCommand, SoundLabel};
use crate::recipe::{LAST_STEP, NUM_STEPS, STEPS};
use crate::shared::{DisplayState, InputEvent, Screen};

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_VOLUME_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle, // step 0, never started (or reset)
    Playing,
    Paused, // Paused at the last step is the finished state
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub step: usize,
    pub mode: Mode,
    pub volume: f32,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Paused && self.step == LAST_STEP
    }
}

/// Cancellable one-shot countdown, advanced by the UI loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepTimer {
    remaining: Option<f64>, // seconds
}

impl StepTimer {
    pub fn arm(&mut self, seconds: f64) {
        self.remaining = Some(seconds.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    // true exactly once, on the tick that runs the countdown out
    pub fn advance(&mut self, elapsed: f64) -> bool {
        match self.remaining {
            Some(left) if left - elapsed <= 0.0 => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - elapsed);
                false
            }
            None => false,
        }
    }
}

pub struct Middle {
    pub state: PlaybackState,
    timer: StepTimer,
    time_scale: f64,
    volume_step: f32,
    sounding: Option<SoundLabel>, // label of the last scene we asked for
    active_nodes: usize, // synced from the engine each frame
}

impl Default for Middle {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME, 1.0)
    }
}

impl Middle {
    pub fn new(volume: f32, time_scale: f64) -> Self {
        Self {
            state: PlaybackState {
                step: 0,
                mode: Mode::Idle,
                volume: volume.clamp(0.0, 1.0),
            },
            timer: StepTimer::default(),
            time_scale: time_scale.max(0.0),
            volume_step: DEFAULT_VOLUME_STEP,
            sounding: None,
            active_nodes: 0,
        }
    }

    pub fn with_volume_step(mut self, step: f32) -> Self {
        self.volume_step = step.abs();
        self
    }

    pub fn sounding(&self) -> Option<SoundLabel> {
        self.sounding
    }

    pub fn step_remaining(&self) -> Option<f64> {
        self.timer.remaining()
    }

    pub fn set_active_nodes(&mut self, count: usize) {
        self.active_nodes = count;
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        match event {
            InputEvent::Start => self.start(),
            InputEvent::TogglePlay => self.toggle_play(),
            InputEvent::Next => self.next(),
            InputEvent::Previous => self.previous(),
            InputEvent::Reset => self.reset(),
            InputEvent::VolumeUp => self.adjust_volume(self.volume_step),
            InputEvent::VolumeDown => self.adjust_volume(-self.volume_step),
            InputEvent::SetVolume(v) => self.set_volume(v),
            InputEvent::Quit => vec![],
        }
    }

    pub fn start(&mut self) -> Vec<AudioCommand> {
        if self.state.mode != Mode::Idle {
            return vec![];
        }
        log::info!(target: "sequencer", "walkthrough started");
        self.state.step = 0;
        self.state.mode = Mode::Playing;
        self.arm_timer();
        vec![self.play_current()]
    }

    pub fn next(&mut self) -> Vec<AudioCommand> {
        if self.state.mode == Mode::Idle || self.state.step >= LAST_STEP {
            return vec![];
        }
        self.go_to(self.state.step + 1)
    }

    pub fn previous(&mut self) -> Vec<AudioCommand> {
        if self.state.mode == Mode::Idle || self.state.step == 0 {
            return vec![];
        }
        self.go_to(self.state.step - 1)
    }

    // Pausing only stops the countdown; the current scene keeps sounding.
    pub fn toggle_play(&mut self) -> Vec<AudioCommand> {
        match self.state.mode {
            Mode::Idle => self.start(),
            Mode::Playing => {
                self.state.mode = Mode::Paused;
                self.timer.cancel();
                log::info!(target: "sequencer", "paused at step {}", self.state.step + 1);
                vec![]
            }
            Mode::Paused => {
                self.state.mode = Mode::Playing;
                self.arm_timer();
                log::info!(target: "sequencer", "resumed at step {}", self.state.step + 1);
                vec![]
            }
        }
    }

    pub fn reset(&mut self) -> Vec<AudioCommand> {
        self.state.step = 0;
        self.state.mode = Mode::Idle;
        self.timer.cancel();
        self.sounding = None;
        log::info!(target: "sequencer", "reset");
        vec![AudioCommand::Stop]
    }

    pub fn set_volume(&mut self, volume: f32) -> Vec<AudioCommand> {
        if !volume.is_finite() {
            return vec![];
        }
        self.state.volume = volume.clamp(0.0, 1.0);
        vec![AudioCommand::SetVolume(self.state.volume)]
    }

    pub fn adjust_volume(&mut self, delta: f32) -> Vec<AudioCommand> {
        self.set_volume(self.state.volume + delta)
    }

    // Called every frame with the wall-clock seconds since the last call.
    pub fn tick(&mut self, elapsed: f64) -> Vec<AudioCommand> {
        if !self.state.is_playing() || !self.timer.advance(elapsed) {
            return vec![];
        }
        if self.state.step < LAST_STEP {
            self.go_to(self.state.step + 1)
        } else {
            self.state.mode = Mode::Paused;
            self.sounding = None;
            log::info!(target: "sequencer", "walkthrough finished");
            vec![AudioCommand::Stop]
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let step = &STEPS[self.state.step];
        DisplayState {
            screen: if self.state.mode == Mode::Idle { Screen::Intro } else { Screen::Step },
            step: self.state.step,
            total_steps: NUM_STEPS,
            title: step.title,
            description: step.description,
            icon: step.icon,
            sound: self.sounding().map(SoundLabel::name).unwrap_or("silent"),
            playing: self.state.is_playing(),
            volume: self.state.volume,
            can_previous: self.state.step > 0,
            can_next: self.state.step < LAST_STEP,
            progress: (self.state.step + 1) as f64 / NUM_STEPS as f64,
            step_remaining: self.timer.remaining(),
            active_nodes: self.active_nodes,
        }
    }

    fn go_to(&mut self, step: usize) -> Vec<AudioCommand> {
        self.state.step = step;
        if self.state.is_playing() {
            self.arm_timer();
        }
        log::debug!(target: "sequencer", "step {} ({})", step + 1, STEPS[step].title);
        vec![self.play_current()]
    }

    fn arm_timer(&mut self) {
        let seconds = STEPS[self.state.step].duration().as_secs_f64() * self.time_scale;
        self.timer.arm(seconds);
    }

    fn play_current(&mut self) -> AudioCommand {
        let label = STEPS[self.state.step].sound;
        self.sounding = Some(label);
        AudioCommand::Play(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(step: usize) -> f64 {
        STEPS[step].duration().as_secs_f64()
    }

    fn playing_at(step: usize) -> Middle {
        let mut m = Middle::default();
        m.start();
        for _ in 0..step {
            m.next();
        }
        m
    }

    #[test]
    fn starts_idle_on_the_intro() {
        let m = Middle::default();
        assert_eq!(m.state.step, 0);
        assert_eq!(m.state.mode, Mode::Idle);
        assert_eq!(m.state.volume, 0.5);
        assert_eq!(m.display_state().screen, Screen::Intro);
    }

    #[test]
    fn start_plays_the_first_scene() {
        let mut m = Middle::default();
        let cmds = m.start();
        assert_eq!(cmds, vec![AudioCommand::Play(SoundLabel::Ambient)]);
        assert_eq!(m.state.mode, Mode::Playing);
        assert_eq!(m.state.step, 0);
        assert_eq!(m.step_remaining(), Some(8.0));
        // a second start is ignored
        assert!(m.start().is_empty());
    }

    #[test]
    fn next_then_previous_returns_to_the_same_state() {
        for step in 1..LAST_STEP {
            for pause in [false, true] {
                let mut m = playing_at(step);
                if pause {
                    m.toggle_play();
                }
                let before = m.state;
                m.next();
                m.previous();
                assert_eq!(m.state, before, "step {step}, paused {pause}");
            }
        }
    }

    #[test]
    fn navigation_past_the_ends_is_ignored() {
        let mut m = playing_at(0);
        let before = m.state;
        assert!(m.previous().is_empty());
        assert_eq!(m.state, before);

        let mut m = playing_at(LAST_STEP);
        let before = m.state;
        assert!(m.next().is_empty());
        assert_eq!(m.state, before);
    }

    #[test]
    fn navigation_keeps_the_mode_and_plays_the_new_step() {
        let mut m = playing_at(2);
        m.toggle_play();
        let cmds = m.next();
        assert_eq!(cmds, vec![AudioCommand::Play(SoundLabel::Crisp)]);
        assert_eq!(m.state.mode, Mode::Paused);
        assert_eq!(m.step_remaining(), None);

        let cmds = m.previous();
        assert_eq!(cmds, vec![AudioCommand::Play(SoundLabel::Sizzle)]);
        assert_eq!(m.state.step, 2);
    }

    #[test]
    fn navigation_from_idle_is_ignored() {
        let mut m = Middle::default();
        assert!(m.next().is_empty());
        assert!(m.previous().is_empty());
        assert_eq!(m.state.mode, Mode::Idle);
        assert_eq!(m.state.step, 0);
    }

    #[test]
    fn timer_advances_to_the_next_step() {
        let mut m = playing_at(0);
        assert!(m.tick(secs(0) - 0.5).is_empty());
        assert_eq!(m.state.step, 0);
        let cmds = m.tick(0.5);
        assert_eq!(cmds, vec![AudioCommand::Play(SoundLabel::Sprinkle)]);
        assert_eq!(m.state.step, 1);
        assert!(m.state.is_playing());
        assert_eq!(m.step_remaining(), Some(secs(1)));
    }

    #[test]
    fn manual_navigation_rearms_the_timer() {
        let mut m = playing_at(0);
        m.tick(5.0);
        m.next();
        // full duration of the new step, not what was left of the old one
        assert!(m.tick(secs(1) - 0.1).is_empty());
        assert_eq!(m.state.step, 1);
    }

    #[test]
    fn pause_cancels_the_timer_but_keeps_sound() {
        let mut m = playing_at(0);
        m.tick(1.0);
        m.tick(secs(0) - 1.0);
        assert_eq!(m.state.step, 1);

        let cmds = m.toggle_play();
        assert!(cmds.is_empty(), "pausing must not silence the scene");
        assert_eq!(m.state.mode, Mode::Paused);
        assert_eq!(m.state.step, 1);
        assert_eq!(m.sounding(), Some(SoundLabel::Sprinkle));
        assert!(m.tick(1000.0).is_empty());
        assert_eq!(m.state.step, 1);

        m.reset();
        assert_eq!(m.state.step, 0);
        assert_eq!(m.state.mode, Mode::Idle);
        assert_eq!(m.sounding(), None);
    }

    #[test]
    fn resume_restarts_the_full_step_duration() {
        let mut m = playing_at(1);
        m.tick(9.0);
        m.toggle_play();
        let cmds = m.toggle_play();
        assert!(cmds.is_empty());
        assert_eq!(m.step_remaining(), Some(secs(1)));
    }

    #[test]
    fn last_step_finishes_and_stops_sound() {
        let mut m = playing_at(LAST_STEP);
        let cmds = m.tick(secs(LAST_STEP));
        assert_eq!(cmds, vec![AudioCommand::Stop]);
        assert_eq!(m.state.mode, Mode::Paused);
        assert_eq!(m.state.step, LAST_STEP);
        assert!(m.state.is_finished());
        assert_eq!(m.sounding(), None);
        assert!(m.tick(100.0).is_empty());
    }

    #[test]
    fn full_walkthrough_auto_advances_to_the_end() {
        let mut m = Middle::default();
        let mut played = m.start();
        for _ in 0..10_000 {
            played.extend(m.tick(0.016));
            if !m.state.is_playing() {
                break;
            }
        }
        let labels: Vec<_> = played
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Play(l) => Some(*l),
                _ => None,
            })
            .collect();
        assert_eq!(labels, STEPS.map(|s| s.sound));
        assert_eq!(played.last(), Some(&AudioCommand::Stop));
        assert!(m.state.is_finished());
    }

    #[test]
    fn reset_from_any_state_goes_idle_and_stops() {
        for step in 0..NUM_STEPS {
            let mut m = playing_at(step);
            assert_eq!(m.reset(), vec![AudioCommand::Stop]);
            assert_eq!(m.state.step, 0);
            assert!(!m.state.is_playing());
            assert_eq!(m.step_remaining(), None);
        }
        let mut m = Middle::default();
        assert_eq!(m.reset(), vec![AudioCommand::Stop]);
    }

    #[test]
    fn volume_never_touches_step_or_mode() {
        let mut m = playing_at(3);
        let before = m.state;
        let remaining = m.step_remaining();
        assert_eq!(m.set_volume(0.8), vec![AudioCommand::SetVolume(0.8)]);
        assert_eq!(m.set_volume(3.0), vec![AudioCommand::SetVolume(1.0)]);
        assert_eq!(m.set_volume(-1.0), vec![AudioCommand::SetVolume(0.0)]);
        assert!(m.set_volume(f32::NAN).is_empty());
        assert_eq!(m.state.step, before.step);
        assert_eq!(m.state.mode, before.mode);
        assert_eq!(m.step_remaining(), remaining);
    }

    #[test]
    fn volume_keys_move_by_the_configured_step() {
        let mut m = Middle::new(0.5, 1.0).with_volume_step(0.1);
        m.handle_input(InputEvent::VolumeUp);
        assert!((m.state.volume - 0.6).abs() < 1e-6);
        m.handle_input(InputEvent::VolumeDown);
        m.handle_input(InputEvent::VolumeDown);
        assert!((m.state.volume - 0.4).abs() < 1e-6);
    }

    #[test]
    fn time_scale_shortens_every_step() {
        let mut m = Middle::new(0.5, 0.5);
        m.start();
        assert_eq!(m.step_remaining(), Some(4.0));
        m.tick(4.0);
        assert_eq!(m.state.step, 1);
    }

    #[test]
    fn toggle_from_idle_starts() {
        let mut m = Middle::default();
        let cmds = m.handle_input(InputEvent::TogglePlay);
        assert_eq!(cmds, vec![AudioCommand::Play(SoundLabel::Ambient)]);
        assert!(m.state.is_playing());
    }

    #[test]
    fn display_state_tracks_progress() {
        let mut m = playing_at(1);
        m.set_active_nodes(7);
        let ds = m.display_state();
        assert_eq!(ds.screen, Screen::Step);
        assert_eq!(ds.step_label(), "Step 2 of 6");
        assert_eq!(ds.title, "Season & Marinate");
        assert_eq!(ds.sound, "sprinkle");
        assert!((ds.progress - 2.0 / 6.0).abs() < 1e-9);
        assert!(ds.can_previous && ds.can_next);
        assert_eq!(ds.active_nodes, 7);
    }
}
