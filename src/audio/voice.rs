use super::envelope::GainEnvelope;
use super::filter::LowPass;
use super::frame::StereoFrame;
use super::node_id::{next_node_id, NodeId};
use super::oscillator::Oscillator;
use super::sample_buffer::LoopPlayer;

#[derive(Clone, Debug)]
pub enum Source {
    Tone(Oscillator),
    Noise(LoopPlayer),
}

impl Source {
    #[inline]
    fn next_sample(&mut self) -> f32 {
        match self {
            Source::Tone(osc) => osc.next_sample(),
            Source::Noise(player) => player.next_sample(),
        }
    }
}

// One sound-producing node: a source, an optional low-pass, a gain envelope,
// and a start/stop window measured in samples from the start of its scene.
#[derive(Clone, Debug)]
pub struct Voice {
    pub id: NodeId,
    source: Source,
    filter: Option<LowPass>,
    gain: GainEnvelope,
    start_at: u64,
    stop_at: Option<u64>, // None = hold until the scene is torn down
    stopped: bool,
}

impl Voice {
    pub fn new(source: Source, gain: GainEnvelope) -> Self {
        Self {
            id: next_node_id(),
            source,
            filter: None,
            gain,
            start_at: 0,
            stop_at: None,
            stopped: false,
        }
    }

    pub fn with_filter(mut self, filter: LowPass) -> Self {
        self.filter = Some(filter);
        self
    }

    // play `length` samples starting `delay` samples into the scene
    pub fn scheduled(mut self, delay: u64, length: u64) -> Self {
        self.start_at = delay;
        self.stop_at = Some(delay + length);
        self
    }

    #[cfg(test)]
    pub fn source(&self) -> &Source {
        &self.source
    }

    #[cfg(test)]
    pub fn gain_level(&self) -> f32 {
        self.gain.level()
    }

    #[cfg(test)]
    pub fn start_at(&self) -> u64 {
        self.start_at
    }

    #[cfg(test)]
    pub fn stop_at(&self) -> Option<u64> {
        self.stop_at
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // stopping twice is fine
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    // Mix this voice into `out`, whose first frame sits at scene time `clock`.
    pub fn render_into(&mut self, clock: u64, out: &mut [StereoFrame]) {
        if self.stopped {
            return;
        }
        let end = clock + out.len() as u64;
        if end <= self.start_at {
            return; // not started yet
        }

        let first = self.start_at.saturating_sub(clock) as usize;
        let last = match self.stop_at {
            Some(stop) => (stop.saturating_sub(clock) as usize).min(out.len()),
            None => out.len(),
        };

        for frame in out.iter_mut().take(last).skip(first) {
            let mut s = self.source.next_sample();
            if let Some(filter) = self.filter.as_mut() {
                s = filter.process(s);
            }
            *frame += StereoFrame::mono(s * self.gain.next_value());
        }

        if self.stop_at.is_some_and(|stop| stop <= end) {
            self.stopped = true;
        }
    }
}
