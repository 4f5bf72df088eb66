//! Tone generators for the drone, sparkles and the butter tone.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f32,
    phase: f32, // 0..1
    phase_inc: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
            phase_inc: frequency / sample_rate,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            // peaks at phase 0.25 like the sine, so both start at zero
            Waveform::Triangle => {
                let from_peak = (self.phase - 0.25).rem_euclid(1.0);
                1.0 - 4.0 * from_peak.min(1.0 - from_peak)
            }
        };
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upward_crossings(osc: &mut Oscillator, n: usize) -> usize {
        let mut prev = osc.next_sample();
        let mut count = 0;
        for _ in 1..n {
            let s = osc.next_sample();
            if prev < 0.0 && s >= 0.0 {
                count += 1;
            }
            prev = s;
        }
        count
    }

    #[test]
    fn sine_runs_at_its_frequency() {
        let mut osc = Oscillator::new(Waveform::Sine, 110.0, 44100.0);
        let crossings = upward_crossings(&mut osc, 44100);
        assert!((109..=111).contains(&crossings), "got {crossings}");
    }

    #[test]
    fn triangle_runs_at_its_frequency_and_stays_in_range() {
        let mut osc = Oscillator::new(Waveform::Triangle, 150.0, 44100.0);
        let mut peak = 0.0f32;
        for _ in 0..44100 {
            peak = peak.max(osc.next_sample().abs());
        }
        assert!(peak <= 1.0 + 1e-6 && peak > 0.99, "peak {peak}");

        let mut osc = Oscillator::new(Waveform::Triangle, 150.0, 44100.0);
        let crossings = upward_crossings(&mut osc, 44100);
        assert!((149..=151).contains(&crossings), "got {crossings}");
    }

    #[test]
    fn both_shapes_start_at_zero() {
        for waveform in [Waveform::Sine, Waveform::Triangle] {
            let mut osc = Oscillator::new(waveform, 440.0, 48000.0);
            assert!(osc.next_sample().abs() < 1e-6, "{waveform:?}");
        }
    }
}
