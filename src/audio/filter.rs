// Second-order low-pass (RBJ cookbook coefficients, transposed direct form II).
// Only the noise layer is filtered, so this is the one shape we need.

use std::f32::consts::PI;

// A browser biquad's default Q of 1 is in dB: 10^(1/20) linear, a touch
// of resonance at the cutoff
pub const DEFAULT_Q: f32 = 1.122_018_5;

#[derive(Clone, Debug)]
pub struct LowPass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl LowPass {
    pub fn new(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let cutoff = cutoff.clamp(10.0, sample_rate * 0.49);
        let w0 = 2.0 * PI * cutoff / sample_rate;
        let alpha = w0.sin() / (2.0 * q.max(0.01));
        let cos_w0 = w0.cos();

        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w0) / a0;
        Self {
            b0: b1 * 0.5,
            b1,
            b2: b1 * 0.5,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}
