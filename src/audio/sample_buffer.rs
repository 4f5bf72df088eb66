use rand::Rng;

// Leaky-integrator coefficients for the pan-sizzle texture
const NOISE_INPUT: f32 = 0.02;
const NOISE_LEAK: f32 = 1.02;
const NOISE_SCALE: f32 = 3.5;

#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<f32>, // mono
}

impl SampleBuffer {
    // Low-frequency noise: white noise run through y = (y + 0.02 * w) / 1.02,
    // each output scaled up afterwards. The recurrence state is kept unscaled.
    pub fn brown_noise<R: Rng>(len: usize, rng: &mut R) -> Self {
        let mut last = 0.0f32;
        let data = (0..len)
            .map(|_| {
                let white: f32 = rng.gen_range(-1.0..1.0);
                last = (last + NOISE_INPUT * white) / NOISE_LEAK;
                last * NOISE_SCALE
            })
            .collect();
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Plays a buffer end to end, forever.
#[derive(Clone, Debug)]
pub struct LoopPlayer {
    buffer: SampleBuffer,
    pos: usize,
}

impl LoopPlayer {
    pub fn new(buffer: SampleBuffer) -> Self {
        Self { buffer, pos: 0 }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sample = self.buffer.data[self.pos];
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        sample
    }
}
