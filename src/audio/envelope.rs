//! Gain envelopes: a fixed level, or an exponential ramp that settles on a
//! target and holds it (the curve of an exponential ramp-to-value).

#[derive(Clone, Debug)]
pub struct GainEnvelope {
    level: f32,
    target: f32,
    factor: f32, // per-sample multiplier while ramping
    remaining: u64, // samples left in the ramp
}

impl GainEnvelope {
    pub fn constant(level: f32) -> Self {
        Self {
            level,
            target: level,
            factor: 1.0,
            remaining: 0,
        }
    }

    /// Ramp from `from` to `to` over `samples`, then hold `to`.
    ///
    /// Both ends must be positive; a zero or negative end falls back to a
    /// constant `to`.
    pub fn exponential(from: f32, to: f32, samples: u64) -> Self {
        if from <= 0.0 || to <= 0.0 || samples == 0 {
            return Self::constant(to);
        }
        Self {
            level: from,
            target: to,
            factor: (to / from).powf(1.0 / samples as f32),
            remaining: samples,
        }
    }

    /// Current gain, then step one sample forward.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let value = self.level;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.level = if self.remaining == 0 {
                self.target
            } else {
                self.level * self.factor
            };
        }
        value
    }

    #[cfg(test)]
    pub fn level(&self) -> f32 {
        self.level
    }

    #[cfg(test)]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}
