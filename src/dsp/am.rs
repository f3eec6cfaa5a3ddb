//! AM envelope detection.
//!
//! The audio of an AM signal is the magnitude of the I/Q samples minus the
//! carrier level. The carrier level is removed with a one-pole DC blocker:
//! `y[n] = x[n] - x[n-1] + alpha * y[n-1]`

use num_complex::Complex;

use super::DspBlock;

/// DC blocker pole; the corner sits around 10 Hz at 48 kHz.
const DC_ALPHA: f32 = 0.9987;

/// Envelope demodulator with carrier removal.
pub struct AmDemodulator {
    prev_in: f32,
    prev_out: f32,
    alpha: f32,
}

impl AmDemodulator {
    pub fn new() -> Self {
        Self {
            prev_in: 0.0,
            prev_out: 0.0,
            alpha: DC_ALPHA,
        }
    }
}

impl DspBlock for AmDemodulator {
    type Input = Complex<f32>;
    type Output = f32;

    /// Demodulate a block of complex samples, one audio value per sample.
    fn process(&mut self, samples: &[Complex<f32>]) -> Vec<f32> {
        let mut out = Vec::with_capacity(samples.len());
        for sample in samples {
            let envelope = sample.norm();
            let y = envelope - self.prev_in + self.alpha * self.prev_out;
            self.prev_in = envelope;
            self.prev_out = y;
            out.push(y);
        }
        out
    }
}

impl Default for AmDemodulator {
    fn default() -> Self {
        Self::new()
    }
}
