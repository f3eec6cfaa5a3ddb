//! FM demodulation blocks.
//!
//! - [`FmDemodulator`]: turns I/Q samples into instantaneous frequency, scaled
//!   so that the configured maximum deviation maps to ±1.0
//! - [`DeemphasisFilter`]: undoes broadcast pre-emphasis
//!
//! # Example
//!
//! ```
//! use iqdemod::dsp::DspBlock;
//! use iqdemod::dsp::fm::{DeemphasisFilter, FmDemodulator};
//! use num_complex::Complex;
//!
//! let mut demod = FmDemodulator::new(48_000.0, 5_000.0);
//! let mut deemphasis = DeemphasisFilter::new(48_000.0, 50e-6);
//!
//! let iq_samples = vec![Complex::new(0.5, 0.5); 100];
//! let audio = deemphasis.process(&demod.process(&iq_samples));
//! assert_eq!(audio.len(), 100);
//! ```

use std::f32::consts::PI;

use super::DspBlock;

use num_complex::Complex;

/// Quadrature FM demodulator.
///
/// For each sample the phase difference from the previous sample is taken
/// with a conjugate product, which is the instantaneous frequency in radians
/// per sample. It is multiplied by `sample_rate / (2π · max_deviation)` so a
/// carrier deviating by exactly `max_deviation` Hz produces ±1.0.
pub struct FmDemodulator {
    /// Last complex sample for phase difference calculation
    last: Complex<f32>,
    /// Radians per sample to normalized amplitude
    gain: f32,
}

impl FmDemodulator {
    /// Create a new demodulator.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Rate of the I/Q samples fed to [`process`](Self::process), in Hz
    /// * `max_deviation` - Frequency deviation in Hz that maps to full scale
    pub fn new(sample_rate: f32, max_deviation: f32) -> Self {
        Self {
            last: Complex::new(1.0, 0.0),
            gain: sample_rate / (2.0 * PI * max_deviation),
        }
    }
}

impl DspBlock for FmDemodulator {
    type Input = Complex<f32>;
    type Output = f32;

    /// Demodulate a block of complex samples.
    ///
    /// The output has one value per input sample. The first sample of a
    /// stream is referenced against 1+0j.
    fn process(&mut self, samples: &[Complex<f32>]) -> Vec<f32> {
        let mut out = Vec::with_capacity(samples.len());
        for &sample in samples {
            let d = (sample * self.last.conj()).arg();
            out.push(d * self.gain);
            self.last = sample;
        }
        out
    }
}

/// De-emphasis filter for FM broadcast audio.
///
/// Stations boost high frequencies before transmission; this first-order IIR
/// low-pass restores the original balance:
/// `y[n] = b*x[n] + a*y[n-1]`
///
/// Time constants: 50 µs (Europe and most of the world), 75 µs (Americas,
/// South Korea).
pub struct DeemphasisFilter {
    /// Coefficient for previous output (feedback)
    a: f32,
    /// Coefficient for current input (feedforward)
    b: f32,
    /// Previous output sample
    prev_y: f32,
}

impl DeemphasisFilter {
    /// Create a new de-emphasis filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz of the audio it will filter
    /// * `tau` - Time constant in seconds
    pub fn new(sample_rate: f32, tau: f32) -> Self {
        let decay = (-1.0 / (sample_rate * tau)).exp();
        Self {
            a: decay,
            b: 1.0 - decay,
            prev_y: 0.0,
        }
    }
}

impl DspBlock for DeemphasisFilter {
    type Input = f32;
    type Output = f32;

    fn process(&mut self, samples: &[f32]) -> Vec<f32> {
        let mut y = Vec::with_capacity(samples.len());
        for &x in samples {
            let out = self.b * x + self.a * self.prev_y;
            y.push(out);
            self.prev_y = out;
        }
        y
    }
}
