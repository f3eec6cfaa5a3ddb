//! Digital filter implementations.
//!
//! - [`low_pass_taps`]: windowed-sinc low-pass coefficient design
//! - [`FirFilter`]: streaming FIR filter keeping its history between blocks
//!
//! # Example
//!
//! ```
//! use iqdemod::dsp::DspBlock;
//! use iqdemod::dsp::filters::FirFilter;
//!
//! // 15 kHz low-pass at the 336 kHz WBFM intermediate rate
//! let mut filter = FirFilter::low_pass(15_000.0, 336_000.0, 41);
//!
//! let first = filter.process(&[0.5; 100]);
//! let second = filter.process(&[0.5; 100]);
//! assert_eq!(first.len(), 100);
//! assert_eq!(second.len(), 100);
//! ```

use std::f32::consts::PI;

use super::DspBlock;

/// Design a low-pass FIR filter using a Blackman-windowed sinc.
///
/// The coefficients are normalized to unity gain at DC. A cutoff at or above
/// Nyquist yields an all-pass filter.
///
/// # Panics
///
/// Panics if `taps` is 0 or if `sample_rate` is not positive.
pub fn low_pass_taps(cutoff_freq: f32, sample_rate: f32, taps: usize) -> Vec<f32> {
    assert!(taps > 0, "Number of taps must be greater than 0");
    assert!(sample_rate > 0.0, "Sample rate must be greater than 0");

    let mut fir = Vec::with_capacity(taps);
    let mid = (taps / 2) as isize;
    let norm_cutoff = (cutoff_freq / (sample_rate / 2.0)).min(1.0);
    let span = (taps as f32 - 1.0).max(1.0);

    for n in 0..taps {
        let x = n as isize - mid;

        let sinc = if x == 0 {
            norm_cutoff
        } else {
            (norm_cutoff * PI * x as f32).sin() / (PI * x as f32)
        };

        // Blackman window: w(n) = 0.42 - 0.5*cos(2πn/N) + 0.08*cos(4πn/N)
        let window = if taps == 1 {
            1.0
        } else {
            0.42 - 0.5 * ((2.0 * PI * n as f32) / span).cos()
                + 0.08 * ((4.0 * PI * n as f32) / span).cos()
        };

        fir.push(sinc * window);
    }

    let norm: f32 = fir.iter().sum();
    for v in fir.iter_mut() {
        *v /= norm;
    }
    fir
}

/// Streaming Finite Impulse Response filter.
///
/// Keeps the last `taps - 1` input samples in a ring buffer so that a signal
/// split into arbitrary blocks is filtered exactly as if it had been processed
/// in one piece. The filter is causal: each output sample depends only on the
/// current and past inputs.
pub struct FirFilter {
    coeffs: Vec<f32>,
    history: Vec<f32>,
    write_pos: usize,
}

impl FirFilter {
    /// Create a filter from explicit coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is empty.
    pub fn new(coeffs: Vec<f32>) -> Self {
        assert!(!coeffs.is_empty(), "Number of taps must be greater than 0");
        let len = coeffs.len();
        Self {
            coeffs,
            history: vec![0.0; len],
            write_pos: 0,
        }
    }

    /// Low-pass filter with the given cutoff.
    pub fn low_pass(cutoff_freq: f32, sample_rate: f32, taps: usize) -> Self {
        Self::new(low_pass_taps(cutoff_freq, sample_rate, taps))
    }

    /// Band-pass filter built as the difference of two low-pass designs.
    pub fn band_pass(low_freq: f32, high_freq: f32, sample_rate: f32, taps: usize) -> Self {
        let hi = low_pass_taps(high_freq, sample_rate, taps);
        let lo = low_pass_taps(low_freq, sample_rate, taps);
        Self::new(hi.iter().zip(&lo).map(|(h, l)| h - l).collect())
    }

    /// Filter one sample.
    pub fn push(&mut self, sample: f32) -> f32 {
        let len = self.coeffs.len();
        self.history[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % len;

        let mut acc = 0.0_f32;
        for (i, c) in self.coeffs.iter().enumerate() {
            let idx = (self.write_pos + len - 1 - i) % len;
            acc += self.history[idx] * c;
        }
        acc
    }
}

impl DspBlock for FirFilter {
    type Input = f32;
    type Output = f32;

    /// Filter a block of samples, output length equals input length.
    fn process(&mut self, samples: &[f32]) -> Vec<f32> {
        samples.iter().map(|&s| self.push(s)).collect()
    }
}
