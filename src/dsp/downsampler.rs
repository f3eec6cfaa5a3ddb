/// Fractional-ratio channel downsampler with anti-aliasing filter.
///
/// Brings I/Q samples from the front-end rate (1.024 MS/s, 2.048 MS/s...)
/// down to a decoder's intermediate rate. The input is low-pass filtered and
/// picked at a fractional step of `in_rate / out_rate`, since the
/// intermediate rate is usually not an integer divisor of the input rate.
///
/// # Example
///
/// ```rust
/// use iqdemod::dsp::DspBlock;
/// use iqdemod::dsp::downsampler::Downsampler;
/// use iqdemod::dsp::filters::low_pass_taps;
/// use num_complex::Complex;
///
/// let taps = low_pass_taps(5_000.0, 1_024_000.0, 51);
/// let mut downsampler = Downsampler::new(1_024_000, 48_000, taps);
///
/// let input = vec![Complex::new(0.5, 0.0); 10_240];
/// let output = downsampler.process(&input);
/// assert_eq!(output.len(), 480);
/// ```
use num_complex::Complex;

use super::DspBlock;

/// A downsampler from `in_rate` to `out_rate`.
///
/// # Fields
/// - `in_rate`, `out_rate`: the conversion ratio, kept as integers
/// - `fir`: the anti-aliasing filter coefficients
/// - `buffer`: filter history followed by not-yet-consumed input
/// - `position`: buffer position of the next output sample, in units of
///   `1 / out_rate` input samples so that stepping is exact
pub struct Downsampler {
    in_rate: u64,
    out_rate: u64,
    fir: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    position: u64,
}

impl Downsampler {
    /// Creates a new downsampler.
    ///
    /// # Arguments
    /// * `in_rate` - Input sample rate in Hz
    /// * `out_rate` - Output sample rate in Hz
    /// * `fir` - Anti-aliasing filter coefficients, designed at `in_rate`
    ///
    /// # Panics
    /// Panics if a rate is 0 or `fir` is empty.
    pub fn new(in_rate: u32, out_rate: u32, fir: Vec<f32>) -> Self {
        assert!(in_rate > 0 && out_rate > 0, "Sample rates must be greater than 0");
        assert!(!fir.is_empty(), "Number of taps must be greater than 0");

        let history = fir.len() - 1;
        Self {
            in_rate: in_rate as u64,
            out_rate: out_rate as u64,
            fir,
            buffer: vec![Complex::default(); history],
            position: history as u64 * out_rate as u64,
        }
    }
}

impl DspBlock for Downsampler {
    type Input = Complex<f32>;
    type Output = Complex<f32>;

    /// Filters and downsamples a block of samples.
    ///
    /// Output sample `k` of the whole stream is taken at input position
    /// `k * in_rate / out_rate`. The position carries over between calls, so
    /// the output depends only on the stream, not on how it was split.
    fn process(&mut self, data: &[Complex<f32>]) -> Vec<Complex<f32>> {
        self.buffer.extend_from_slice(data);

        let history = self.fir.len() - 1;
        let expected = data.len() as u64 * self.out_rate / self.in_rate + 1;
        let mut output = Vec::with_capacity(expected as usize);

        loop {
            let idx = (self.position / self.out_rate) as usize;
            if idx >= self.buffer.len() {
                break;
            }
            let mut acc = Complex::default();
            for (j, &coeff) in self.fir.iter().enumerate() {
                acc += self.buffer[idx - j] * coeff;
            }
            output.push(acc);
            self.position += self.in_rate;
        }

        // Keep `history` samples before the next output position
        let next = (self.position / self.out_rate) as usize;
        let drop = (next - history).min(self.buffer.len());
        self.buffer.drain(0..drop);
        self.position -= drop as u64 * self.out_rate;

        output
    }
}
