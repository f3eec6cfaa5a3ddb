//! Audio rate conversion with `rubato`.
//!
//! Demodulated audio leaves a decoder at its intermediate rate (48 kHz for
//! AM and NBFM, 336 kHz for WBFM) and is converted to the output rate by a
//! sinc interpolator. rubato consumes fixed-size chunks, so incoming audio is
//! queued per channel and only whole chunks are handed over; the remainder
//! waits for the next call. The chunk sequence depends only on the stream, so
//! the output does not change with the way the input was split into blocks.
//!
//! # Example
//!
//! ```
//! use iqdemod::dsp::resampler::AudioResampler;
//!
//! // 48 kHz -> 22.05 kHz, mono
//! let mut resampler = AudioResampler::new(48_000, 22_050, 1).unwrap();
//!
//! let mut output = Vec::new();
//! for _ in 0..10 {
//!     output.extend(resampler.process_mono(&[0.25; 4_800]));
//! }
//! assert!(output.len() > 20_000 && output.len() <= 22_050);
//! ```

use rubato::{
    Resampler, SincFixedOut, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Output frames produced by each rubato call
const CHUNK_FRAMES: usize = 256;

/// Fixed-ratio resampler for one or more audio channels.
pub struct AudioResampler {
    resampler: SincFixedOut<f32>,
    leftover: Vec<Vec<f32>>,
}

impl AudioResampler {
    /// Create a resampler.
    ///
    /// # Arguments
    ///
    /// * `in_rate` - Rate of the audio fed to [`process`](Self::process), in Hz
    /// * `out_rate` - Output rate in Hz
    /// * `channels` - Number of channels converted in lockstep
    pub fn new(in_rate: u32, out_rate: u32, channels: usize) -> Result<Self> {
        let ratio = out_rate as f64 / in_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Cubic,
            oversampling_factor: 128,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedOut::<f32>::new(ratio, 1.1, params, CHUNK_FRAMES, channels)
            .map_err(|e| Error::decoder(format!("Failed to create resampler: {}", e)))?;

        debug!(
            "audio resampler {} Hz -> {} Hz, {} channel(s) (ratio: {:.4})",
            in_rate, out_rate, channels, ratio
        );

        Ok(Self {
            resampler,
            leftover: vec![Vec::new(); channels],
        })
    }

    /// Resample one block per channel.
    ///
    /// All channels must be given the same number of samples. The returned
    /// channels always have equal lengths, a multiple of the chunk size.
    pub fn process(&mut self, input: &[&[f32]]) -> Vec<Vec<f32>> {
        for (queue, samples) in self.leftover.iter_mut().zip(input) {
            queue.extend_from_slice(samples);
        }

        let mut output = vec![Vec::new(); self.leftover.len()];

        loop {
            let input_frames_needed = self.resampler.input_frames_next();
            if self.leftover.iter().any(|q| q.len() < input_frames_needed) {
                break;
            }

            let chunk: Vec<Vec<f32>> = self
                .leftover
                .iter_mut()
                .map(|q| q.drain(..input_frames_needed).collect())
                .collect();

            match self.resampler.process(&chunk, None) {
                Ok(resampled) => {
                    for (out, channel) in output.iter_mut().zip(resampled) {
                        out.extend(channel);
                    }
                }
                Err(e) => {
                    warn!("Resampler error: {:?}", e);
                    break;
                }
            }
        }

        output
    }

    /// Resample a single channel.
    pub fn process_mono(&mut self, input: &[f32]) -> Vec<f32> {
        self.process(&[input]).pop().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_invalid_ratio_is_decoder_error() {
        assert!(matches!(
            AudioResampler::new(48_000, 0, 1),
            Err(Error::Decoder(_))
        ));
    }

    #[test]
    fn test_output_rate() {
        let mut resampler = AudioResampler::new(336_000, 48_000, 1).unwrap();
        let mut total = 0;
        for _ in 0..10 {
            total += resampler.process_mono(&[0.0; 33_600]).len();
        }
        // 1 s of input, less what rubato still holds back
        assert!(total > 47_000 && total <= 48_000, "got {}", total);
        assert_eq!(total % CHUNK_FRAMES, 0);
    }

    #[test]
    fn test_block_split_matches_whole() {
        let signal: Vec<f32> = (0..20_000)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 48_000.0).sin())
            .collect();

        let mut whole = AudioResampler::new(48_000, 44_100, 1).unwrap();
        let expected = whole.process_mono(&signal);

        let mut split = AudioResampler::new(48_000, 44_100, 1).unwrap();
        let mut actual = Vec::new();
        for chunk in signal.chunks(777) {
            actual.extend(split.process_mono(chunk));
        }

        assert!(!expected.is_empty());
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_channels_stay_aligned() {
        let mut resampler = AudioResampler::new(336_000, 48_000, 2).unwrap();
        let left = vec![0.5; 5_000];
        let right = vec![-0.5; 5_000];
        let mut out_l = Vec::<f32>::new();
        let mut out_r = Vec::<f32>::new();
        for _ in 0..4 {
            let out = resampler.process(&[left.as_slice(), right.as_slice()]);
            assert_eq!(out.len(), 2);
            assert_eq!(out[0].len(), out[1].len());
            out_l.extend(&out[0]);
            out_r.extend(&out[1]);
        }
        // steady state after the interpolator delay
        let last = out_l.len() - 1;
        assert!((out_l[last] - 0.5).abs() < 0.02);
        assert!((out_r[last] + 0.5).abs() < 0.02);
    }

    #[test]
    fn test_tone_level_preserved() {
        let mut resampler = AudioResampler::new(48_000, 22_050, 1).unwrap();
        let signal: Vec<f32> = (0..48_000)
            .map(|i| 0.5 * (2.0 * PI * 1_000.0 * i as f32 / 48_000.0).sin())
            .collect();
        let output = resampler.process_mono(&signal);
        let peak = output[5_000..]
            .iter()
            .fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak > 0.48 && peak < 0.52, "unexpected peak {}", peak);
    }
}
