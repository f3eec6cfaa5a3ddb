//! Demodulation strategies.
//!
//! A [`Decoder`] turns normalized raw samples into audio. The samples are
//! interleaved I/Q values as produced by [`crate::normalize`]; decoders pair
//! them up with an [`IqPairer`], which holds back a lone trailing I value
//! until its Q arrives in the next block.
//!
//! Decoders are stateful: filters, oscillators and rate converters carry over
//! from one call to the next, so blocks must be fed in stream order, exactly
//! once each.
//!
//! [`AnyDecoder`] selects one of the three implementations from a
//! [`DemodConfig`] and is what the pipeline normally drives.

use num_complex::Complex;

use crate::config::{DemodConfig, Modulation};
use crate::error::Result;

pub mod am;
pub mod nbfm;
pub mod wbfm;

pub use am::AmDecoder;
pub use nbfm::NbfmDecoder;
pub use wbfm::WbfmDecoder;

/// Audio produced from one block of samples.
///
/// `left` always holds the audio. `right` has the same length as `left` when
/// stereo output was requested and is empty otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoAudio {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoAudio {
    pub fn mono(left: Vec<f32>) -> Self {
        Self {
            left,
            right: Vec::new(),
        }
    }

    /// Duplicate a mono signal onto both channels.
    pub fn dual_mono(left: Vec<f32>) -> Self {
        let right = left.clone();
        Self { left, right }
    }

    /// Number of audio frames
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// A demodulation strategy.
pub trait Decoder {
    /// Demodulate one block of normalized interleaved I/Q values.
    ///
    /// The number of frames returned depends only on the total number of
    /// samples seen so far and the configured rates.
    fn decode(&mut self, samples: &[f32], stereo: bool) -> StereoAudio;
}

/// The decoder selected for a run.
pub enum AnyDecoder {
    Am(AmDecoder),
    Wbfm(WbfmDecoder),
    Nbfm(NbfmDecoder),
}

impl AnyDecoder {
    /// Build the decoder for the configured modulation.
    ///
    /// The configuration is checked with [`DemodConfig::validate`] first, so
    /// invalid tuning values are reported as [`Error::Config`].
    pub fn from_config(config: &DemodConfig) -> Result<Self> {
        let config = config.clone().validate()?;
        let decoder = match config.modulation {
            Modulation::Am => AnyDecoder::Am(AmDecoder::new(
                config.in_rate,
                config.out_rate,
                config.bandwidth,
            )?),
            Modulation::Wbfm => {
                AnyDecoder::Wbfm(WbfmDecoder::new(config.in_rate, config.out_rate)?)
            }
            Modulation::Nbfm => AnyDecoder::Nbfm(NbfmDecoder::new(
                config.in_rate,
                config.out_rate,
                config.max_deviation,
            )?),
        };
        Ok(decoder)
    }
}

impl Decoder for AnyDecoder {
    fn decode(&mut self, samples: &[f32], stereo: bool) -> StereoAudio {
        match self {
            AnyDecoder::Am(decoder) => decoder.decode(samples, stereo),
            AnyDecoder::Wbfm(decoder) => decoder.decode(samples, stereo),
            AnyDecoder::Nbfm(decoder) => decoder.decode(samples, stereo),
        }
    }
}

/// Pairs interleaved I/Q values into complex samples.
///
/// A block ending on an I value without its Q keeps that value and pairs it
/// with the first value of the next block, so I and Q never swap places when
/// blocks hold an odd number of values.
#[derive(Debug, Default)]
pub struct IqPairer {
    pending: Option<f32>,
}

impl IqPairer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(&mut self, samples: &[f32]) -> Vec<Complex<f32>> {
        let mut out = Vec::with_capacity(samples.len() / 2 + 1);
        let mut rest = samples;
        if let Some(i) = self.pending.take() {
            match rest.split_first() {
                Some((&q, tail)) => {
                    out.push(Complex::new(i, q));
                    rest = tail;
                }
                None => {
                    self.pending = Some(i);
                    return out;
                }
            }
        }
        let mut chunks = rest.chunks_exact(2);
        out.extend(chunks.by_ref().map(|c| Complex::new(c[0], c[1])));
        self.pending = chunks.remainder().first().copied();
        out
    }
}
