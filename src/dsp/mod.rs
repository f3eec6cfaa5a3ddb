//! Digital Signal Processing (DSP) module.
//!
//! Building blocks the demodulators are assembled from. Every block keeps its
//! state between calls, so a stream may be fed in blocks of any size and the
//! result is the same as processing it in one piece.
//!
//! ## Pipelines
//!
//! ```text
//! AM:   I/Q → Downsampler → AmDemodulator → FirFilter → AudioResampler → audio
//! NBFM: I/Q → Downsampler → FmDemodulator → FirFilter → AudioResampler → audio
//! WBFM: I/Q → Downsampler → FmDemodulator → StereoSeparator ┬→ FirFilter ┬→ AudioResampler ┬→ Deemphasis → L
//!                                                           └→ FirFilter ┘   (2 channels)  └→ Deemphasis → R
//! ```
//!
//! # Modules
//! - [`downsampler`]: fractional-ratio channel filtering and rate reduction
//! - [`filters`]: FIR design and streaming FIR filtering
//! - [`am`]: envelope detection
//! - [`fm`]: FM demodulation and de-emphasis
//! - [`stereo`]: 19 kHz pilot tracking and L-R recovery
//! - [`resampler`]: conversion to the output audio rate
//!
//! # Traits
//! - [`DspBlock`]: a single-stream block turning a slice of samples into a
//!   vector of samples
//!
//! # Thread Safety
//!
//! DSP blocks maintain internal state and are not meant to be shared between
//! threads; each decoder owns its blocks.

pub mod am;
pub mod downsampler;
pub mod filters;
pub mod fm;
pub mod resampler;
pub mod stereo;

pub trait DspBlock {
    type Input;
    type Output;

    fn process(&mut self, data: &[Self::Input]) -> Vec<Self::Output>;
}
