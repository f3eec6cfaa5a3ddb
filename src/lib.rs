#![doc = include_str!("../readme.md")]

pub mod config;
pub mod decoder;
pub mod dsp;
pub mod error;
pub mod iqread;
pub mod pcm;
pub mod pipeline;

pub use config::{DemodConfig, InputFormat, Modulation};
pub use decoder::{AnyDecoder, Decoder, StereoAudio};
pub use error::{Error, Result};
pub use pcm::{PcmEncoder, quantize};
pub use pipeline::{Pipeline, PipelineStats};

/// Convert raw sample bytes into normalized values in about [-1, 1).
///
/// - `U8`: one value per byte, `(b - 128) / 128`
/// - `I16`: one value per little-endian byte pair, `v / 32768`; a lone
///   trailing byte is not a sample and is dropped
///
/// The values keep the stream's interleaved I/Q order.
pub fn normalize(format: InputFormat, buffer: &[u8]) -> Vec<f32> {
    match format {
        InputFormat::U8 => buffer.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect(),
        InputFormat::I16 => buffer
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / 32768.0)
            .collect(),
    }
}
