//! PCM output encoding.
//!
//! Audio leaves the decoders as floating point with a nominal range of
//! [-1, 1]. [`quantize`] turns one value into a signed 16-bit sample and
//! [`PcmEncoder`] lays out whole blocks as little-endian interleaved frames.
//!
//! The output range is symmetric, [-32767, 32767]: -32768 is never emitted,
//! so the squared mode produces a wave with equal positive and negative
//! excursions.

use crate::decoder::StereoAudio;

/// Largest magnitude written to the output
pub const FULL_SCALE: i32 = 32767;

/// Quantize one audio value.
///
/// The value is scaled by 32767 and truncated toward zero. In `squared` mode
/// any non-zero result is pushed to ±32767 (a square wave for tone decoders
/// such as multimon-ng). Finally the result is clipped to ±32767, so
/// arbitrarily large inputs are safe.
pub fn quantize(sample: f32, squared: bool) -> i16 {
    // `as` saturates for out-of-range floats and maps NaN to 0
    let mut value = (sample * FULL_SCALE as f32) as i32;

    if squared {
        value = value.signum() * FULL_SCALE;
    }

    value.clamp(-FULL_SCALE, FULL_SCALE) as i16
}

/// Serializes decoded audio into 16-bit little-endian PCM.
#[derive(Debug, Clone, Copy)]
pub struct PcmEncoder {
    channels: u8,
    squared: bool,
}

impl PcmEncoder {
    /// `channels` is 2 for interleaved stereo; any other value writes mono.
    pub fn new(channels: u8, squared: bool) -> Self {
        Self { channels, squared }
    }

    /// Bytes written per audio frame
    pub fn frame_size(&self) -> usize {
        if self.stereo() { 4 } else { 2 }
    }

    fn stereo(&self) -> bool {
        self.channels == 2
    }

    /// Append one block of audio to `out`.
    ///
    /// Mono writes only the left channel. Stereo writes left then right for
    /// every frame; a missing right value is treated as silence.
    pub fn encode(&self, audio: &StereoAudio, out: &mut Vec<u8>) {
        out.reserve(audio.len() * self.frame_size());
        for (i, &left) in audio.left.iter().enumerate() {
            out.extend_from_slice(&quantize(left, self.squared).to_le_bytes());
            if self.stereo() {
                let right = audio.right.get(i).copied().unwrap_or(0.0);
                out.extend_from_slice(&quantize(right, self.squared).to_le_bytes());
            }
        }
    }
}
