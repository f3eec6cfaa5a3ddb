//! Wideband (broadcast) FM decoder.
//!
//! The I/Q stream is brought down to a 336 kHz intermediate rate, wide
//! enough for the whole multiplex (mono audio, 19 kHz pilot, 38 kHz stereo
//! subcarrier). After FM demodulation the mono audio is low-passed at 15 kHz,
//! resampled to the output rate and de-emphasised. When stereo is requested
//! and a pilot is present, L-R is recovered and combined with the mono signal.
//!
//! In stereo mode L+R and L-R go through one two-channel resampler, so both
//! stay sample-aligned whatever the block sizes.

use super::{Decoder, IqPairer, StereoAudio};
use crate::dsp::DspBlock;
use crate::dsp::downsampler::Downsampler;
use crate::dsp::filters::{FirFilter, low_pass_taps};
use crate::dsp::fm::{DeemphasisFilter, FmDemodulator};
use crate::dsp::resampler::AudioResampler;
use crate::dsp::stereo::StereoSeparator;
use crate::error::Result;

const INTER_RATE: u32 = 336_000;
const MAX_DEVIATION: f32 = 75_000.0;
const CHANNEL_TAPS: usize = 51;
const AUDIO_CUTOFF: f32 = 15_000.0;
const AUDIO_TAPS: usize = 255;
const DEEMPHASIS_TAU: f32 = 50e-6;

pub struct WbfmDecoder {
    iq: IqPairer,
    channel: Downsampler,
    demod: FmDemodulator,
    separator: StereoSeparator,
    mono_filter: FirFilter,
    diff_filter: FirFilter,
    mono_audio: AudioResampler,
    stereo_audio: AudioResampler,
    left_deemphasis: DeemphasisFilter,
    right_deemphasis: DeemphasisFilter,
}

impl WbfmDecoder {
    pub fn new(in_rate: u32, out_rate: u32) -> Result<Self> {
        let channel_taps = low_pass_taps(MAX_DEVIATION * 0.8, in_rate as f32, CHANNEL_TAPS);
        let audio_taps = low_pass_taps(AUDIO_CUTOFF, INTER_RATE as f32, AUDIO_TAPS);
        Ok(Self {
            iq: IqPairer::new(),
            channel: Downsampler::new(in_rate, INTER_RATE, channel_taps),
            demod: FmDemodulator::new(INTER_RATE as f32, MAX_DEVIATION),
            separator: StereoSeparator::new(INTER_RATE as f32),
            mono_filter: FirFilter::new(audio_taps.clone()),
            diff_filter: FirFilter::new(audio_taps),
            mono_audio: AudioResampler::new(INTER_RATE, out_rate, 1)?,
            stereo_audio: AudioResampler::new(INTER_RATE, out_rate, 2)?,
            left_deemphasis: DeemphasisFilter::new(out_rate as f32, DEEMPHASIS_TAU),
            right_deemphasis: DeemphasisFilter::new(out_rate as f32, DEEMPHASIS_TAU),
        })
    }
}

impl Decoder for WbfmDecoder {
    fn decode(&mut self, samples: &[f32], stereo: bool) -> StereoAudio {
        let baseband = self.channel.process(&self.iq.pair(samples));
        let mpx = self.demod.process(&baseband);

        if !stereo {
            let mono = self.mono_filter.process(&self.separator.bypass(&mpx));
            let mono = self.mono_audio.process_mono(&mono);
            return StereoAudio::mono(self.left_deemphasis.process(&mono));
        }

        let separated = self.separator.process(&mpx);
        let mono = self.mono_filter.process(&separated.mono);
        let diff = self.diff_filter.process(&separated.diff);
        let mut resampled = self.stereo_audio.process(&[mono.as_slice(), diff.as_slice()]);
        let diff = resampled.pop().unwrap_or_default();
        let mono = resampled.pop().unwrap_or_default();

        let (left, right): (Vec<f32>, Vec<f32>) = if separated.pilot {
            mono.iter().zip(&diff).map(|(m, d)| (m + d, m - d)).unzip()
        } else {
            (mono.clone(), mono)
        };

        StereoAudio {
            left: self.left_deemphasis.process(&left),
            right: self.right_deemphasis.process(&right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// FM-modulate a baseband signal onto I/Q at `rate` with 75 kHz deviation
    fn modulate(baseband: &[f32], rate: f32) -> Vec<f32> {
        let mut phase = 0.0f32;
        let mut out = Vec::with_capacity(baseband.len() * 2);
        for &m in baseband {
            phase += 2.0 * PI * MAX_DEVIATION * m / rate;
            phase %= 2.0 * PI;
            out.push(0.8 * phase.cos());
            out.push(0.8 * phase.sin());
        }
        out
    }

    /// Stereo multiplex with a 1 kHz tone on the left channel only
    fn left_only_mpx(n: usize, rate: f32) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / rate;
                let left = 0.4 * (2.0 * PI * 1_000.0 * t).sin();
                let pilot_phase = 2.0 * PI * 19_000.0 * t;
                0.45 * left + 0.1 * pilot_phase.sin() + 0.45 * left * (2.0 * pilot_phase).sin()
            })
            .collect()
    }

    fn energy(samples: &[f32]) -> f32 {
        samples.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_wbfm_output_length() {
        let mut decoder = WbfmDecoder::new(1_344_000, 48_000).unwrap();
        let audio = decoder.decode(&vec![0.0; 2 * 134_400], false);
        assert!(audio.len() > 4_000 && audio.len() <= 4_800, "got {}", audio.len());
        assert!(audio.right.is_empty());
    }

    #[test]
    fn test_wbfm_mono_tone() {
        let rate = 672_000.0;
        let baseband: Vec<f32> = (0..336_000)
            .map(|i| 0.5 * (2.0 * PI * 1_000.0 * i as f32 / rate).sin())
            .collect();
        let mut decoder = WbfmDecoder::new(rate as u32, 48_000).unwrap();
        let audio = decoder.decode(&modulate(&baseband, rate), false);
        assert!(audio.len() > 23_000 && audio.len() <= 24_000);

        let peak = audio.left[12_000..]
            .iter()
            .fold(0.0f32, |a, &b| a.max(b.abs()));
        // 50 µs de-emphasis barely touches 1 kHz
        assert!(peak > 0.4 && peak < 0.55, "unexpected peak {}", peak);
    }

    #[test]
    fn test_wbfm_stereo_without_pilot_is_dual_mono() {
        let rate = 672_000.0;
        let baseband: Vec<f32> = (0..67_200)
            .map(|i| 0.3 * (2.0 * PI * 700.0 * i as f32 / rate).sin())
            .collect();
        let mut decoder = WbfmDecoder::new(rate as u32, 48_000).unwrap();
        let audio = decoder.decode(&modulate(&baseband, rate), true);
        assert_eq!(audio.left.len(), audio.right.len());
        assert_eq!(audio.left, audio.right);
    }

    #[test]
    fn test_wbfm_pilot_separates_channels() {
        let rate = 672_000.0;
        let iq = modulate(&left_only_mpx(672_000, rate), rate);
        let mut decoder = WbfmDecoder::new(rate as u32, 48_000).unwrap();

        let mut left = Vec::new();
        let mut right = Vec::new();
        for block in iq.chunks(65_536) {
            let audio = decoder.decode(block, true);
            assert_eq!(audio.left.len(), audio.right.len());
            left.extend(audio.left);
            right.extend(audio.right);
        }

        // Skip PLL acquisition
        let start = left.len() / 2;
        let e_left = energy(&left[start..]);
        let e_right = energy(&right[start..]);
        assert!(e_left > 0.0);
        assert!(e_right < 0.2 * e_left, "left {} right {}", e_left, e_right);
    }

    #[test]
    fn test_wbfm_stereo_block_split_matches_whole() {
        let rate = 672_000.0;
        let iq = modulate(&left_only_mpx(134_400, rate), rate);

        let mut whole = WbfmDecoder::new(rate as u32, 44_100).unwrap();
        let expected = whole.decode(&iq, true);

        let mut split = WbfmDecoder::new(rate as u32, 44_100).unwrap();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for block in iq.chunks(10_001) {
            let audio = split.decode(block, true);
            left.extend(audio.left);
            right.extend(audio.right);
        }
        assert_eq!(expected.left.len(), left.len());
        assert_eq!(expected.right.len(), right.len());
    }
}
