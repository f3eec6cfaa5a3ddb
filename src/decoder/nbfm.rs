//! Narrowband FM decoder.
//!
//! ```text
//! I/Q → low-pass (0.8 · max deviation) + downsample to 48 kHz → FM demod → 10 kHz low-pass → resample → audio
//! ```

use super::{Decoder, IqPairer, StereoAudio};
use crate::dsp::DspBlock;
use crate::dsp::downsampler::Downsampler;
use crate::dsp::filters::{FirFilter, low_pass_taps};
use crate::dsp::fm::FmDemodulator;
use crate::dsp::resampler::AudioResampler;
use crate::error::Result;

const INTER_RATE: u32 = 48_000;
const CHANNEL_TAPS: usize = 351;
const AUDIO_CUTOFF: f32 = 10_000.0;
const AUDIO_TAPS: usize = 41;

pub struct NbfmDecoder {
    iq: IqPairer,
    channel: Downsampler,
    demod: FmDemodulator,
    audio_filter: FirFilter,
    resampler: AudioResampler,
}

impl NbfmDecoder {
    /// # Arguments
    ///
    /// * `in_rate` - I/Q sample rate in Hz
    /// * `out_rate` - audio sample rate in Hz
    /// * `max_deviation` - frequency deviation in Hz that maps to full scale
    pub fn new(in_rate: u32, out_rate: u32, max_deviation: u32) -> Result<Self> {
        let max_f = max_deviation as f32;
        let channel_taps = low_pass_taps(max_f * 0.8, in_rate as f32, CHANNEL_TAPS);
        Ok(Self {
            iq: IqPairer::new(),
            channel: Downsampler::new(in_rate, INTER_RATE, channel_taps),
            demod: FmDemodulator::new(INTER_RATE as f32, max_f),
            audio_filter: FirFilter::low_pass(AUDIO_CUTOFF, INTER_RATE as f32, AUDIO_TAPS),
            resampler: AudioResampler::new(INTER_RATE, out_rate, 1)?,
        })
    }
}

impl Decoder for NbfmDecoder {
    fn decode(&mut self, samples: &[f32], stereo: bool) -> StereoAudio {
        let baseband = self.channel.process(&self.iq.pair(samples));
        let demodulated = self.demod.process(&baseband);
        let audio = self.resampler.process_mono(&self.audio_filter.process(&demodulated));
        if stereo {
            StereoAudio::dual_mono(audio)
        } else {
            StereoAudio::mono(audio)
        }
    }
}
