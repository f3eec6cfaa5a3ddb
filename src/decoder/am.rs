//! AM decoder.
//!
//! ```text
//! I/Q → low-pass (bandwidth/2) + downsample to 48 kHz → envelope → 10 kHz low-pass → resample → audio
//! ```

use super::{Decoder, IqPairer, StereoAudio};
use crate::dsp::DspBlock;
use crate::dsp::am::AmDemodulator;
use crate::dsp::downsampler::Downsampler;
use crate::dsp::filters::{FirFilter, low_pass_taps};
use crate::dsp::resampler::AudioResampler;
use crate::error::Result;

const INTER_RATE: u32 = 48_000;
const CHANNEL_TAPS: usize = 351;
const AUDIO_CUTOFF: f32 = 10_000.0;
const AUDIO_TAPS: usize = 41;

pub struct AmDecoder {
    iq: IqPairer,
    channel: Downsampler,
    demod: AmDemodulator,
    audio_filter: FirFilter,
    resampler: AudioResampler,
}

impl AmDecoder {
    /// # Arguments
    ///
    /// * `in_rate` - I/Q sample rate in Hz
    /// * `out_rate` - audio sample rate in Hz
    /// * `bandwidth` - width of the AM channel in Hz, centred on 0 Hz
    pub fn new(in_rate: u32, out_rate: u32, bandwidth: u32) -> Result<Self> {
        let channel_taps = low_pass_taps(bandwidth as f32 / 2.0, in_rate as f32, CHANNEL_TAPS);
        Ok(Self {
            iq: IqPairer::new(),
            channel: Downsampler::new(in_rate, INTER_RATE, channel_taps),
            demod: AmDemodulator::new(),
            audio_filter: FirFilter::low_pass(AUDIO_CUTOFF, INTER_RATE as f32, AUDIO_TAPS),
            resampler: AudioResampler::new(INTER_RATE, out_rate, 1)?,
        })
    }
}

impl Decoder for AmDecoder {
    fn decode(&mut self, samples: &[f32], stereo: bool) -> StereoAudio {
        let baseband = self.channel.process(&self.iq.pair(samples));
        let envelope = self.demod.process(&baseband);
        let audio = self.resampler.process_mono(&self.audio_filter.process(&envelope));
        if stereo {
            StereoAudio::dual_mono(audio)
        } else {
            StereoAudio::mono(audio)
        }
    }
}
