//! FM broadcast stereo separation.
//!
//! A stereo FM multiplex (MPX) signal carries `L+R` in baseband, a 19 kHz
//! pilot tone and `L-R` double-sideband on a 38 kHz subcarrier locked to
//! twice the pilot phase. [`StereoSeparator`] tracks the pilot with a PLL and
//! mixes the subcarrier back down to baseband.
//!
//! The pilot band-pass is a causal FIR, so the pilot the PLL sees lags the
//! MPX by the filter's group delay. The MPX is run through a matching delay
//! line and both outputs of [`StereoSeparator::process`] are aligned.

use std::collections::VecDeque;
use std::f64::consts::PI;

use tracing::debug;

use crate::dsp::filters::FirFilter;

const PILOT_FREQ: f64 = 19_000.0;
const PILOT_TAPS: usize = 201;
/// In-phase pilot level above which the pilot counts as present
const PILOT_THRESHOLD: f64 = 0.01;

/// One block of separated MPX.
pub struct Separated {
    /// MPX delayed to line up with `diff` (carries L+R)
    pub mono: Vec<f32>,
    /// Recovered L-R, before low-pass filtering
    pub diff: Vec<f32>,
    /// Whether a pilot was present at the end of the block
    pub pilot: bool,
}

/// Stereo decoder using a PLL locked to the 19 kHz pilot tone.
pub struct StereoSeparator {
    pll_phase: f64,
    pll_freq: f64,
    phase_inc: f64,
    kp: f64,
    ki: f64,
    error_lpf_state: f64,
    error_lpf_alpha: f64,
    pilot_level: f64,
    pilot_bandpass: FirFilter,
    delay: VecDeque<f32>,
    locked: bool,
}

impl StereoSeparator {
    /// Create a separator for MPX sampled at `sample_rate` Hz.
    pub fn new(sample_rate: f32) -> Self {
        // Phase error low-pass around 50 Hz removes the 2*f_pilot mixing product
        let fc = 50.0;
        let error_lpf_alpha = 2.0 * PI * fc / (sample_rate as f64 + 2.0 * PI * fc);

        Self {
            pll_phase: 0.0,
            pll_freq: PILOT_FREQ,
            phase_inc: 2.0 * PI / sample_rate as f64,
            kp: 0.01,
            ki: 5e-6,
            error_lpf_state: 0.0,
            error_lpf_alpha,
            pilot_level: 0.0,
            pilot_bandpass: FirFilter::band_pass(16_000.0, 22_000.0, sample_rate, PILOT_TAPS),
            delay: VecDeque::from(vec![0.0; PILOT_TAPS / 2]),
            locked: false,
        }
    }

    /// Separate a block of MPX samples.
    pub fn process(&mut self, mpx: &[f32]) -> Separated {
        let n = mpx.len();
        let mut mono = Vec::with_capacity(n);
        let mut diff = Vec::with_capacity(n);

        for &x in mpx {
            let pilot = self.pilot_bandpass.push(x) as f64;

            // Pilot = A*sin(phi): pilot*cos(pll_phase) averages to A/2*sin(phi - pll_phase)
            let raw_error = pilot * self.pll_phase.cos();
            self.error_lpf_state += self.error_lpf_alpha * (raw_error - self.error_lpf_state);
            let error = self.error_lpf_state;

            // In-phase component is A/2 once locked, ~0 otherwise
            let in_phase = 2.0 * pilot * self.pll_phase.sin();
            self.pilot_level += self.error_lpf_alpha * (in_phase - self.pilot_level);

            self.pll_freq = (self.pll_freq + self.ki * error)
                .clamp(PILOT_FREQ * 0.99, PILOT_FREQ * 1.01);
            self.pll_phase += self.phase_inc * self.pll_freq + self.kp * error;
            if self.pll_phase > PI {
                self.pll_phase -= 2.0 * PI;
            } else if self.pll_phase < -PI {
                self.pll_phase += 2.0 * PI;
            }

            self.delay.push_back(x);
            let delayed = self.delay.pop_front().unwrap_or(0.0);
            let carrier_38 = (2.0 * self.pll_phase).sin() as f32;
            mono.push(delayed);
            diff.push(2.0 * delayed * carrier_38);
        }

        let locked = self.pilot_level > PILOT_THRESHOLD;
        if locked != self.locked {
            debug!(
                "stereo pilot {} (level {:.4}, {:.1} Hz)",
                if locked { "acquired" } else { "lost" },
                self.pilot_level,
                self.pll_freq
            );
            self.locked = locked;
        }

        Separated {
            mono,
            diff,
            pilot: locked,
        }
    }

    /// Delay a block without tracking the pilot, for mono reception.
    pub fn bypass(&mut self, mpx: &[f32]) -> Vec<f32> {
        mpx.iter()
            .map(|&x| {
                self.delay.push_back(x);
                self.delay.pop_front().unwrap_or(0.0)
            })
            .collect()
    }
}
