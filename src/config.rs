//! Run configuration
//!
//! [`DemodConfig`] is the resolved set of parameters for one demodulation run.
//! Option names coming from the command line are mapped onto [`Modulation`]
//! and [`InputFormat`] through fixed lookup tables; anything not in a table is
//! rejected before the streaming loop starts.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Demodulation scheme
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Modulation {
    /// Amplitude modulation
    Am,
    /// Wideband (broadcast) frequency modulation
    Wbfm,
    /// Narrowband frequency modulation
    Nbfm,
}

const MODULATION_NAMES: &[(&str, Modulation)] = &[
    ("AM", Modulation::Am),
    ("WBFM", Modulation::Wbfm),
    ("NBFM", Modulation::Nbfm),
];

impl FromStr for Modulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MODULATION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, modulation)| modulation)
            .ok_or_else(|| Error::config(format!("Unknown modulation: {}", s)))
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MODULATION_NAMES
            .iter()
            .find(|(_, m)| m == self)
            .map_or("?", |(name, _)| name);
        f.write_str(name)
    }
}

/**
 * Raw Sample Encoding
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// Unsigned 8-bit, biased around 128 (RTL-SDR style)
    U8,
    /// Signed 16-bit little-endian
    I16,
}

const INPUT_FORMAT_NAMES: &[(&str, InputFormat)] =
    &[("u8", InputFormat::U8), ("i16", InputFormat::I16)];

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        INPUT_FORMAT_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, format)| format)
            .ok_or_else(|| Error::config(format!("Unknown input type: {}", s)))
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = INPUT_FORMAT_NAMES
            .iter()
            .find(|(_, fmt)| fmt == self)
            .map_or("?", |(name, _)| name);
        f.write_str(name)
    }
}

/**
 * Demodulation Run Configuration
 */
#[derive(Debug, Clone, PartialEq)]
pub struct DemodConfig {
    pub modulation: Modulation,
    /// Output channel count, 1 (mono) or 2 (stereo)
    pub channels: u8,
    /// Maximum frequency deviation in Hz (NBFM)
    pub max_deviation: u32,
    /// Channel bandwidth in Hz (AM)
    pub bandwidth: u32,
    /// Raw bytes read per block; always even
    pub block_size: usize,
    pub in_rate: u32,
    pub out_rate: u32,
    pub input_format: InputFormat,
    /// Hard-limit every sample to ±32767
    pub squared_output: bool,
}

impl Default for DemodConfig {
    fn default() -> Self {
        Self {
            modulation: Modulation::Am,
            channels: 1,
            max_deviation: 10_000,
            bandwidth: 10_000,
            block_size: 65_536,
            in_rate: 1_024_000,
            out_rate: 48_000,
            input_format: InputFormat::I16,
            squared_output: false,
        }
    }
}

impl DemodConfig {
    /// Check the invariants of a configuration and normalize the block size.
    ///
    /// The block size is rounded down to the nearest even number so that
    /// 16-bit samples never straddle two reads.
    pub fn validate(mut self) -> Result<Self> {
        if !matches!(self.channels, 1 | 2) {
            return Err(Error::config(format!(
                "Channel count must be 1 or 2, got {}",
                self.channels
            )));
        }
        self.block_size -= self.block_size % 2;
        if self.block_size < 2 {
            return Err(Error::config("Block size must be at least 2 bytes"));
        }
        if self.in_rate == 0 || self.out_rate == 0 {
            return Err(Error::config("Sample rates must be non-zero"));
        }
        if self.modulation == Modulation::Am && self.bandwidth == 0 {
            return Err(Error::config("AM bandwidth must be non-zero"));
        }
        if self.modulation == Modulation::Nbfm && self.max_deviation == 0 {
            return Err(Error::config("NBFM maximum deviation must be non-zero"));
        }
        Ok(self)
    }

    /// Whether the decoder should produce a right channel
    pub fn use_stereo(&self) -> bool {
        self.channels == 2
    }
}
