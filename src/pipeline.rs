//! Block streaming loop.
//!
//! [`Pipeline::run`] reads the input in blocks of the configured size, and
//! for each block normalizes the raw bytes, runs the decoder once and writes
//! the quantized PCM. A short final block is processed like any other; the
//! loop ends when a read returns no data at all.
//!
//! # Example
//!
//! ```
//! use iqdemod::{DemodConfig, InputFormat, Pipeline};
//!
//! let config = DemodConfig {
//!     input_format: InputFormat::U8,
//!     ..Default::default()
//! };
//! let mut pipeline = Pipeline::from_config(&config).unwrap();
//!
//! let input = vec![128u8; 4096];
//! let mut output = Vec::new();
//! let stats = pipeline.run(&input[..], &mut output).unwrap();
//! assert_eq!(stats.bytes_in, 4096);
//! assert_eq!(stats.bytes_out, output.len() as u64);
//! ```

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::config::{DemodConfig, InputFormat};
use crate::decoder::{AnyDecoder, Decoder};
use crate::error::Result;
use crate::iqread::BlockReader;
use crate::normalize;
use crate::pcm::PcmEncoder;

/// Totals for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub blocks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Raw samples in, PCM out.
pub struct Pipeline<D: Decoder> {
    decoder: D,
    input_format: InputFormat,
    block_size: usize,
    stereo: bool,
    encoder: PcmEncoder,
}

impl Pipeline<AnyDecoder> {
    /// Validate `config` and build the pipeline with its decoder.
    pub fn from_config(config: &DemodConfig) -> Result<Self> {
        let config = config.clone().validate()?;
        let decoder = AnyDecoder::from_config(&config)?;
        Ok(Self::new(decoder, &config))
    }
}

impl<D: Decoder> Pipeline<D> {
    /// Wrap an already constructed decoder.
    ///
    /// `config` is expected to be validated; the block size is taken as is.
    pub fn new(decoder: D, config: &DemodConfig) -> Self {
        Self {
            decoder,
            input_format: config.input_format,
            block_size: config.block_size,
            stereo: config.use_stereo(),
            encoder: PcmEncoder::new(config.channels, config.squared_output),
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Run one raw block through normalize → decode → quantize.
    ///
    /// PCM bytes are appended to `out`.
    pub fn process_block(&mut self, block: &[u8], out: &mut Vec<u8>) {
        let samples = normalize(self.input_format, block);
        let audio = self.decoder.decode(&samples, self.stereo);
        self.encoder.encode(&audio, out);
    }

    /// Stream `input` to `output` until the input is exhausted.
    ///
    /// Any read or write failure ends the run with an error.
    pub fn run<R: Read, W: Write>(&mut self, input: R, mut output: W) -> Result<PipelineStats> {
        info!(
            "demodulating {} input, {}-byte blocks, {} output",
            self.input_format,
            self.block_size,
            if self.stereo { "stereo" } else { "mono" }
        );

        let mut reader = BlockReader::new(input, self.block_size);
        let mut pcm = Vec::new();
        let mut stats = PipelineStats::default();

        while let Some(block) = reader.next_block()? {
            pcm.clear();
            let n = block.len();
            self.process_block(block, &mut pcm);
            output.write_all(&pcm)?;

            stats.blocks += 1;
            stats.bytes_in += n as u64;
            stats.bytes_out += pcm.len() as u64;
            debug!(
                "block {}: {} bytes in, {} frames out",
                stats.blocks,
                n,
                pcm.len() / self.encoder.frame_size()
            );
        }

        output.flush()?;
        info!(
            "end of input after {} blocks ({} bytes in, {} bytes out)",
            stats.blocks, stats.bytes_in, stats.bytes_out
        );
        Ok(stats)
    }
}
