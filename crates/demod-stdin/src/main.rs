//! Demodulate raw I/Q samples into 16-bit PCM
//!
//! Reads unsigned 8-bit or signed 16-bit interleaved I/Q samples, demodulates
//! them as AM, narrowband FM or wideband FM and writes signed 16-bit
//! little-endian PCM, mono or interleaved stereo.
//!
//! # Usage Examples
//!
//! ## Broadcast FM from an RTL-SDR, played with sox
//! ```bash
//! rtl_sdr -f 105.1M -s 1024000 - | demod-stdin --mod WBFM --inputtype u8 --channels 2 \
//!     | play -t raw -r 48000 -e signed -b 16 -c 2 -
//! ```
//!
//! ## NBFM with a squared output for multimon-ng
//! ```bash
//! demod-stdin --mod NBFM --maxf 5000 --outrate 22050 --squaredoutput \
//!     --input ~/captures/pager.iq | multimon-ng -t raw -a POCSAG1200 -
//! ```

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgAction, Parser};
use tracing::{error, info};

use iqdemod::iqread::expanduser;
use iqdemod::{DemodConfig, InputFormat, Modulation, Pipeline};

#[derive(Parser, Debug)]
#[command(author, version, about = "Demodulate raw I/Q samples into 16-bit PCM", long_about = None)]
struct Args {
    /// Modulation: AM, WBFM or NBFM
    #[arg(long = "mod", default_value = "AM", value_parser = Modulation::from_str)]
    modulation: Modulation,

    /// Output channels (1 = mono, 2 = interleaved stereo)
    #[arg(long, default_value_t = 1)]
    channels: u8,

    /// Maximum frequency deviation in Hz (NBFM)
    #[arg(long, default_value_t = 10_000)]
    maxf: u32,

    /// Channel bandwidth in Hz (AM)
    #[arg(long, default_value_t = 10_000)]
    bandwidth: u32,

    /// Bytes read per block (rounded down to an even number)
    #[arg(long, default_value_t = 65_536)]
    blocksize: usize,

    /// Input sample rate in Hz
    #[arg(long, default_value_t = 1_024_000)]
    inrate: u32,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    outrate: u32,

    /// Input sample encoding: u8 or i16
    #[arg(long, default_value = "i16", value_parser = InputFormat::from_str)]
    inputtype: InputFormat,

    /// Hard-limit the output to ±32767 (for tone decoders)
    #[arg(long, default_value_t = false)]
    squaredoutput: bool,

    /// Read samples from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write PCM to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> iqdemod::Result<()> {
    let config = DemodConfig {
        modulation: args.modulation,
        channels: args.channels,
        max_deviation: args.maxf,
        bandwidth: args.bandwidth,
        block_size: args.blocksize,
        in_rate: args.inrate,
        out_rate: args.outrate,
        input_format: args.inputtype,
        squared_output: args.squaredoutput,
    }
    .validate()?;

    info!(
        "{} demodulation, {} Hz -> {} Hz, {} channel(s){}",
        config.modulation,
        config.in_rate,
        config.out_rate,
        config.channels,
        if config.squared_output { ", squared" } else { "" }
    );

    let mut pipeline = Pipeline::from_config(&config)?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(expanduser(path.clone()))?)),
        None => Box::new(BufWriter::new(stdout().lock())),
    };

    match &args.input {
        Some(path) => {
            let file = File::open(expanduser(path.clone()))?;
            pipeline.run(std::io::BufReader::new(file), output)?;
        }
        None => {
            pipeline.run(std::io::stdin().lock(), output)?;
        }
    }
    Ok(())
}
