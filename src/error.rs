//! Error handling for the iqdemod library
//!
//! A single error type covers the three ways a run can fail: an unusable
//! configuration (detected before any sample is read), an I/O failure on the
//! input or output stream, and a decoder that cannot be built for the
//! requested rates.

use std::io;

use thiserror::Error;

/// A specialized Result type for iqdemod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for iqdemod operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the sample or PCM stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unknown option name or out-of-range configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decoder cannot be constructed with the given parameters
    #[error("Decoder error: {0}")]
    Decoder(String),
}

impl Error {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a decoder error with a custom message
    pub fn decoder<S: Into<String>>(msg: S) -> Self {
        Error::Decoder(msg.into())
    }
}
