//! Raw Block Reading Module
//!
//! This module reads raw sample bytes in fixed-size blocks from any byte
//! stream (standard input, a file, a pipe). One buffer is allocated per
//! reader and overwritten on every read, so memory use is bounded by the
//! configured block size no matter how long the stream runs.
use std::io::{ErrorKind, Read};
use std::path::PathBuf;

/**
 * Synchronous Block Reader
 */
pub struct BlockReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            buffer: vec![0u8; block_size],
        }
    }

    /// Read the next block.
    ///
    /// Keeps reading until the block is full or the stream ends, so a block
    /// shorter than `block_size` is only ever returned right before the end
    /// of the stream. Returns `None` once no byte at all could be read.
    pub fn next_block(&mut self) -> Result<Option<&[u8]>, std::io::Error> {
        let mut total_read = 0;
        while total_read < self.buffer.len() {
            match self.reader.read(&mut self.buffer[total_read..]) {
                Ok(0) => break,
                Ok(n) => total_read += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if total_read == 0 {
            Ok(None)
        } else {
            Ok(Some(&self.buffer[..total_read]))
        }
    }
}

/// Replace a leading `~` with the user's home directory.
pub fn expanduser(path: PathBuf) -> PathBuf {
    if let Some(stripped) = path.to_str().and_then(|p| p.strip_prefix("~"))
        && let Some(home_dir) = dirs::home_dir()
    {
        return home_dir.join(stripped.trim_start_matches('/'));
    }
    path
}
