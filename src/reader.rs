//! Buffered line reader that tracks line numbers.

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A streaming line reader.
///
/// Yields the raw bytes of each line without its terminator (`\n` or
/// `\r\n`) and keeps a 1-based count of every line read, blank ones
/// included. Lines need not be valid UTF-8.
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl LineReader<File> {
    /// Open a file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> LineReader<R> {
    /// Create a new reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, 256 * 1024)
    }

    /// Create a reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Read the next line and its 1-based number. The returned slice is
    /// valid until the next call.
    pub fn next_line(&mut self) -> Result<Option<(usize, &[u8])>> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut line = self.buffer.as_slice();
        if let Some(stripped) = line.strip_suffix(b"\n") {
            line = stripped.strip_suffix(b"\r").unwrap_or(stripped);
        }
        Ok(Some((self.line_number, line)))
    }

    /// Number of lines read so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
