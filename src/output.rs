//! Buffered line output for the kept and excluded streams.

use crate::error::Result;
use std::io::{BufWriter, Write};

/// Buffer size for LineWriter (1MB default).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Line-oriented output writer with a large buffer.
pub struct LineWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> LineWriter<W> {
    /// Create a new LineWriter with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new LineWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
        }
    }

    /// Write a line followed by a newline.
    #[inline]
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_raw(line.as_bytes())
    }

    /// Write raw line bytes, unchanged, followed by a newline.
    #[inline]
    pub fn write_raw(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write_line("a\tb").unwrap();
        writer.write_line("").unwrap();
        writer.write_raw(b"caf\xe9").unwrap();
        let out = writer.into_inner().unwrap();
        assert_eq!(out, b"a\tb\n\ncaf\xe9\n");
    }
}
