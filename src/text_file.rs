//! Line-oriented reader for Praat short text files
//!
//! Short text files store one value per line. This reader hands out lines
//! one at a time, normalises `\r\n` to `\n`, and keeps a 1-based line counter
//! so numeric parse failures can point at the offending line.

use crate::{PitchExportError, Result};
use std::io::BufRead;

/// Sequential reader over the lines of a Praat text file
pub struct TextReader<R> {
    inner: R,
    /// Number of lines consumed so far
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TextReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of lines consumed so far (equals the 1-based number of the last line read)
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read the next line as raw bytes including its terminator, or `None` at end of file.
    ///
    /// A `\r\n` terminator is returned as `\n`. The last line of a file may
    /// have no terminator at all. Nothing is assumed about the encoding, so a
    /// binary file can still be recognised as not being a text file.
    pub fn next_raw_line(&mut self) -> Result<Option<&[u8]>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        if self.buf.ends_with(b"\r\n") {
            self.buf.truncate(self.buf.len() - 2);
            self.buf.push(b'\n');
        }
        Ok(Some(self.buf.as_slice()))
    }

    /// Read the next line as text, or `None` at end of file
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        if self.next_raw_line()?.is_none() {
            return Ok(None);
        }
        match std::str::from_utf8(&self.buf) {
            Ok(text) => Ok(Some(text)),
            Err(_) => Err(self.parse_error("line is not valid UTF-8".to_string())),
        }
    }

    /// Consume one line without looking at it
    pub fn skip_line(&mut self) -> Result<()> {
        self.next_value_line("ignored line").map(|_| ())
    }

    /// Read a line holding a real number
    pub fn read_f64(&mut self, what: &str) -> Result<f64> {
        let text = self.next_value_line(what)?;
        let value = text.parse::<f64>();
        value.map_err(|_| self.parse_error(format!("expected a number for {}, found {:?}", what, text)))
    }

    /// Read a line holding an integer
    pub fn read_int(&mut self, what: &str) -> Result<i64> {
        let text = self.next_value_line(what)?;
        let value = text.parse::<i64>();
        value.map_err(|_| self.parse_error(format!("expected an integer for {}, found {:?}", what, text)))
    }

    /// Next line with surrounding whitespace removed, owned so the reader stays borrowable
    fn next_value_line(&mut self, what: &str) -> Result<String> {
        match self.next_line()? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(PitchExportError::Parse {
                line: self.line + 1,
                reason: format!("unexpected end of file while reading {}", what),
            }),
        }
    }

    fn parse_error(&self, reason: String) -> PitchExportError {
        PitchExportError::Parse {
            line: self.line,
            reason,
        }
    }
}
