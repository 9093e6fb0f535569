//! Physical line splitting, over in-memory text or a decoded byte stream

use crate::error::Result;
use encoding_rs::{CoderResult, Decoder, Encoding};
use std::io::BufRead;

/// Iterator over the physical lines of a text
///
/// Lines end at `\r\n`, `\n` or a lone `\r`; the terminator is not part of the
/// yielded line. A terminator at the very end of the text does not start an
/// extra empty line.
pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> PhysicalLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(pos) => {
                let line = &self.rest[..pos];
                let after = &self.rest[pos..];
                let skip = if after.starts_with("\r\n") { 2 } else { 1 };
                self.rest = &after[skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// Physical lines of a byte stream, decoded as they are read
///
/// The text is decoded chunk by chunk with BOM sniffing: a UTF-8, UTF-16LE or
/// UTF-16BE byte order mark overrides the fallback encoding. Only the line
/// being assembled is held in memory. Line terminators follow
/// [`PhysicalLines`].
pub struct DecodedLines<R> {
    reader: R,
    decoder: Decoder,
    text: String,
    start: usize,
    eof: bool,
    had_errors: bool,
}

impl<R: BufRead> DecodedLines<R> {
    pub fn new(reader: R, fallback: &'static Encoding) -> Self {
        Self {
            reader,
            decoder: fallback.new_decoder(),
            text: String::new(),
            start: 0,
            eof: false,
            had_errors: false,
        }
    }

    /// Encoding in use, known for sure once the first bytes were decoded
    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.encoding()
    }

    /// Whether malformed byte sequences were replaced so far
    pub fn had_errors(&self) -> bool {
        self.had_errors
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            let pending = &self.text[self.start..];
            if let Some(pos) = pending.find(|c: char| c == '\r' || c == '\n') {
                let after = &pending[pos..];
                // a trailing \r may be the first half of \r\n
                if after != "\r" || self.eof {
                    let skip = if after.starts_with("\r\n") { 2 } else { 1 };
                    let line = pending[..pos].to_string();
                    self.start += pos + skip;
                    return Ok(Some(line));
                }
            } else if self.eof {
                if pending.is_empty() {
                    return Ok(None);
                }
                let line = pending.to_string();
                self.start = self.text.len();
                return Ok(Some(line));
            }
            self.fill()?;
        }
    }

    fn fill(&mut self) -> Result<()> {
        self.text.drain(..self.start);
        self.start = 0;

        let chunk = self.reader.fill_buf()?;
        let last = chunk.is_empty();
        let mut src = chunk;
        loop {
            let (result, read, replaced) = self.decoder.decode_to_string(src, &mut self.text, last);
            self.had_errors |= replaced;
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => {
                    let needed = self
                        .decoder
                        .max_utf8_buffer_length(src.len())
                        .unwrap_or(src.len() * 3 + 16);
                    self.text.reserve(needed.max(16));
                }
            }
        }

        let consumed = chunk.len();
        self.reader.consume(consumed);
        self.eof = last;
        Ok(())
    }
}

impl<R: BufRead> Iterator for DecodedLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        self.next_line().transpose()
    }
}
