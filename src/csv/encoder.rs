//! CSV encoding with the reader's quoting dialect

use super::QUOTE;
use crate::types::Separator;

/// CSV encoder for writing fields the reader parses back unchanged
#[derive(Debug, Clone, Copy)]
pub struct CsvEncoder {
    separator: Separator,
}

impl CsvEncoder {
    pub fn new(separator: Separator) -> Self {
        Self { separator }
    }

    /// Encode entire row into buffer, without line terminator
    pub fn encode_row<I, S>(&self, fields: I, buffer: &mut Vec<u8>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                buffer.push(self.separator.as_char() as u8);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    /// Encode single field with proper quoting/escaping
    ///
    /// Quotes are doubled inside a quoted field; separators, line breaks and
    /// surrounding whitespace only need the field to be quoted.
    pub fn encode_field(&self, field: &str, buffer: &mut Vec<u8>) {
        if field.contains(QUOTE) {
            buffer.push(QUOTE as u8);
            for byte in field.bytes() {
                if byte == QUOTE as u8 {
                    // Escape quotes by doubling: " -> ""
                    buffer.push(QUOTE as u8);
                }
                buffer.push(byte);
            }
            buffer.push(QUOTE as u8);
        } else if self.needs_quoting(field) {
            buffer.push(QUOTE as u8);
            buffer.extend_from_slice(field.as_bytes());
            buffer.push(QUOTE as u8);
        } else {
            buffer.extend_from_slice(field.as_bytes());
        }
    }

    fn needs_quoting(&self, field: &str) -> bool {
        field.contains(self.separator.as_char())
            || field.contains(|c: char| c == '\n' || c == '\r')
            || field.starts_with(char::is_whitespace)
            || field.ends_with(char::is_whitespace)
    }
}
