//! Line tokenizer: the quoting state machine fed one physical line at a time
//!
//! A logical row may span several physical lines when a quoted field holds
//! line breaks. The tokenizer keeps the partial field, the partial row and the
//! parser state between calls to [`LineTokenizer::feed_line`], and rebuilds the
//! removed line breaks while a quoted field is open.

use super::QUOTE;
use crate::error::{Result, SheetError};
use crate::types::{Row, Separator, Table};

/// Line break put back into a quoted field continuing on the next line
const LINE_BREAK: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Outside any quoted span
    Fields,
    /// Inside an opened, not yet closed, quoted span
    InQuotes,
}

/// Stateful tokenizer building a [`Table`] from successive physical lines
///
/// # Examples
///
/// ```
/// use sheettable::csv::LineTokenizer;
/// use sheettable::types::Separator;
///
/// let mut tokenizer = LineTokenizer::new(Some(Separator::Comma));
/// tokenizer.feed_line(r#"id,"note"#)?;
/// tokenizer.feed_line(r#"second line""#)?;
/// let table = tokenizer.finish()?;
/// assert_eq!(table[0], vec!["id", "note\nsecond line"]);
/// # Ok::<(), sheettable::SheetError>(())
/// ```
#[derive(Debug)]
pub struct LineTokenizer {
    separator: Option<Separator>,
    state: ParserState,
    value: String,
    row: Row,
    table: Table,
    line: usize,
}

impl LineTokenizer {
    /// Create a tokenizer
    ///
    /// With no separator, no character splits fields and every row holds a
    /// single field.
    pub fn new(separator: Option<Separator>) -> Self {
        Self {
            separator,
            state: ParserState::Fields,
            value: String::new(),
            row: Row::new(),
            table: Table::new(),
            line: 0,
        }
    }

    /// Set the separator resolved by detection
    ///
    /// Ignored once a line has been fed: the separator never changes in the
    /// middle of a read.
    pub(crate) fn resolve_separator(&mut self, separator: Option<Separator>) {
        if self.line == 0 {
            self.separator = separator;
        }
    }

    pub fn separator(&self) -> Option<Separator> {
        self.separator
    }

    /// Number of physical lines fed so far
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Feed the next physical line, without its terminator
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.line += 1;
        let mut rest = line;

        match self.state {
            ParserState::InQuotes => self.value.push(LINE_BREAK),
            ParserState::Fields if rest.is_empty() => {
                self.complete_row();
                return Ok(());
            }
            ParserState::Fields => {}
        }

        while !rest.is_empty() {
            self.state = match self.state {
                ParserState::Fields => self.read_fields(&mut rest)?,
                ParserState::InQuotes => self.read_quoted(&mut rest),
            };
        }
        Ok(())
    }

    /// Finish tokenizing and hand over the table
    ///
    /// Fails with [`SheetError::UnterminatedCsv`] when a quoted field is still
    /// open or a row is still pending.
    pub fn finish(self) -> Result<Table> {
        if !self.row.is_empty() || !self.value.is_empty() {
            return Err(SheetError::UnterminatedCsv { line: self.line });
        }
        Ok(self.table)
    }

    fn is_separator(&self, ch: char) -> bool {
        self.separator.is_some_and(|sep| sep.as_char() == ch)
    }

    fn read_fields(&mut self, rest: &mut &str) -> Result<ParserState> {
        if !self.value.is_empty() {
            // only whitespace may follow a closing quote
            while let Some(ch) = rest.chars().next() {
                if self.is_separator(ch) {
                    break;
                }
                if !ch.is_whitespace() {
                    return Err(SheetError::InvalidFormat {
                        line: self.line,
                        found: ch,
                    });
                }
                advance(rest, ch);
            }
        }

        let mut last = None;
        while let Some(ch) = rest.chars().next() {
            last = Some(ch);

            if self.is_separator(ch) {
                self.complete_field();
                advance(rest, ch);
            } else if ch == QUOTE {
                if !self.value.trim_start().is_empty() {
                    return Err(SheetError::InvalidState { line: self.line });
                }
                // the opening quote stays as a marker until the field completes
                self.value.clear();
                self.value.push(QUOTE);
                advance(rest, ch);
                return Ok(ParserState::InQuotes);
            } else {
                self.value.push(ch);
                advance(rest, ch);
            }
        }

        if !self.value.is_empty() || last.is_some_and(|ch| self.is_separator(ch)) {
            self.complete_field();
        }
        self.complete_row();
        Ok(ParserState::Fields)
    }

    fn read_quoted(&mut self, rest: &mut &str) -> ParserState {
        while let Some(ch) = rest.chars().next() {
            if let Some(tail) = rest.strip_prefix("\"\"") {
                self.value.push(QUOTE);
                *rest = tail;
            } else if ch == QUOTE {
                self.value.push(QUOTE);
                advance(rest, ch);
                if rest.is_empty() {
                    self.complete_field();
                    self.complete_row();
                }
                return ParserState::Fields;
            } else {
                self.value.push(ch);
                advance(rest, ch);
            }
        }
        ParserState::InQuotes
    }

    fn complete_field(&mut self) {
        let trimmed = self.value.trim();
        let field = match trimmed.strip_prefix(QUOTE) {
            Some(inner) => inner.strip_suffix(QUOTE).unwrap_or(inner),
            None => trimmed,
        };
        self.row.push(field.to_string());
        self.value.clear();
    }

    fn complete_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        self.table.push_row(row);
    }
}

fn advance(rest: &mut &str, ch: char) {
    *rest = &rest[ch.len_utf8()..];
}
