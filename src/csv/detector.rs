//! Separator auto-detection from the first row of a file

use super::QUOTE;
use crate::error::{Result, SheetError};
use crate::types::Separator;

/// Detect the separator used by a single line
///
/// Quoted spans are skipped, so separators inside quotes never count. Returns
/// `Ok(None)` when the line holds neither a comma nor a semicolon outside
/// quotes, and [`SheetError::AmbiguousFormat`] when it holds both.
///
/// # Examples
///
/// ```
/// use sheettable::csv::detect_separator;
/// use sheettable::types::Separator;
///
/// assert_eq!(detect_separator(r#""a;b",c"#).unwrap(), Some(Separator::Comma));
/// assert!(detect_separator("a,b;c").is_err());
/// ```
pub fn detect_separator(line: &str) -> Result<Option<Separator>> {
    let mut detector = SeparatorDetector::new();
    detector.feed_line(line)?;
    Ok(detector.separator())
}

/// Separator detection starting at the first physical line
///
/// A separator found on a line is final. While none is found, blank lines
/// before the first row are skipped and the quote state is carried from line
/// to line, so a first row holding quoted line breaks is inspected as a whole.
#[derive(Debug, Default)]
pub struct SeparatorDetector {
    detected: Option<Separator>,
    in_quotes: bool,
    line: usize,
}

impl SeparatorDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the next physical line
    ///
    /// Returns `true` once the separator is final: one was found, or the first
    /// non-blank row ended without any.
    pub fn feed_line(&mut self, line: &str) -> Result<bool> {
        self.line += 1;
        if !self.in_quotes && line.trim().is_empty() {
            return Ok(false);
        }

        for ch in line.chars() {
            if ch == QUOTE {
                // a doubled quote toggles twice and leaves the state unchanged
                self.in_quotes = !self.in_quotes;
            } else if !self.in_quotes && (ch == ',' || ch == ';') {
                let found = if ch == ',' {
                    Separator::Comma
                } else {
                    Separator::Semicolon
                };
                match self.detected {
                    Some(previous) if previous != found => {
                        return Err(SheetError::AmbiguousFormat { line: self.line });
                    }
                    _ => self.detected = Some(found),
                }
            }
        }

        if self.detected.is_none() && self.in_quotes {
            return Ok(false);
        }
        tracing::trace!(
            separator = ?self.detected,
            line = self.line,
            "separator detection finished"
        );
        Ok(true)
    }

    pub fn separator(&self) -> Option<Separator> {
        self.detected
    }
}
