//! Error types for table reading and writing

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, dispatching or writing tables.
///
/// Every variant is terminal for the read in progress: no partial table is
/// handed back.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Separator other than comma, semicolon or auto-detect was requested
    #[error("Invalid separator {0:?}: should be auto, comma or semicolon only")]
    InvalidSeparator(char),

    #[error("Input file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No reader is registered for the file extension
    #[error("Unsupported file format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Input file should be a CSV file: {}", .0.display())]
    NotCsv(PathBuf),

    /// First line holds both comma and semicolon outside quotes
    #[error("Ambiguous CSV file format at line {line}: both ',' and ';' used as separator")]
    AmbiguousFormat { line: usize },

    /// Content between a closing quote and the next separator
    #[error("Invalid CSV file format at line {line}: unexpected {found:?} after closing quote")]
    InvalidFormat { line: usize, found: char },

    /// Quote inside an unquoted field
    #[error("Invalid state at line {line}: quote found inside an unquoted field")]
    InvalidState { line: usize },

    /// Input ended with an open quoted field or a pending row
    #[error("Invalid CSV file: unterminated row or quoted field at line {line}")]
    UnterminatedCsv { line: usize },

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
