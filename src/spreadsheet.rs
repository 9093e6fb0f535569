//! Format-agnostic entry points dispatching on file extension
//!
//! Readers for other spreadsheet formats live outside this crate; they plug in
//! through [`TableReader`] and [`Spreadsheet::register`] and must return the
//! same shape of [`Table`]: ordered rows of untyped string cells.

use crate::csv_reader::{is_compressed_csv, CsvReader};
use crate::error::{Result, SheetError};
use crate::types::{Separator, Table};
use indexmap::IndexMap;
use std::path::Path;

/// Contract shared by every table reader
pub trait TableReader {
    /// Read every row of the first sheet (or the whole text) of a file
    fn read_all(&self, path: &Path) -> Result<Table>;

    /// Read only the first row, for header peeking
    fn read_first_row(&self, path: &Path) -> Result<Table>;
}

impl TableReader for CsvReader {
    fn read_all(&self, path: &Path) -> Result<Table> {
        CsvReader::read_all(self, path)
    }

    fn read_first_row(&self, path: &Path) -> Result<Table> {
        CsvReader::read_first_row(self, path)
    }
}

/// Registry of table readers keyed by lowercase file extension
///
/// `csv` is registered out of the box, and compressed CSV files
/// (`.csv.zst`, `.csv.zip`, `.csv.gz`) resolve to it.
///
/// # Examples
///
/// ```no_run
/// use sheettable::spreadsheet::Spreadsheet;
///
/// let sheets = Spreadsheet::new();
/// let headers = sheets.read_headers("people.csv")?;
/// let mut table = sheets.read("people.csv")?;
/// table.normalize();
/// # Ok::<(), sheettable::SheetError>(())
/// ```
pub struct Spreadsheet {
    readers: IndexMap<String, Box<dyn TableReader>>,
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Spreadsheet {
    pub fn new() -> Self {
        let mut readers: IndexMap<String, Box<dyn TableReader>> = IndexMap::new();
        readers.insert("csv".to_string(), Box::new(CsvReader::new()));
        Self { readers }
    }

    /// Register a reader for an extension, replacing any previous one
    pub fn register(&mut self, extension: &str, reader: Box<dyn TableReader>) {
        let extension = extension.trim_start_matches('.').to_lowercase();
        tracing::debug!(extension = %extension, "registered table reader");
        self.readers.insert(extension, reader);
    }

    /// Extensions with a registered reader, in registration order
    pub fn supported_extensions(&self) -> impl Iterator<Item = &str> {
        self.readers.keys().map(String::as_str)
    }

    /// Read every row of a file with the reader registered for its extension
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        self.reader_for(path)?.read_all(path)
    }

    /// Read the first row of a file with the reader registered for its extension
    pub fn read_headers<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        self.reader_for(path)?.read_first_row(path)
    }

    /// Read a CSV file, with an explicit separator or `None` to auto-detect
    pub fn read_csv<P: AsRef<Path>>(&self, path: P, separator: Option<Separator>) -> Result<Table> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetError::FileNotFound(path.to_path_buf()));
        }
        if extension_of(path) != "csv" {
            return Err(SheetError::NotCsv(path.to_path_buf()));
        }

        let reader = match separator {
            Some(separator) => CsvReader::new().separator(separator),
            None => CsvReader::new(),
        };
        reader.read_all(path)
    }

    fn reader_for(&self, path: &Path) -> Result<&dyn TableReader> {
        if !path.exists() {
            return Err(SheetError::FileNotFound(path.to_path_buf()));
        }

        let extension = extension_of(path);
        self.readers
            .get(&extension)
            .map(|reader| &**reader)
            .ok_or(SheetError::UnsupportedFormat(extension))
    }
}

fn extension_of(path: &Path) -> String {
    if is_compressed_csv(path) {
        return "csv".to_string();
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}
