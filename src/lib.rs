//! # sheettable
//!
//! Reads tabular files into a uniform in-memory [`Table`]: ordered rows of
//! string cells, no typing, no styling.
//!
//! The CSV reader implements a strict dialect:
//! - comma or semicolon separator, detected from the first row when not given
//! - quoted fields holding separators, doubled quotes and line breaks
//! - whitespace around unquoted fields and around quotes is trimmed
//! - malformed input is rejected, never repaired
//!
//! Tables can then be normalized (rectangular shape, empty borders trimmed)
//! and serialized back to the same dialect.
//!
//! # Quick Start
//!
//! ```no_run
//! use sheettable::{CsvReader, LineEnding, Separator};
//!
//! let mut table = CsvReader::new().read_all("input.csv")?;
//! table.normalize();
//! table.remove_empty_rows();
//!
//! let text = table.to_csv_string(Separator::Semicolon, LineEnding::CrLf);
//! println!("{}", text);
//! # Ok::<(), sheettable::SheetError>(())
//! ```
//!
//! Other spreadsheet formats plug in through [`spreadsheet::TableReader`].

pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod normalize;
pub mod spreadsheet;
pub mod types;

pub use csv_reader::CsvReader;
pub use csv_writer::CsvWriter;
pub use error::{Result, SheetError};
pub use spreadsheet::{Spreadsheet, TableReader};
pub use types::{LineEnding, Row, Separator, Table};
