//! CSV serialization of tables to writers, strings and files

use crate::csv::{CompressionMethod, CsvEncoder};
use crate::csv_reader::is_compressed_csv;
use crate::error::{Result, SheetError};
use crate::types::{LineEnding, Separator, Table};
use s_zip::StreamingZipWriter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

impl Table {
    /// Serialize the table as delimited text, one row per line
    ///
    /// Every row, the last one included, ends with `line_ending`.
    pub fn serialize<W: Write>(
        &self,
        writer: &mut W,
        separator: Separator,
        line_ending: LineEnding,
    ) -> io::Result<()> {
        let encoder = CsvEncoder::new(separator);
        let mut buffer = Vec::with_capacity(256);
        for row in self {
            buffer.clear();
            encoder.encode_row(row, &mut buffer);
            buffer.extend_from_slice(line_ending.as_bytes());
            writer.write_all(&buffer)?;
        }
        Ok(())
    }

    /// Convert the table to a CSV string
    ///
    /// # Examples
    ///
    /// ```
    /// use sheettable::types::{LineEnding, Separator, Table};
    ///
    /// let table = Table::from(vec![vec!["id", "note"], vec!["1", "say \"hi\""]]);
    /// assert_eq!(
    ///     table.to_csv_string(Separator::Comma, LineEnding::Lf),
    ///     "id,note\n1,\"say \"\"hi\"\"\"\n"
    /// );
    /// ```
    pub fn to_csv_string(&self, separator: Separator, line_ending: LineEnding) -> String {
        let mut buffer = Vec::new();
        // writing into a Vec never fails
        let _ = self.serialize(&mut buffer, separator, line_ending);
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// CSV file writer with compression support
///
/// Writes rows straight to disk or to a compressed archive holding a single
/// CSV entry, using the same quoting dialect the reader understands.
///
/// # Examples
///
/// ```no_run
/// use sheettable::csv_writer::CsvWriter;
///
/// let mut writer = CsvWriter::new("output.csv").unwrap();
/// writer.write_row(["Name", "Age", "City"]).unwrap();
/// writer.write_row(["Alice", "30", "NYC"]).unwrap();
/// writer.save().unwrap();
/// ```
///
/// # Compression
///
/// Auto-detects compression from file extension:
/// - `.csv` → Uncompressed
/// - `.csv.zst` or `.csv.zip` → Zstd compression (level 3)
/// - `.csv.gz` → Deflate/Gzip compression (level 6)
pub struct CsvWriter {
    // Dual-mode output
    zip_writer: Option<StreamingZipWriter<File>>,
    direct_writer: Option<BufWriter<File>>,

    row_count: u64,
    buffer: Vec<u8>,

    encoder: CsvEncoder,
    line_ending: LineEnding,
}

impl CsvWriter {
    /// Create a new CSV writer - auto-detects compression from file extension
    ///
    /// Defaults to the semicolon separator and CRLF line endings.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let name = path_ref
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if is_compressed_csv(path_ref) {
            if name.ends_with(".csv.gz") {
                Self::with_compression(path_ref, CompressionMethod::Deflate, 6)
            } else {
                Self::with_compression(path_ref, CompressionMethod::Zstd, 3)
            }
        } else {
            let file = File::create(path_ref)
                .map_err(|e| SheetError::WriteError(format!("Failed to create CSV file: {}", e)))?;

            Ok(Self::from_parts(None, Some(BufWriter::new(file))))
        }
    }

    /// Create a writer with explicit compression method and level
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `method` - Compression method (Zstd or Deflate)
    /// * `level` - Compression level:
    ///   - Zstd: 1-21 (recommend 3 for balanced)
    ///   - Deflate: 0-9 (recommend 6 for balanced)
    pub fn with_compression<P: AsRef<Path>>(
        path: P,
        method: CompressionMethod,
        level: u32,
    ) -> Result<Self> {
        let path_ref = path.as_ref();

        let mut zip = StreamingZipWriter::with_method(path_ref, method, level)
            .map_err(|e| SheetError::WriteError(format!("Failed to create ZIP writer: {}", e)))?;

        zip.start_entry(&entry_name(path_ref))
            .map_err(|e| SheetError::WriteError(format!("Failed to start ZIP entry: {}", e)))?;

        Ok(Self::from_parts(Some(zip), None))
    }

    fn from_parts(
        zip_writer: Option<StreamingZipWriter<File>>,
        direct_writer: Option<BufWriter<File>>,
    ) -> Self {
        CsvWriter {
            zip_writer,
            direct_writer,
            row_count: 0,
            buffer: Vec::with_capacity(4096),
            encoder: CsvEncoder::new(Separator::Semicolon),
            line_ending: LineEnding::CrLf,
        }
    }

    /// Set separator (builder pattern)
    pub fn separator(mut self, separator: Separator) -> Self {
        self.encoder = CsvEncoder::new(separator);
        self
    }

    /// Set line terminator written after each row (builder pattern)
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Write a row of strings
    pub fn write_row<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.buffer.clear();
        self.encoder.encode_row(data, &mut self.buffer);
        self.buffer.extend_from_slice(self.line_ending.as_bytes());

        if let Some(ref mut zip) = self.zip_writer {
            zip.write_data(&self.buffer)
                .map_err(|e| SheetError::WriteError(format!("Failed to write to ZIP: {}", e)))?;
        } else if let Some(ref mut writer) = self.direct_writer {
            writer
                .write_all(&self.buffer)
                .map_err(|e| SheetError::WriteError(format!("Failed to write to file: {}", e)))?;
        }

        self.row_count += 1;
        Ok(())
    }

    /// Write every row of a table
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        for row in table {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Get the number of rows written
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Finalize and save the CSV file
    ///
    /// Consumes the writer.
    pub fn save(mut self) -> Result<()> {
        if let Some(zip) = self.zip_writer.take() {
            zip.finish()
                .map_err(|e| SheetError::WriteError(format!("Failed to finish ZIP: {}", e)))?;
        } else if let Some(mut writer) = self.direct_writer.take() {
            writer
                .flush()
                .map_err(|e| SheetError::WriteError(format!("Failed to flush file: {}", e)))?;
        }
        tracing::debug!(rows = self.row_count, "saved CSV file");
        Ok(())
    }
}

/// Archive entry name derived from the output path ("data.csv" as fallback)
fn entry_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| {
            let lower = s.to_lowercase();
            let stem_len = s.len() - [".zst", ".zip", ".gz"]
                .iter()
                .find(|ext| lower.ends_with(*ext))
                .map_or(0, |ext| ext.len());
            let stem = &s[..stem_len];
            if stem.to_lowercase().ends_with(".csv") {
                stem.to_string()
            } else {
                format!("{}.csv", stem)
            }
        })
        .unwrap_or_else(|| "data.csv".to_string())
}
