//! CSV file reading with separator detection, decoding and decompression

use crate::csv::{DecodedLines, LineTokenizer, PhysicalLines, SeparatorDetector};
use crate::error::{Result, SheetError};
use crate::types::{Separator, Table};
use encoding_rs::Encoding;
use s_zip::StreamingZipReader;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Suffixes of CSV files stored inside a compressed archive
pub(crate) const COMPRESSED_SUFFIXES: [&str; 3] = [".csv.zst", ".csv.zip", ".csv.gz"];

/// CSV reader producing fully materialized [`Table`]s
///
/// The reader only holds configuration; every read runs its own tokenizer, so
/// one reader can serve any number of reads.
///
/// # Examples
///
/// ```no_run
/// use sheettable::csv_reader::CsvReader;
///
/// let table = CsvReader::new().read_all("data.csv").unwrap();
///
/// for row in &table {
///     println!("{:?}", row);
/// }
/// ```
///
/// # Explicit Separator and Encoding
///
/// ```no_run
/// use sheettable::csv_reader::CsvReader;
/// use sheettable::types::Separator;
///
/// let table = CsvReader::new()
///     .separator(Separator::Semicolon)
///     .encoding(encoding_rs::WINDOWS_1252)
///     .read_all("legacy.csv")
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CsvReader {
    separator: Option<Separator>,
    encoding: &'static Encoding,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    /// Create a reader detecting the separator and decoding UTF-8
    pub fn new() -> Self {
        Self {
            separator: None,
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Set separator (builder pattern)
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set separator from a character (builder pattern)
    ///
    /// Only `,` and `;` are accepted, anything else fails with
    /// [`SheetError::InvalidSeparator`].
    pub fn separator_char(self, separator: char) -> Result<Self> {
        Ok(self.separator(Separator::try_from(separator)?))
    }

    /// Detect the separator from the first non-blank row (builder pattern, default)
    pub fn auto_detect(mut self) -> Self {
        self.separator = None;
        self
    }

    /// Set encoding used when the file has no byte order mark (builder pattern)
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Read every row of a file
    ///
    /// The file is decoded and tokenized line by line as it is read.
    ///
    /// # File Extensions
    /// - `.csv` (or anything else) → Uncompressed, direct read
    /// - `.csv.zst`, `.csv.zip`, `.csv.gz` → First CSV entry of the archive
    pub fn read_all<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let table = self.read_file(path, false)?;
        tracing::debug!(path = %path.display(), rows = table.len(), "read CSV file");
        Ok(table)
    }

    /// Read only the first physical line of a file
    ///
    /// Nothing past the first line terminator is read. A header holding a
    /// quoted line break spans several physical lines and is rejected as
    /// unterminated.
    pub fn read_first_row<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let table = self.read_file(path, true)?;
        tracing::debug!(path = %path.display(), "read CSV header row");
        Ok(table)
    }

    /// Read every row of an in-memory text
    ///
    /// # Examples
    ///
    /// ```
    /// use sheettable::csv_reader::CsvReader;
    ///
    /// let table = CsvReader::new().read_str("a;b\r\n1;\"x;y\"\r\n")?;
    /// assert_eq!(table[1], vec!["1", "x;y"]);
    /// # Ok::<(), sheettable::SheetError>(())
    /// ```
    pub fn read_str(&self, text: &str) -> Result<Table> {
        self.parse(borrowed_lines(text), false)
    }

    /// Read only the first physical line of an in-memory text
    pub fn read_first_row_str(&self, text: &str) -> Result<Table> {
        self.parse(borrowed_lines(text), true)
    }

    fn parse<'a, I>(&self, lines: I, first_line_only: bool) -> Result<Table>
    where
        I: IntoIterator<Item = Result<Cow<'a, str>>>,
    {
        let mut tokenizer = LineTokenizer::new(self.separator);
        let mut detector = SeparatorDetector::new();
        let mut resolved = self.separator.is_some();
        // lines of the first row, held back until its separator is known
        let mut held: Vec<Cow<'a, str>> = Vec::new();

        for line in lines {
            let line = line?;
            if resolved {
                tokenizer.feed_line(&line)?;
            } else {
                let complete = detector.feed_line(&line)?;
                held.push(line);
                if complete {
                    resolved = true;
                    tokenizer.resolve_separator(detector.separator());
                    for line in held.drain(..) {
                        tokenizer.feed_line(&line)?;
                    }
                }
            }

            if first_line_only {
                break;
            }
        }

        // input ended before the first row was complete
        if !held.is_empty() {
            tokenizer.resolve_separator(detector.separator());
            for line in held.drain(..) {
                tokenizer.feed_line(&line)?;
            }
        }

        tracing::debug!(
            separator = ?tokenizer.separator(),
            lines = tokenizer.lines_read(),
            "tokenized CSV text"
        );
        tokenizer.finish()
    }

    fn read_file(&self, path: &Path, first_line_only: bool) -> Result<Table> {
        if !path.exists() {
            return Err(SheetError::FileNotFound(path.to_path_buf()));
        }

        if is_compressed_csv(path) {
            let mut zip = StreamingZipReader::open(path)
                .map_err(|e| SheetError::ReadError(format!("Failed to open ZIP: {}", e)))?;
            let entry_name = csv_entry_name(&zip)?;
            let entry = zip
                .read_entry_streaming_by_name(&entry_name)
                .map_err(|e| SheetError::ReadError(format!("Failed to read ZIP entry: {}", e)))?;
            self.read_stream(path, BufReader::new(entry), first_line_only)
        } else {
            let file = File::open(path)?;
            self.read_stream(path, BufReader::new(file), first_line_only)
        }
    }

    fn read_stream<R: BufRead>(
        &self,
        path: &Path,
        reader: R,
        first_line_only: bool,
    ) -> Result<Table> {
        let mut lines = DecodedLines::new(reader, self.encoding);
        let table = self.parse(owned_lines(&mut lines), first_line_only)?;

        if lines.had_errors() {
            tracing::warn!(
                path = %path.display(),
                encoding = lines.encoding().name(),
                "malformed byte sequences replaced while decoding"
            );
        }
        tracing::debug!(
            path = %path.display(),
            encoding = lines.encoding().name(),
            "decoded CSV file"
        );
        Ok(table)
    }
}

fn borrowed_lines(text: &str) -> impl Iterator<Item = Result<Cow<'_, str>>> {
    PhysicalLines::new(text).map(|line| Ok(Cow::Borrowed(line)))
}

fn owned_lines<I>(lines: I) -> impl Iterator<Item = Result<Cow<'static, str>>>
where
    I: Iterator<Item = Result<String>>,
{
    lines.map(|line| line.map(|text| -> Cow<'static, str> { Cow::Owned(text) }))
}

pub(crate) fn is_compressed_csv(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    COMPRESSED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Name of the first `.csv` entry of an archive, or of its first entry
fn csv_entry_name(zip: &StreamingZipReader) -> Result<String> {
    zip.entries()
        .iter()
        .find(|e| e.name.ends_with(".csv"))
        .or_else(|| zip.entries().first())
        .map(|e| e.name.clone())
        .ok_or_else(|| SheetError::ReadError("No CSV entry found in archive".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &[u8]) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        file.write_all(content)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_read_plain_csv() -> Result<()> {
        let file = csv_file(b"Name,Age,City\nAlice,30,NYC\nBob,25,SF\n")?;
        let table = CsvReader::new().read_all(file.path())?;

        assert_eq!(table.len(), 3);
        assert_eq!(table[0], vec!["Name", "Age", "City"]);
        assert_eq!(table[1], vec!["Alice", "30", "NYC"]);
        Ok(())
    }

    #[test]
    fn test_detects_semicolon() -> Result<()> {
        let table = CsvReader::new().read_str("a;b,c\n1;2,3")?;
        assert_eq!(table[0], vec!["a", "b,c"]);
        assert_eq!(table[1], vec!["1", "2,3"]);
        Ok(())
    }

    #[test]
    fn test_detection_only_on_first_line() -> Result<()> {
        // the second line mixes both separators but is never inspected
        let table = CsvReader::new().read_str("a,b\nc;d,e")?;
        assert_eq!(table[1], vec!["c;d", "e"]);
        Ok(())
    }

    #[test]
    fn test_ambiguous_first_line() {
        let err = CsvReader::new().read_str("a,b;c\n").unwrap_err();
        assert!(matches!(err, SheetError::AmbiguousFormat { .. }));
    }

    #[test]
    fn test_explicit_separator_skips_detection() -> Result<()> {
        let table = CsvReader::new()
            .separator(Separator::Comma)
            .read_str("a,b;c")?;
        assert_eq!(table[0], vec!["a", "b;c"]);
        Ok(())
    }

    #[test]
    fn test_invalid_separator_char() {
        assert!(matches!(
            CsvReader::new().separator_char('|'),
            Err(SheetError::InvalidSeparator('|'))
        ));
        assert!(CsvReader::new().separator_char(';').is_ok());
    }

    #[test]
    fn test_no_separator_on_first_line() -> Result<()> {
        let table = CsvReader::new().read_str("header\nx,y")?;
        assert_eq!(table[0], vec!["header"]);
        assert_eq!(table[1], vec!["x,y"]);
        Ok(())
    }

    #[test]
    fn test_detection_skips_leading_blank_lines() -> Result<()> {
        let table = CsvReader::new().read_str("\na,b\n1,2\n")?;
        assert_eq!(
            table,
            Table::from(vec![vec![], vec!["a", "b"], vec!["1", "2"]])
        );
        Ok(())
    }

    #[test]
    fn test_detection_spans_multiline_first_row() -> Result<()> {
        let table = CsvReader::new().read_str("\"a\r\n\r\nb\",c\r\nd,\"e;f\"\r\n")?;
        assert_eq!(
            table,
            Table::from(vec![vec!["a\n\nb", "c"], vec!["d", "e;f"]])
        );
        Ok(())
    }

    #[test]
    fn test_ambiguous_in_first_row_continuation() {
        let err = CsvReader::new().read_str("\"a\nb\",c;d\n").unwrap_err();
        assert!(matches!(err, SheetError::AmbiguousFormat { line: 2 }));
    }

    #[test]
    fn test_unterminated_first_row_while_detecting() {
        let err = CsvReader::new().read_str("\"a,b\nc").unwrap_err();
        assert!(matches!(err, SheetError::UnterminatedCsv { line: 2 }));
    }

    #[test]
    fn test_crlf_inside_quotes_reads_as_lf() -> Result<()> {
        let expected = Table::from(vec![vec!["a\nb", "c"]]);
        let text = "\"a\r\nb\",c\r\n";
        assert_eq!(
            CsvReader::new().separator(Separator::Comma).read_str(text)?,
            expected
        );
        assert_eq!(CsvReader::new().read_str(text)?, expected);
        // a lone \r is a line break as well
        assert_eq!(CsvReader::new().read_str("\"a\rb\",c\n")?, expected);
        Ok(())
    }

    #[test]
    fn test_large_file_across_buffer_boundaries() -> Result<()> {
        let mut content = String::from("id;note\r\n");
        for i in 0..2000 {
            content.push_str(&format!("{};\"caf\u{e9}\r\nline {}\"\r\n", i, i));
        }
        let file = csv_file(content.as_bytes())?;

        let table = CsvReader::new().read_all(file.path())?;
        assert_eq!(table.len(), 2001);
        assert_eq!(table[2000], vec!["1999", "caf\u{e9}\nline 1999"]);

        let header = CsvReader::new().read_first_row(file.path())?;
        assert_eq!(header, Table::from(vec![vec!["id", "note"]]));
        Ok(())
    }

    #[test]
    fn test_first_row_only() -> Result<()> {
        let file = csv_file(b"id;name\n1;\"open")?;
        let table = CsvReader::new().read_first_row(file.path())?;
        assert_eq!(table.len(), 1);
        assert_eq!(table[0], vec!["id", "name"]);
        Ok(())
    }

    #[test]
    fn test_first_row_with_multiline_header() {
        let err = CsvReader::new()
            .read_first_row_str("\"multi\nline\",b\n")
            .unwrap_err();
        assert!(matches!(err, SheetError::UnterminatedCsv { line: 1 }));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvReader::new()
            .read_all("definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, SheetError::FileNotFound(_)));
    }

    #[test]
    fn test_utf8_bom() -> Result<()> {
        let file = csv_file(b"\xEF\xBB\xBFa,b\n")?;
        let table = CsvReader::new().read_all(file.path())?;
        assert_eq!(table[0], vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_utf16_bom() -> Result<()> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "x;\u{e9}\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let file = csv_file(&bytes)?;
        let table = CsvReader::new().read_all(file.path())?;
        assert_eq!(table[0], vec!["x", "\u{e9}"]);
        Ok(())
    }

    #[test]
    fn test_default_encoding() -> Result<()> {
        let file = csv_file(b"caf\xE9;na\xEFve\n")?;
        let table = CsvReader::new()
            .encoding(encoding_rs::WINDOWS_1252)
            .read_all(file.path())?;
        assert_eq!(table[0], vec!["caf\u{e9}", "na\u{ef}ve"]);
        Ok(())
    }

    #[test]
    fn test_reader_reuse_isolated() -> Result<()> {
        let reader = CsvReader::new();
        assert!(reader.read_str("\"unterminated").is_err());
        let table = reader.read_str("a,b")?;
        assert_eq!(table, Table::from(vec![vec!["a", "b"]]));
        Ok(())
    }

    #[test]
    fn test_compressed_suffix() {
        assert!(is_compressed_csv(Path::new("data.csv.zst")));
        assert!(is_compressed_csv(Path::new("DATA.CSV.GZ")));
        assert!(!is_compressed_csv(Path::new("data.csv")));
    }
}
