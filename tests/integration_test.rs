//! Integration tests for sheettable

use sheettable::{CsvReader, CsvWriter, LineEnding, Separator, SheetError, Spreadsheet, Table};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_read_normalize_serialize() {
    let file = csv_file(
        ";;;\r\n\
         ; id ; \"name\" ; note ;\r\n\
         ; 1 ; \"Smith; John\" ; \"said \"\"hi\"\"\" ;\r\n\
         ; 2 ; \"multi\r\nline\" ;;\r\n\
         ;;;\r\n",
    );

    let mut table = CsvReader::new().read_all(file.path()).unwrap();
    assert_eq!(table.len(), 5);
    table.normalize();

    assert_eq!(
        table,
        Table::from(vec![
            vec!["id", "name", "note"],
            vec!["1", "Smith; John", "said \"hi\""],
            vec!["2", "multi\nline", ""],
        ])
    );

    assert_eq!(
        table.to_csv_string(Separator::Semicolon, LineEnding::CrLf),
        "id;name;note\r\n\
         1;\"Smith; John\";\"said \"\"hi\"\"\"\r\n\
         2;\"multi\nline\";\r\n"
    );
}

#[test]
fn test_interior_empty_rows_and_columns_kept() {
    let file = csv_file(",,,\n,a,,b\n,,,\n,c,,d\n");
    let mut table = CsvReader::new().read_all(file.path()).unwrap();
    table.normalize();
    assert_eq!(
        table,
        Table::from(vec![vec!["a", "", "b"], vec!["", "", ""], vec!["c", "", "d"]])
    );

    table.remove_empty_rows();
    assert_eq!(table, Table::from(vec![vec!["a", "", "b"], vec!["c", "", "d"]]));
}

#[test]
fn test_write_and_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.csv");
    let table = Table::from(vec![
        vec!["Name", "Comment", "Amount"],
        vec!["Alice", "likes \"quotes\"", "1,5"],
        vec!["Bob", "two\nlines", " 3 "],
    ]);

    {
        let mut writer = CsvWriter::new(&path)
            .unwrap()
            .separator(Separator::Comma)
            .line_ending(LineEnding::Lf);
        writer.write_table(&table).unwrap();
        writer.save().unwrap();
    }

    let read_back = CsvReader::new().read_all(&path).unwrap();
    assert_eq!(read_back, table);

    let headers = CsvReader::new().read_first_row(&path).unwrap();
    assert_eq!(headers, Table::from(vec![vec!["Name", "Comment", "Amount"]]));
}

#[test]
fn test_compressed_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let table = Table::from(vec![vec!["id", "value"], vec!["1", "x;y"], vec!["2", ""]]);

    for name in ["data.csv.zst", "data.csv.gz"] {
        let path = dir.path().join(name);
        {
            let mut writer = CsvWriter::new(&path).unwrap();
            writer.write_table(&table).unwrap();
            writer.save().unwrap();
        }

        let read_back = Spreadsheet::new().read(&path).unwrap();
        assert_eq!(read_back, table, "round trip through {}", name);

        let headers = Spreadsheet::new().read_headers(&path).unwrap();
        assert_eq!(headers, Table::from(vec![vec!["id", "value"]]));
    }
}

#[test]
fn test_truncated_inside_quote() {
    let file = csv_file("id,text\n1,\"never closed\n2,more\n");
    let err = CsvReader::new().read_all(file.path()).unwrap_err();
    assert!(matches!(err, SheetError::UnterminatedCsv { line: 3 }));
}

#[test]
fn test_error_messages() {
    let err = CsvReader::new().read_str("a,b;c").unwrap_err();
    assert!(err.to_string().contains("Ambiguous CSV file format"));

    let err = CsvReader::new().read_str("\"a\" b,c").unwrap_err();
    assert!(err.to_string().contains("Invalid CSV file format at line 1"));

    let err = CsvReader::new().read_str("a,b\nx\"y\",z").unwrap_err();
    assert!(err.to_string().contains("Invalid state at line 2"));
}

#[test]
fn test_missing_input() {
    let err = Spreadsheet::new().read("no/such/input.csv").unwrap_err();
    assert!(matches!(err, SheetError::FileNotFound(_)));
}
