//! Table normalization: rectangular shape and trimmed empty borders

use crate::types::{Row, Table};

/// Check if every cell of a row is empty (a row without cells is empty)
pub fn is_row_empty(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

impl Table {
    /// Trim empty rows at the beginning and at the end, pad short rows with
    /// empty cells, then cut empty columns on the left and on the right.
    ///
    /// Empty rows and columns between non-empty ones are kept; see
    /// [`Table::remove_empty_rows`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sheettable::types::Table;
    ///
    /// let mut table = Table::from(vec![
    ///     vec![],
    ///     vec!["", "a", "", "b", ""],
    ///     vec!["", "c"],
    ///     vec!["", ""],
    /// ]);
    /// table.normalize();
    /// assert_eq!(table, Table::from(vec![vec!["a", "", "b"], vec!["c", "", ""]]));
    /// ```
    pub fn normalize(&mut self) {
        let rows = self.rows_mut();

        let leading = rows.iter().take_while(|row| is_row_empty(row)).count();
        rows.drain(..leading);
        while rows.last().is_some_and(|row| is_row_empty(row)) {
            rows.pop();
        }

        let max = self.max_columns();
        for row in self.rows_mut().iter_mut() {
            row.resize(max, String::new());
        }

        while self.max_columns() > 0 && self.is_column_empty(0) {
            self.remove_column(0);
        }
        while let Some(last) = self.max_columns().checked_sub(1) {
            if !self.is_column_empty(last) {
                break;
            }
            self.remove_column(last);
        }
    }

    /// Remove every empty row, wherever it is
    pub fn remove_empty_rows(&mut self) {
        self.rows_mut().retain(|row| !is_row_empty(row));
    }

    /// Check if an entire column is empty
    ///
    /// Rows too short to reach the column count as empty.
    pub fn is_column_empty(&self, col: usize) -> bool {
        self.iter()
            .all(|row| row.get(col).map_or(true, String::is_empty))
    }

    /// Insert an empty column before `col` (appended to rows shorter than `col`)
    pub fn add_column(&mut self, col: usize) {
        for row in self.rows_mut().iter_mut() {
            let at = col.min(row.len());
            row.insert(at, String::new());
        }
    }

    /// Remove an entire column
    pub fn remove_column(&mut self, col: usize) {
        for row in self.rows_mut().iter_mut() {
            if col < row.len() {
                row.remove(col);
            }
        }
    }

    /// Get the length of the longest row
    pub fn max_columns(&self) -> usize {
        self.iter().map(Row::len).max().unwrap_or(0)
    }
}
