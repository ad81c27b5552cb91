//! Recorded 2D scratch tables.

use crate::error::{Error, Result};
use crate::event::{GraphEvent, Recorder};
use crate::value::{display_plain, CellValue, Value};

/// Cell-to-string mapping used by viewers.
pub type CellFormatter = fn(&Value) -> String;

/// Shape, initial value and display metadata of a table.
#[derive(Debug, Clone)]
pub struct TableConfig<T> {
    /// Display title
    pub name: String,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Value every cell starts with
    pub initial: T,
    /// Title of the row axis
    pub row_header: Option<String>,
    /// Title of the column axis
    pub column_header: Option<String>,
    /// Per-row labels (may be empty)
    pub row_labels: Vec<String>,
    /// Per-column labels (may be empty)
    pub column_labels: Vec<String>,
    /// How cells are rendered
    pub formatter: CellFormatter,
}

/// A table configuration with its type erased, as kept for replay.
pub type TableLayout = TableConfig<Value>;

impl<T: CellValue> TableConfig<T> {
    /// A `rows` x `columns` table filled with `initial`.
    pub fn new(name: impl Into<String>, rows: usize, columns: usize, initial: T) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            initial,
            row_header: None,
            column_header: None,
            row_labels: Vec::new(),
            column_labels: Vec::new(),
            formatter: display_plain,
        }
    }

    /// Set axis titles.
    pub fn with_headers(mut self, row: impl Into<String>, column: impl Into<String>) -> Self {
        self.row_header = Some(row.into());
        self.column_header = Some(column.into());
        self
    }

    /// Label rows `0..rows` and columns `0..columns` with their indices.
    pub fn with_index_labels(mut self) -> Self {
        self.row_labels = (0..self.rows).map(|i| i.to_string()).collect();
        self.column_labels = (0..self.columns).map(|i| i.to_string()).collect();
        self
    }

    /// Set explicit row labels.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Self {
        self.row_labels = labels;
        self
    }

    /// Set explicit column labels.
    pub fn with_column_labels(mut self, labels: Vec<String>) -> Self {
        self.column_labels = labels;
        self
    }

    /// Set the cell formatter.
    pub fn with_formatter(mut self, formatter: CellFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Erase the cell type.
    pub fn layout(&self) -> TableLayout {
        TableConfig {
            name: self.name.clone(),
            rows: self.rows,
            columns: self.columns,
            initial: self.initial.to_value(),
            row_header: self.row_header.clone(),
            column_header: self.column_header.clone(),
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            formatter: self.formatter,
        }
    }
}

impl<T> TableConfig<T> {
    /// Render a cell with this table's formatter.
    pub fn format(&self, value: &Value) -> String {
        (self.formatter)(value)
    }

    /// Row-major offset of a cell, if inside the table.
    pub fn offset(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }
}

/// A live table whose reads and writes are recorded.
#[derive(Debug)]
pub struct Table<T> {
    id: usize,
    rows: usize,
    columns: usize,
    cells: Vec<T>,
    recorder: Recorder,
}

impl<T: CellValue> Table<T> {
    pub(crate) fn new(id: usize, config: &TableConfig<T>, recorder: Recorder) -> Self {
        Self {
            id,
            rows: config.rows,
            columns: config.columns,
            cells: vec![config.initial.clone(); config.rows * config.columns],
            recorder,
        }
    }

    /// Table id in the event log (creation order).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Read a cell, recording the access.
    pub fn get(&self, row: usize, column: usize) -> Result<T> {
        let offset = self.offset(row, column)?;
        self.recorder.record(GraphEvent::TableRead { table: self.id, row, column });
        Ok(self.cells[offset].clone())
    }

    /// Write a cell, recording the new value.
    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        let offset = self.offset(row, column)?;
        self.recorder.record(GraphEvent::TableWrite {
            table: self.id,
            row,
            column,
            value: value.to_value(),
        });
        self.cells[offset] = value;
        Ok(())
    }

    /// One row without recording a read.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.cells[row * self.columns..(row + 1) * self.columns])
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize> {
        if row < self.rows && column < self.columns {
            Ok(row * self.columns + column)
        } else {
            Err(Error::TableCellOutOfRange {
                table: self.id,
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Table<i64>, Recorder) {
        let recorder = Recorder::new();
        let config = TableConfig::new("dist", 2, 3, -1i64);
        (Table::new(4, &config, recorder.clone()), recorder)
    }

    #[test]
    fn starts_at_initial_value() {
        let (t, _) = table();
        assert_eq!(t.row(0), Some(&[-1, -1, -1][..]));
        assert_eq!(t.row(1), Some(&[-1, -1, -1][..]));
        assert_eq!(t.row(2), None);
    }

    #[test]
    fn get_and_set_are_recorded() {
        let (mut t, rec) = table();
        t.set(1, 2, 9).unwrap();
        assert_eq!(t.get(1, 2).unwrap(), 9);
        assert_eq!(
            rec.events(),
            vec![
                GraphEvent::TableWrite { table: 4, row: 1, column: 2, value: Value::Int(9) },
                GraphEvent::TableRead { table: 4, row: 1, column: 2 },
            ]
        );
    }

    #[test]
    fn out_of_range_is_an_error_and_unrecorded() {
        let (mut t, rec) = table();
        assert!(matches!(t.get(2, 0), Err(Error::TableCellOutOfRange { .. })));
        assert!(t.set(0, 3, 1).is_err());
        assert!(rec.is_empty());
    }

    #[test]
    fn layout_erases_type() {
        let config = TableConfig::new("parent", 1, 2, None::<usize>)
            .with_headers("Node", "Iteration")
            .with_index_labels();
        let layout = config.layout();
        assert_eq!(layout.initial, Value::Null);
        assert_eq!(layout.column_labels, vec!["0", "1"]);
        assert_eq!(layout.row_labels, vec!["0"]);
        assert_eq!(layout.row_header.as_deref(), Some("Node"));
        assert_eq!(layout.format(&Value::Infinity), "∞");
        assert_eq!(layout.offset(0, 1), Some(1));
        assert_eq!(layout.offset(1, 0), None);
    }

    #[test]
    fn custom_formatter() {
        fn stars(v: &Value) -> String {
            match v {
                Value::Int(n) => "*".repeat(*n as usize),
                _ => String::new(),
            }
        }
        let layout = TableConfig::new("stars", 1, 1, 0i64).with_formatter(stars).layout();
        assert_eq!(layout.format(&Value::Int(3)), "***");
    }
}
