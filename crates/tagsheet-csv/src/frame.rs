//! Column-named tables of cell values

use tagsheet_core::CellValue;

use crate::error::{CsvError, CsvResult};

static EMPTY: CellValue = CellValue::Empty;

/// A rectangular table with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Frame {
    /// Create a frame, checking every row has one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> CsvResult<Self> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(CsvError::Ragged {
                row: row + 1,
                expected: columns.len(),
                found: values.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Create a frame with columns and no rows
    pub fn with_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Column names, left to right
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or `MissingColumn`
    pub fn require_column(&self, name: &str) -> CsvResult<usize> {
        self.column_index(name)
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> CsvResult<impl Iterator<Item = &CellValue> + '_> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    /// The value at `row` (0-based) in `column`; `Empty` past the last row
    pub fn value(&self, row: usize, column: &str) -> CsvResult<&CellValue> {
        let index = self.require_column(column)?;
        Ok(self.rows.get(row).map_or(&EMPTY, |values| &values[index]))
    }

    /// A new frame with only the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> CsvResult<Frame> {
        let indices = names
            .iter()
            .map(|name| self.require_column(name.as_ref()))
            .collect::<CsvResult<Vec<_>>>()?;

        Ok(Frame {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// A new frame with the rows `keep` accepts
    pub fn filter<F>(&self, mut keep: F) -> Frame
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Frame {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// Rows whose `column` equals `value`
    pub fn filter_eq<V: Into<CellValue>>(&self, column: &str, value: V) -> CsvResult<Frame> {
        let index = self.require_column(column)?;
        let value = value.into();
        Ok(self.filter(|row| row[index] == value))
    }

    /// Rows whose `column` holds one of the `allowed` texts
    pub fn filter_in<S: AsRef<str>>(&self, column: &str, allowed: &[S]) -> CsvResult<Frame> {
        let index = self.require_column(column)?;
        Ok(self.filter(|row| {
            row[index]
                .as_string()
                .map_or(false, |text| allowed.iter().any(|a| a.as_ref() == text))
        }))
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<CellValue>) -> CsvResult<()> {
        if row.len() != self.columns.len() {
            return Err(CsvError::Ragged {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a column; `values` needs one entry per row
    pub fn push_column<S: Into<String>>(&mut self, name: S, values: Vec<CellValue>) -> CsvResult<()> {
        if values.len() != self.rows.len() {
            return Err(CsvError::Ragged {
                row: self.rows.len().min(values.len()) + 1,
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Rename a column
    pub fn rename_column(&mut self, from: &str, to: &str) -> CsvResult<()> {
        let index = self.require_column(from)?;
        self.columns[index] = to.to_string();
        Ok(())
    }

    /// Replace every value of a column with `f(value)`
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> CsvResult<()>
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        let index = self.require_column(name)?;
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
        Ok(())
    }

    /// Reorder rows with a comparator; equal rows keep their order
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&[CellValue], &[CellValue]) -> std::cmp::Ordering,
    {
        self.rows.sort_by(|a, b| compare(a, b));
    }

    /// Remove exact duplicate rows, keeping the first of each
    pub fn dedup(&mut self) {
        let mut kept: Vec<Vec<CellValue>> = Vec::with_capacity(self.rows.len());
        for row in self.rows.drain(..) {
            if !kept.contains(&row) {
                kept.push(row);
            }
        }
        self.rows = kept;
    }

    /// Split into column names and rows
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }
}
