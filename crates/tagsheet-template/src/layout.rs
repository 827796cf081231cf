//! Named tables and the column layouts sheets expect

use tagsheet_core::CellValue;

/// The ordered column sequence a template sheet expects under `<start>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// Sheet name in the template
    pub sheet: String,
    /// Expected column names, left to right
    pub columns: Vec<String>,
}

impl SheetLayout {
    /// Create a layout
    pub fn new<S: Into<String>>(sheet: S, columns: &[&str]) -> Self {
        Self {
            sheet: sheet.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A rectangular payload with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, left to right
    pub columns: Vec<String>,
    /// Rows of values, one value per column
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }
}
