//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while loading or querying an extract
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A named column is not in the frame
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A row does not have one value per column
    #[error("Row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}
