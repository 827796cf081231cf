//! Report error types

use tagsheet_csv::CsvError;
use tagsheet_template::TemplateError;
use tagsheet_xlsx::XlsxError;
use thiserror::Error;

/// Result type for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Errors raised while assembling or building a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Template engine error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Template package error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Source extract error
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Cell model error
    #[error(transparent)]
    Core(#[from] tagsheet_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A column the sheet layout needs was not produced
    #[error("Sheet '{sheet}': column '{column}' missing from the assembled table")]
    MissingColumn { sheet: String, column: String },

    /// No extract row matches a summary tag for a month
    #[error("No value for {tag} in {month}")]
    MissingBreakdown { tag: String, month: String },

    /// A summary tag is not of the form `<b1,b2,b3>`
    #[error("Invalid tag '{0}': expected <breakdown_1,breakdown_2,breakdown_3>")]
    InvalidTag(String),

    /// A date or month that cannot be parsed or represented
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Bad configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
