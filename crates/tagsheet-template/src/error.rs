//! Error types for template writing

use thiserror::Error;

use crate::locate::SearchScope;
use crate::Coordinate;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors raised while writing into a template sheet.
///
/// All of these are fatal for the sheet being written. Validation happens
/// before the first cell is touched, so a failed call leaves the sheet as it
/// was.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A required tag is absent from the searched scope
    #[error("Tag '{tag}' not found in {scope} of sheet '{sheet}'")]
    TagNotFound {
        sheet: String,
        tag: String,
        scope: SearchScope,
    },

    /// The payload does not fit between `<start>` and `<end>`.
    ///
    /// Both counts are measured from the top of the region; when only the
    /// reserved end row is known they are counted from row 1.
    #[error("Sheet '{sheet}': {rows} rows exceed the reserved capacity of {capacity}")]
    CapacityExceeded {
        sheet: String,
        capacity: u32,
        rows: u32,
    },

    /// Ragged payload, or a column sequence the sheet does not expect
    #[error("Shape mismatch in sheet '{sheet}': {detail}")]
    ShapeMismatch { sheet: String, detail: String },

    /// `<end>` sits above `<start>`
    #[error("Invalid region in sheet '{sheet}': <end> at {end} is above <start> at {start}")]
    InvalidRegion {
        sheet: String,
        start: Coordinate,
        end: Coordinate,
    },

    /// No sheet with this name in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Error from the cell model
    #[error(transparent)]
    Core(#[from] tagsheet_core::Error),
}
