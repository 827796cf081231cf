//! # tagsheet-core
//!
//! Core data structures for the tagsheet template engine.
//!
//! This crate provides the cell grid that templates are loaded into:
//! - [`CellValue`] - Cell values (numbers, strings, booleans, errors, formulas)
//! - [`CellAddress`] and [`CellRange`] - 1-based cell addressing and ranges
//! - [`Worksheet`] and [`Workbook`] - The document structures
//!
//! Row and column indices are 1-based everywhere, matching the row numbers and
//! column letters a template author sees in Excel.
//!
//! ## Example
//!
//! ```rust
//! use tagsheet_core::{CellValue, Worksheet};
//!
//! let mut sheet = Worksheet::new("Table 2a");
//! sheet.set_cell_value("B5", "<start>").unwrap();
//! sheet.set_cell_value_at(6, 2, 42.0).unwrap();
//!
//! assert_eq!(sheet.get_value_at(6, 2), CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod row;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellError, CellRange, CellValue, SharedString};
pub use error::{Error, Result};
pub use row::RowProps;
pub use workbook::{PackagePart, SourcePackage, Workbook};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
