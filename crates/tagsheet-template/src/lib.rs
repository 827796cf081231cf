//! # tagsheet-template
//!
//! Writes data into pre-built workbook templates at locations marked by
//! sentinel text tags.
//!
//! A template sheet marks where data goes with literal text cells:
//!
//! - `<start>` is the top-left cell of a bulk table region
//! - `<end>` is the last row of the space reserved for that table
//! - any other `<...>` text (e.g. `<month>` or
//!   `<Coverage,Open active practices,count>`) marks a single-value slot
//!
//! The engine has four parts:
//!
//! - [`locate`] finds a tag in a whole sheet or one column
//! - [`compact`] deletes reserved rows that were not written
//! - [`write_table`] / [`write_table_to_sheet`] write a rectangular payload
//!   and compact what is left of the reserved region
//! - [`write_tagged_value`], [`write_tagged_values`] and [`write_tagged_cells`] fill single tagged cells
//!
//! Every lookup returns a [`Result`]; a missing tag is always
//! [`TemplateError::TagNotFound`], never a placeholder coordinate.
//!
//! ## Example
//!
//! ```rust
//! use tagsheet_core::{CellValue, Worksheet};
//! use tagsheet_template::{locate, write_table, SearchScope};
//!
//! let mut sheet = Worksheet::new("Table 2a");
//! sheet.set_cell_value("B5", "<start>").unwrap();
//! sheet.set_cell_value("B9", "<end>").unwrap();
//! sheet.set_cell_value("A10", "Source: NHS Digital").unwrap();
//!
//! let start = locate(&sheet, SearchScope::Sheet, "<start>").unwrap();
//! let rows = vec![
//!     vec![CellValue::from(1.0), CellValue::from("a")],
//!     vec![CellValue::from(2.0), CellValue::from("b")],
//! ];
//! let next_row = write_table(&mut sheet, start, &rows).unwrap();
//!
//! assert_eq!(next_row, 7);
//! assert_eq!(sheet.get_value("C6").unwrap(), CellValue::from("b"));
//! // The footer moved up to sit directly below the data
//! assert_eq!(sheet.get_value("A7").unwrap(), CellValue::from("Source: NHS Digital"));
//! ```

pub mod compact;
pub mod error;
pub mod layout;
pub mod locate;
pub mod tagged;
pub mod writer;

pub use compact::compact;
pub use error::{Result, TemplateError};
pub use layout::{SheetLayout, Table};
pub use locate::{is_tag, locate, tag_cells, SearchScope};
pub use tagged::{write_tagged_cells, write_tagged_value, write_tagged_values};
pub use writer::{write_table, write_table_to_sheet};

/// A located cell, 1-based (row, column)
pub type Coordinate = tagsheet_core::CellAddress;

/// Tag marking the top-left cell of a table region
pub const START_TAG: &str = "<start>";

/// Tag marking the last reserved row of a table region
pub const END_TAG: &str = "<end>";

/// Tag marking the month heading of a summary column
pub const MONTH_TAG: &str = "<month>";
