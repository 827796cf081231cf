//! # tagsheet
//!
//! Fill pre-built spreadsheet templates with data at tag-marked locations.
//!
//! A template author marks where data goes with literal text tags:
//! `<start>` and `<end>` bound a reserved block of rows for a table, and
//! composite tags such as `<Coverage,Open active practices,count>` mark
//! single cells. This crate re-exports the pieces needed to load such a
//! template, write into it and save the result:
//!
//! - [`locate`] finds a tag, by whole sheet or by column
//! - [`write_table`] / [`write_table_to_sheet`] write a table under
//!   `<start>` and delete the reserved rows it did not use
//! - [`write_tagged_value`] writes one value into a tagged cell
//! - [`WorkbookExt`] opens and saves `.xlsx` templates, keeping everything
//!   the engine does not touch (styles, widths, drawings) as it was
//!
//! ## Example
//!
//! ```rust
//! use tagsheet::prelude::*;
//!
//! let mut sheet = Worksheet::new("Table 2a");
//! sheet.set_cell_value("B3", "<start>").unwrap();
//! sheet.set_cell_value("B6", "<end>").unwrap();
//! sheet.set_cell_value("A7", "Source: NHS Digital").unwrap();
//!
//! let start = locate(&sheet, SearchScope::Sheet, "<start>").unwrap();
//! let rows = vec![vec![CellValue::from(1.0)], vec![CellValue::from(2.0)]];
//! let next = write_table(&mut sheet, start, &rows).unwrap();
//!
//! assert_eq!(next, 5);
//! assert_eq!(sheet.get_value("A5").unwrap().as_string(), Some("Source: NHS Digital"));
//! ```

pub mod prelude;

// Re-export core types
pub use tagsheet_core::{
    CellAddress, CellData, CellError, CellRange, CellValue, Error, Result, RowProps, Workbook,
    Worksheet, MAX_COLS, MAX_ROWS,
};

// Re-export the template engine
pub use tagsheet_template::{
    compact, is_tag, locate, tag_cells, write_table, write_table_to_sheet, write_tagged_cells,
    write_tagged_value, write_tagged_values, Coordinate, SearchScope, SheetLayout, Table, TemplateError, END_TAG,
    MONTH_TAG, START_TAG,
};

// Re-export I/O types
pub use tagsheet_csv::{CsvError, CsvReadOptions, CsvReader, Frame};
pub use tagsheet_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a template workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Save the workbook to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => {
                XlsxReader::read_file(path).map_err(|e| Error::other(e.to_string()))
            }
            _ => Err(Error::other(format!(
                "Unsupported template format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => {
                XlsxWriter::write_file(self, path).map_err(|e| Error::other(e.to_string()))
            }
            _ => Err(Error::other(format!(
                "Unsupported output format: {}",
                path.display()
            ))),
        }
    }
}
