//! Prelude module - common imports for tagsheet users
//!
//! ```rust
//! use tagsheet::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    CellValue,
    Coordinate,
    // I/O types
    CsvReader,
    // Error types
    Error,
    Frame,
    Result,
    SearchScope,
    SheetLayout,
    Table,
    TemplateError,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    XlsxReader,
    XlsxWriter,

    // Engine
    locate,
    write_table,
    write_table_to_sheet,
    write_tagged_value,
    write_tagged_values,
};
