//! # tagsheet-xlsx
//!
//! XLSX reader and writer for tagsheet templates.
//!
//! Reading keeps every part of the package alongside the parsed cell grid.
//! Writing copies those parts back unchanged and regenerates only what the
//! cell model owns: each worksheet's `sheetData`, `dimension` and
//! `mergeCells`. Styles, column widths, views, drawings and defined names
//! therefore survive a read/modify/write cycle byte for byte.

pub mod error;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
