//! # tagsheet-csv
//!
//! Loads CSV source extracts into a [`Frame`]: named columns over rows of
//! typed cell values, with the handful of column operations report
//! assemblers need (selection, filtering, lookups).

mod error;
mod frame;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use frame::Frame;
pub use options::CsvReadOptions;
pub use reader::CsvReader;
