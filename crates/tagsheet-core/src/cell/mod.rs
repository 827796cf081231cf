//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "B5")
//! - [`CellRange`] - A rectangular block of cells (e.g., "A1:C3")
//! - [`CellData`] - Value plus the template style index

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use storage::{CellData, CellStorage};
pub use value::{CellError, CellValue, SharedString};
