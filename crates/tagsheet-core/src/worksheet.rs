//! Worksheet type

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::row::RowProps;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Package part the sheet was loaded from (e.g. `xl/worksheets/sheet3.xml`)
    source_part: Option<String>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            source_part: None,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Package part this sheet was read from, if it came from a file
    pub fn source_part(&self) -> Option<&str> {
        self.source_part.as_deref()
    }

    /// Record the package part backing this sheet
    pub fn set_source_part<S: Into<String>>(&mut self, part: S) {
        self.source_part = Some(part.into());
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get a cell's style index by indices (0 when unstyled)
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0)
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices, keeping the cell's style
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell's style index by row and column indices
    pub fn set_cell_style_index_at(&mut self, row: u32, col: u16, style_index: u32) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    /// Store a fully-formed cell (value and style) as read from a file
    pub fn set_cell_data_at(&mut self, row: u32, col: u16, data: CellData) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set(row, col, data);
        Ok(())
    }

    // === Range Operations ===

    /// Get the used range (bounds of all stored cells)
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Highest row holding a cell, or 0 for an empty sheet
    pub fn max_row(&self) -> u32 {
        self.cells.used_bounds().map(|(_, _, r, _)| r).unwrap_or(0)
    }

    /// Delete `count` rows starting at `start`; every later row moves up.
    pub fn delete_rows(&mut self, start: u32, count: u32) -> Result<()> {
        if start == 0 || start > MAX_ROWS {
            return Err(Error::RowOutOfBounds(start, MAX_ROWS));
        }
        self.cells.delete_rows(start, count);
        Ok(())
    }

    // === Rows ===

    /// Get row formatting for a row, if any
    pub fn row_props(&self, row: u32) -> Option<&RowProps> {
        self.cells.row_props(row)
    }

    /// Set row formatting
    pub fn set_row_props(&mut self, row: u32, props: RowProps) {
        self.cells.set_row_props(row, props);
    }

    /// Rows that hold cells or row formatting, ascending
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.row_indices()
    }

    // === Merged Cells ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    /// Merge cells
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<()> {
        for existing in self.cells.merged_regions() {
            if range.overlaps(existing) {
                return Err(Error::MergedCellConflict(range.to_string()));
            }
        }
        self.cells.add_merged_region(*range);
        Ok(())
    }

    // === Iteration ===

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate over the cells of one row, left to right
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    /// Iterate over the cells of one column, top to bottom
    pub fn column_cells(&self, col: u16) -> impl Iterator<Item = (u32, &CellData)> {
        self.cells.iter_column(col)
    }

    /// Validate cell position
    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
        Ok(())
    }
}
