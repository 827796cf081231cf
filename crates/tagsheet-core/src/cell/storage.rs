//! Cell storage implementation
//!
//! Sparse row-based storage for worksheet cells. Only non-empty cells are
//! stored, keyed `row -> column -> CellData`, so iteration is naturally in
//! row-major order and row deletion is a split and re-key of the row map.

use std::collections::BTreeMap;

use super::{CellRange, CellValue};
use crate::row::RowProps;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the template's cell format table (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row, BTreeMap<col, CellData>>`, 1-based keys.
#[derive(Debug, Default)]
pub struct CellStorage {
    /// Row index -> column map
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,

    /// Row-level formatting
    row_props: BTreeMap<u32, RowProps>,

    /// Merged cell regions
    merged_regions: Vec<CellRange>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Set a cell
    ///
    /// If the cell data is empty (no value, default style), the cell is removed.
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        match self.get_mut(row, col) {
            Some(cell) => {
                cell.value = value;
                if cell.is_empty() {
                    self.remove(row, col);
                }
            }
            None if !value.is_empty() => self.set(row, col, CellData::new(value)),
            None => {}
        }
    }

    /// Set just the cell style (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        match self.get_mut(row, col) {
            Some(cell) => {
                cell.style_index = style_index;
                if cell.is_empty() {
                    self.remove(row, col);
                }
            }
            None if style_index != 0 => {
                self.set(row, col, CellData::with_style(CellValue::Empty, style_index))
            }
            None => {}
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let result = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        result
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage holds no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of stored cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row, left to right
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Iterate over cells in a specific column, top to bottom
    pub fn iter_column(&self, col: u16) -> impl Iterator<Item = (u32, &CellData)> {
        self.rows
            .iter()
            .filter_map(move |(&row, cols)| cols.get(&col).map(|data| (row, data)))
    }

    /// Iterate over row indices that hold cells or row formatting
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        let mut rows: Vec<u32> = self
            .rows
            .keys()
            .chain(self.row_props.keys())
            .copied()
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows.into_iter()
    }

    /// Get row formatting, if any was set
    pub fn row_props(&self, row: u32) -> Option<&RowProps> {
        self.row_props.get(&row)
    }

    /// Set row formatting; default props clear the entry
    pub fn set_row_props(&mut self, row: u32, props: RowProps) {
        if props.has_custom_settings() {
            self.row_props.insert(row, props);
        } else {
            self.row_props.remove(&row);
        }
    }

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    /// Add a merged region
    pub fn add_merged_region(&mut self, range: CellRange) {
        self.merged_regions.push(range);
    }

    /// Delete `count` rows starting at `start`, shifting every later row up.
    ///
    /// Cells, row formatting and merged regions all move together. A merged
    /// region that loses rows shrinks; one that collapses to a single cell or
    /// disappears entirely is dropped.
    pub fn delete_rows(&mut self, start: u32, count: u32) {
        if count == 0 {
            return;
        }
        let end = start.saturating_add(count);

        self.rows = Self::shift_map(std::mem::take(&mut self.rows), start, end, count);
        self.row_props = Self::shift_map(std::mem::take(&mut self.row_props), start, end, count);

        let remap = |row: u32, at_start: bool| -> u32 {
            if row < start {
                row
            } else if row >= end {
                row - count
            } else if at_start {
                start
            } else {
                start - 1
            }
        };

        self.merged_regions = self
            .merged_regions
            .iter()
            .filter_map(|range| {
                let first = remap(range.start.row, true);
                let last = remap(range.end.row, false);
                if last < first {
                    return None;
                }
                let shifted =
                    CellRange::from_indices(first, range.start.col, last, range.end.col);
                if shifted.start == shifted.end {
                    None
                } else {
                    Some(shifted)
                }
            })
            .collect();
    }

    /// Drop keys in `[start, end)` and move keys `>= end` up by `count`.
    fn shift_map<V>(mut map: BTreeMap<u32, V>, start: u32, end: u32, count: u32) -> BTreeMap<u32, V> {
        let tail = map.split_off(&start);
        map.extend(
            tail.into_iter()
                .filter(|(row, _)| *row >= end)
                .map(|(row, value)| (row - count, value)),
        );
        map
    }
}
