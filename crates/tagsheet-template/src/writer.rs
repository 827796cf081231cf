//! Bulk table writes into a reserved region

use tagsheet_core::{CellValue, Workbook, Worksheet, MAX_COLS};
use tracing::info;

use crate::compact::compact;
use crate::error::{Result, TemplateError};
use crate::layout::{SheetLayout, Table};
use crate::locate::{locate, SearchScope};
use crate::{Coordinate, END_TAG, START_TAG};

/// Write `rows` into `sheet` starting at `start`, then compact.
///
/// The sheet's `<end>` tag bounds the reserved region. The region, the
/// payload shape and its capacity are all checked before anything is
/// written. Values overwrite what is there; the template's cell styles stay.
/// Unused reserved rows, the `<end>` row included, are then deleted.
///
/// Returns the row immediately after the last written row.
pub fn write_table(sheet: &mut Worksheet, start: Coordinate, rows: &[Vec<CellValue>]) -> Result<u32> {
    let end = locate(sheet, SearchScope::Sheet, END_TAG)?;
    if end.row < start.row {
        return Err(TemplateError::InvalidRegion {
            sheet: sheet.name().to_string(),
            start,
            end,
        });
    }

    let width = rows.first().map(Vec::len).unwrap_or(0);
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(TemplateError::ShapeMismatch {
            sheet: sheet.name().to_string(),
            detail: format!(
                "payload row {} has {} values, expected {}",
                index + 1,
                row.len(),
                width
            ),
        });
    }

    let available_cols = usize::from(MAX_COLS.saturating_sub(start.col)) + 1;
    if width > available_cols {
        return Err(TemplateError::ShapeMismatch {
            sheet: sheet.name().to_string(),
            detail: format!(
                "{} columns starting at {} run past the last sheet column",
                width, start
            ),
        });
    }

    let capacity = end.row - start.row + 1;
    let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    if height > capacity {
        return Err(TemplateError::CapacityExceeded {
            sheet: sheet.name().to_string(),
            capacity,
            rows: height,
        });
    }

    for (row, values) in (start.row..).zip(rows) {
        for (col, value) in (start.col..).zip(values) {
            sheet.set_cell_value_at(row, col, value.clone())?;
        }
    }

    // A full region keeps the `<end>` row; drop the tag if the payload missed it
    if sheet.get_value_at(end.row, end.col).as_string() == Some(END_TAG) {
        sheet.set_cell_value_at(end.row, end.col, CellValue::Empty)?;
    }

    let first_unused_row = start.row + height;
    let deleted = compact(sheet, first_unused_row, end.row)?;
    info!(
        sheet = sheet.name(),
        rows = height,
        deleted,
        "wrote table"
    );
    Ok(first_unused_row)
}

/// Write a named table into the sheet described by `layout`.
///
/// The table's columns must match the layout exactly and in order, and every
/// row needs one value per layout column. The payload goes to the sheet's
/// `<start>` tag.
pub fn write_table_to_sheet(workbook: &mut Workbook, layout: &SheetLayout, table: &Table) -> Result<u32> {
    let sheet = workbook
        .worksheet_by_name_mut(&layout.sheet)
        .ok_or_else(|| TemplateError::SheetNotFound(layout.sheet.clone()))?;

    if table.columns != layout.columns {
        return Err(TemplateError::ShapeMismatch {
            sheet: layout.sheet.clone(),
            detail: format!(
                "expected columns {:?}, got {:?}",
                layout.columns, table.columns
            ),
        });
    }

    let expected = layout.columns.len();
    if let Some((index, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(TemplateError::ShapeMismatch {
            sheet: layout.sheet.clone(),
            detail: format!(
                "row {} has {} values, layout has {} columns",
                index + 1,
                row.len(),
                expected
            ),
        });
    }

    let start = locate(sheet, SearchScope::Sheet, START_TAG)?;
    write_table(sheet, start, &table.rows)
}
