//! Single-cell writes addressed by tag

use tagsheet_core::{CellValue, Worksheet};
use tracing::debug;

use crate::error::Result;
use crate::locate::{locate, SearchScope};
use crate::Coordinate;

/// Find `tag` in `column` and overwrite that one cell with `value`.
pub fn write_tagged_value<V: Into<CellValue>>(
    sheet: &mut Worksheet,
    column: u16,
    tag: &str,
    value: V,
) -> Result<Coordinate> {
    let coord = locate(sheet, SearchScope::Column(column), tag)?;
    sheet.set_cell_value_at(coord.row, coord.col, value)?;
    debug!(sheet = sheet.name(), tag, %coord, "wrote tagged value");
    Ok(coord)
}

/// Write many tagged values into one column.
///
/// Each pair is looked up independently. Every tag is located before any
/// cell is written, so a missing tag leaves the sheet untouched.
pub fn write_tagged_values<'a, I, V>(sheet: &mut Worksheet, column: u16, pairs: I) -> Result<usize>
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Into<CellValue>,
{
    write_tagged_cells(
        sheet,
        pairs.into_iter().map(|(tag, value)| (column, tag, value)),
    )
}

/// Write `(column, tag, value)` triples, possibly spread over many columns.
///
/// All-or-nothing: the first tag that cannot be found fails the call before
/// anything is written.
pub fn write_tagged_cells<'a, I, V>(sheet: &mut Worksheet, cells: I) -> Result<usize>
where
    I: IntoIterator<Item = (u16, &'a str, V)>,
    V: Into<CellValue>,
{
    let located = cells
        .into_iter()
        .map(|(column, tag, value)| {
            locate(sheet, SearchScope::Column(column), tag).map(|coord| (coord, value.into()))
        })
        .collect::<Result<Vec<(Coordinate, CellValue)>>>()?;

    for (coord, value) in &located {
        sheet.set_cell_value_at(coord.row, coord.col, value.clone())?;
    }
    debug!(sheet = sheet.name(), cells = located.len(), "wrote tagged values");
    Ok(located.len())
}
