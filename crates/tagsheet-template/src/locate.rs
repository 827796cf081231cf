//! Tag lookup

use std::fmt;

use tagsheet_core::{CellAddress, Worksheet};
use tracing::debug;

use crate::error::{Result, TemplateError};
use crate::Coordinate;

/// Where to look for a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Every cell of the sheet, row-major (top to bottom, then left to right)
    Sheet,
    /// One column (1-based), top to bottom
    Column(u16),
}

impl SearchScope {
    /// Build a column scope from letters such as `"C"`
    pub fn column(letters: &str) -> Result<Self> {
        Ok(SearchScope::Column(CellAddress::letters_to_column(letters)?))
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::Sheet => write!(f, "all cells"),
            SearchScope::Column(col) => {
                write!(f, "column {}", CellAddress::column_to_letters(*col))
            }
        }
    }
}

/// Find the first cell in `scope` whose literal text equals `tag`.
///
/// A single pass in scan order. Formula cells never match, even when their
/// cached result equals the tag.
pub fn locate(sheet: &Worksheet, scope: SearchScope, tag: &str) -> Result<Coordinate> {
    let found = match scope {
        SearchScope::Sheet => sheet
            .iter_cells()
            .find(|(_, _, cell)| cell.value.as_string() == Some(tag))
            .map(|(row, col, _)| CellAddress::new(row, col)),
        SearchScope::Column(col) => sheet
            .column_cells(col)
            .find(|(_, cell)| cell.value.as_string() == Some(tag))
            .map(|(row, _)| CellAddress::new(row, col)),
    };

    match found {
        Some(coord) => {
            debug!(sheet = sheet.name(), tag, %coord, "located tag");
            Ok(coord)
        }
        None => Err(TemplateError::TagNotFound {
            sheet: sheet.name().to_string(),
            tag: tag.to_string(),
            scope,
        }),
    }
}

/// Check whether text has the shape of a tag (`<...>` with something inside)
pub fn is_tag(text: &str) -> bool {
    text.len() > 2 && text.starts_with('<') && text.ends_with('>')
}

/// List every tag-shaped text cell in row-major order
pub fn tag_cells(sheet: &Worksheet) -> Vec<(Coordinate, &str)> {
    sheet
        .iter_cells()
        .filter_map(|(row, col, cell)| {
            cell.value
                .as_string()
                .filter(|text| is_tag(text))
                .map(|text| (CellAddress::new(row, col), text))
        })
        .collect()
}
