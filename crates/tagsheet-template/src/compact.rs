//! Reserved-row compaction

use tagsheet_core::Worksheet;
use tracing::debug;

use crate::error::{Result, TemplateError};

/// Delete the unused rows `first_unused_row..=reserved_end_row`.
///
/// `first_unused_row` is one past the last row written and
/// `reserved_end_row` is the row of the `<end>` tag. Everything below the
/// reserved region shifts up by the number of deleted rows, which is
/// returned. Nothing is deleted when the region was filled exactly.
pub fn compact(sheet: &mut Worksheet, first_unused_row: u32, reserved_end_row: u32) -> Result<u32> {
    let limit = reserved_end_row.saturating_add(1);
    if first_unused_row > limit {
        return Err(TemplateError::CapacityExceeded {
            sheet: sheet.name().to_string(),
            capacity: reserved_end_row,
            rows: first_unused_row - 1,
        });
    }

    let count = limit - first_unused_row;
    if count == 0 {
        return Ok(0);
    }

    sheet.delete_rows(first_unused_row, count)?;
    debug!(
        sheet = sheet.name(),
        first = first_unused_row,
        deleted = count,
        "compacted reserved rows"
    );
    Ok(count)
}
