use tagsheet_core::Workbook;
use tagsheet_csv::Frame;
use tagsheet_template::SheetLayout;

use crate::error::ReportResult;
use crate::sheets::write_frame;

/// Sheet filled from `data_for_sheet_easy_a.csv`
pub const EASY_A_SHEET: &str = "Easy A";

/// Sheet filled from `data_for_sheet_easy_b.csv`
pub const EASY_B_SHEET: &str = "Easy B";

/// Columns of both easy sheets
pub const EASY_COLUMNS: &[&str] = &["weekday", "appt_date", "total", "Attended", "DNA", "Unknown"];

/// Write an easy extract as-is into `sheet`, keeping only [`EASY_COLUMNS`]
pub fn write_easy_sheet(workbook: &mut Workbook, sheet: &str, extract: &Frame) -> ReportResult<u32> {
    write_frame(workbook, &SheetLayout::new(sheet, EASY_COLUMNS), extract)
}
