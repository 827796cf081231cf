use tagsheet_core::{CellValue, Workbook};
use tagsheet_csv::Frame;
use tagsheet_template::SheetLayout;
use tracing::warn;

use crate::error::{ReportError, ReportResult};
use crate::sheets::write_frame;

/// Template sheet name
pub const TREND_SHEET: &str = "Table 5";

/// `breakdown_1` of the per-weekday estimates; `breakdown_2` names the day
pub const WEEKDAY_BREAKDOWN: &str = "Estimated England total count of appointments by weekday";

/// `breakdown_2` of the patient coverage row
pub const PATIENT_COVERAGE: &str = "Patient coverage";

const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Columns of the trend sheet
pub const TREND_COLUMNS: &[&str] = &["month", "Mon", "Tue", "Wed", "Thu", "Fri", PATIENT_COVERAGE];

fn first_row(frame: &Frame, matches: impl Fn(&[CellValue]) -> bool) -> Option<usize> {
    frame.rows().iter().position(|row| matches(row))
}

/// One row per report month: weekday estimates then patient coverage
pub fn trend_frame(table1: &Frame, months: &[String]) -> ReportResult<Frame> {
    let b1 = table1.require_column("breakdown_1")?;
    let b2 = table1.require_column("breakdown_2")?;

    let weekday_rows: Vec<(&str, Option<usize>)> = WEEKDAYS
        .iter()
        .map(|&day| {
            let row = first_row(table1, |row| {
                row[b1].as_string() == Some(WEEKDAY_BREAKDOWN) && row[b2].as_string() == Some(day)
            });
            (day, row)
        })
        .collect();

    let coverage_rows = table1
        .rows()
        .iter()
        .filter(|row| row[b2].as_string() == Some(PATIENT_COVERAGE))
        .count();
    if coverage_rows > 1 {
        warn!(rows = coverage_rows, "several patient coverage rows, using the first");
    }
    let coverage = first_row(table1, |row| row[b2].as_string() == Some(PATIENT_COVERAGE));

    let missing = |tag: String, month: &str| ReportError::MissingBreakdown {
        tag,
        month: month.to_string(),
    };

    let mut trend = Frame::with_columns(TREND_COLUMNS);
    for month in months {
        let mut values = vec![CellValue::string(month.as_str())];
        for &(day, row) in &weekday_rows {
            let row = row.ok_or_else(|| missing(format!("{}, {}", WEEKDAY_BREAKDOWN, day), month))?;
            values.push(table1.value(row, month)?.clone());
        }
        let row = coverage.ok_or_else(|| missing(PATIENT_COVERAGE.to_string(), month))?;
        values.push(table1.value(row, month)?.clone());
        trend.push_row(values)?;
    }
    Ok(trend)
}

/// Assemble and write `Table 5`
pub fn write_trend_sheet(
    workbook: &mut Workbook,
    table1: &Frame,
    months: &[String],
) -> ReportResult<u32> {
    let trend = trend_frame(table1, months)?;
    write_frame(workbook, &SheetLayout::new(TREND_SHEET, TREND_COLUMNS), &trend)
}
