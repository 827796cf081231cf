use tagsheet_core::{CellValue, Workbook};
use tagsheet_csv::Frame;

use crate::error::{ReportError, ReportResult};
use crate::periods::{date_label, weekday_label};
use crate::reshape::{pivot, with_row_total, Aggregate};
use crate::sheets::{
    layout_with, write_frame, BOOKING_CATEGORIES, HCP_CATEGORIES, MODE_CATEGORIES,
    STATUS_CATEGORIES,
};

/// A daily breakdown of appointments, one row per appointment date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByDateSheet {
    /// Template sheet name
    pub sheet: &'static str,
    /// Value of the extract's `breakdown` column
    pub breakdown: &'static str,
    /// Extract column whose values become the sheet's columns
    pub category: &'static str,
    /// Category columns, in sheet order
    pub categories: &'static [&'static str],
}

pub static TABLE_2A: ByDateSheet = ByDateSheet {
    sheet: "Table 2a",
    breakdown: "by_status_by_date",
    category: "appt_status",
    categories: STATUS_CATEGORIES,
};

pub static TABLE_2B: ByDateSheet = ByDateSheet {
    sheet: "Table 2b",
    breakdown: "by_hcp_type_by_date",
    category: "hcp_type",
    categories: HCP_CATEGORIES,
};

pub static TABLE_2C: ByDateSheet = ByDateSheet {
    sheet: "Table 2c",
    breakdown: "by_appt_mode_by_date",
    category: "appt_mode",
    categories: MODE_CATEGORIES,
};

pub static TABLE_2D: ByDateSheet = ByDateSheet {
    sheet: "Table 2d",
    breakdown: "by_time_between_booking_and_appt_by_date",
    category: "time_between_booking_and_appt",
    categories: BOOKING_CATEGORIES,
};

const LEADING_COLUMNS: &[&str] = &["weekday", "appt_date", "total"];

/// Derive a text label from an ISO `appt_date` cell
fn relabel(value: &CellValue, label: fn(&str) -> ReportResult<String>) -> ReportResult<CellValue> {
    let iso = value
        .as_string()
        .ok_or_else(|| ReportError::InvalidDate(format!("appt_date {} is not text", value)))?;
    Ok(CellValue::string(label(iso)?))
}

/// Pivot the appointments of one breakdown into per-date rows.
///
/// Columns: `appt_date` (`01/Apr/22`), one per category, `total` over every
/// category, then `weekday` (`Fri`). Dates stay in ascending order.
pub fn by_date_frame(appointments: &Frame, spec: &ByDateSheet) -> ReportResult<Frame> {
    let filtered = appointments.filter_eq("breakdown", spec.breakdown)?;
    let mut daily = pivot(
        &filtered,
        "appt_date",
        spec.category,
        "appt_count",
        Aggregate::Mean,
    )?;
    with_row_total(&mut daily, "total", &["appt_date"])?;

    let weekdays = daily
        .column("appt_date")?
        .map(|date| relabel(date, weekday_label))
        .collect::<ReportResult<Vec<_>>>()?;
    let labels = daily
        .column("appt_date")?
        .map(|date| relabel(date, date_label))
        .collect::<ReportResult<Vec<_>>>()?;

    let index = daily.require_column("appt_date")?;
    let (columns, mut rows) = daily.into_parts();
    for (row, label) in rows.iter_mut().zip(labels) {
        row[index] = label;
    }
    let mut daily = Frame::new(columns, rows)?;
    daily.push_column("weekday", weekdays)?;
    Ok(daily)
}

/// Assemble and write one of the `Table 2x` sheets
pub fn write_by_date_sheet(
    workbook: &mut Workbook,
    appointments: &Frame,
    spec: &ByDateSheet,
) -> ReportResult<u32> {
    let daily = by_date_frame(appointments, spec)?;
    let layout = layout_with(spec.sheet, LEADING_COLUMNS, spec.categories);
    write_frame(workbook, &layout, &daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::template_workbook;
    use pretty_assertions::assert_eq;

    fn appointments() -> Frame {
        let rows: Vec<Vec<CellValue>> = [
            ("by_status_by_date", "2022-04-04", "Attended", 50.0),
            ("by_status_by_date", "2022-04-01", "Attended", 90.0),
            ("by_status_by_date", "2022-04-01", "DNA", 6.0),
            ("by_status_by_date", "2022-04-01", "DNA", 4.0),
            ("by_status_by_date", "2022-04-01", "Unknown", 1.0),
            ("by_hcp_type_by_date", "2022-04-01", "GP", 1000.0),
        ]
        .into_iter()
        .map(|(breakdown, date, status, count)| {
            vec![CellValue::from(breakdown), date.into(), status.into(), count.into()]
        })
        .collect();

        Frame::new(
            vec![
                "breakdown".into(),
                "appt_date".into(),
                "appt_status".into(),
                "appt_count".into(),
            ],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_by_date_frame() {
        let daily = by_date_frame(&appointments(), &TABLE_2A).unwrap();

        assert_eq!(
            daily.columns(),
            &["appt_date", "Attended", "DNA", "Unknown", "total", "weekday"]
        );
        assert_eq!(
            daily.rows()[0],
            vec![
                CellValue::from("01/Apr/22"),
                CellValue::Number(90.0),
                CellValue::Number(5.0),
                CellValue::Number(1.0),
                CellValue::Number(96.0),
                CellValue::from("Fri"),
            ]
        );
        assert_eq!(daily.value(1, "appt_date").unwrap(), &CellValue::from("04/Apr/22"));
        assert_eq!(daily.value(1, "DNA").unwrap(), &CellValue::Number(0.0));
        assert_eq!(daily.value(1, "weekday").unwrap(), &CellValue::from("Mon"));
    }

    #[test]
    fn test_write_by_date_sheet() {
        let mut workbook = template_workbook(&["Table 2a"]);

        write_by_date_sheet(&mut workbook, &appointments(), &TABLE_2A).unwrap();

        let sheet = workbook.worksheet_by_name("Table 2a").unwrap();
        let row: Vec<CellValue> = (1..=6).map(|col| sheet.get_value_at(3, col)).collect();
        assert_eq!(
            row,
            vec![
                CellValue::from("Fri"),
                CellValue::from("01/Apr/22"),
                CellValue::Number(96.0),
                CellValue::Number(90.0),
                CellValue::Number(5.0),
                CellValue::Number(1.0),
            ]
        );
        assert_eq!(sheet.get_value("A5").unwrap(), CellValue::from("Source: NHS Digital"));
    }

    #[test]
    fn test_missing_category() {
        let mut workbook = template_workbook(&["Table 2b"]);

        // Only GP appears for the hcp breakdown
        let mut extract = appointments();
        extract.rename_column("appt_status", "hcp_type").unwrap();
        let err = write_by_date_sheet(&mut workbook, &extract, &TABLE_2B).unwrap_err();

        assert!(matches!(
            err,
            ReportError::MissingColumn { ref sheet, ref column }
                if sheet == "Table 2b" && column == "Other Practice Staff"
        ));
    }

    #[test]
    fn test_bad_date() {
        let mut extract = appointments();
        extract
            .push_row(vec![
                "by_status_by_date".into(),
                "sometime".into(),
                "DNA".into(),
                1.0.into(),
            ])
            .unwrap();

        let err = by_date_frame(&extract, &TABLE_2A).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDate(_)));
    }
}
