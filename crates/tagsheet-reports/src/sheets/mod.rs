//! Assemblers that turn extracts into the tables each report sheet expects

mod by_date;
mod by_geography;
mod easy;
mod summary;
mod trend;

pub use by_date::{
    by_date_frame, write_by_date_sheet, ByDateSheet, TABLE_2A, TABLE_2B, TABLE_2C, TABLE_2D,
};
pub use by_geography::{
    geography_frame, write_geography_sheet, GeographySheet, TABLE_3A, TABLE_3B, TABLE_3C,
    TABLE_3D,
};
pub use easy::{write_easy_sheet, EASY_A_SHEET, EASY_B_SHEET, EASY_COLUMNS};
pub use summary::{parse_tag, summary_tags, write_summary_sheet, SummaryValues, SUMMARY_SHEET};
pub use trend::{
    trend_frame, write_trend_sheet, PATIENT_COVERAGE, TREND_COLUMNS, TREND_SHEET, WEEKDAY_BREAKDOWN,
};

use tagsheet_core::Workbook;
use tagsheet_csv::Frame;
use tagsheet_template::{write_table_to_sheet, SheetLayout, Table};

use crate::error::{ReportError, ReportResult};

/// Appointment status categories
pub const STATUS_CATEGORIES: &[&str] = &["Attended", "DNA", "Unknown"];

/// Healthcare professional categories
pub const HCP_CATEGORIES: &[&str] = &["GP", "Other Practice Staff", "Unknown"];

/// Appointment mode categories
pub const MODE_CATEGORIES: &[&str] =
    &["Face-to-Face", "Home Visit", "Telephone", "Video/Online", "Unknown"];

/// Time between booking and appointment categories
pub const BOOKING_CATEGORIES: &[&str] = &[
    "Same Day",
    "1 Day",
    "2 to 7 Days",
    "8 to 14 Days",
    "15 to 21 Days",
    "22 to 28 Days",
    "More than 28 Days",
    "Unknown / Data Quality",
];

/// Layout of `sheet`: `leading` columns followed by `categories`
pub(crate) fn layout_with(sheet: &str, leading: &[&str], categories: &[&str]) -> SheetLayout {
    let columns: Vec<&str> = leading.iter().chain(categories).copied().collect();
    SheetLayout::new(sheet, &columns)
}

/// Select the layout's columns out of `frame`, naming the sheet when one is
/// missing.
pub(crate) fn table_for(frame: &Frame, layout: &SheetLayout) -> ReportResult<Table> {
    if let Some(column) = layout
        .columns
        .iter()
        .find(|column| frame.column_index(column).is_none())
    {
        return Err(ReportError::MissingColumn {
            sheet: layout.sheet.clone(),
            column: column.clone(),
        });
    }

    let (columns, rows) = frame.select(&layout.columns)?.into_parts();
    Ok(Table::new(columns, rows))
}

/// Shape `frame` to `layout` and write it under the sheet's `<start>` tag
pub(crate) fn write_frame(
    workbook: &mut Workbook,
    layout: &SheetLayout,
    frame: &Frame,
) -> ReportResult<u32> {
    let table = table_for(frame, layout)?;
    Ok(write_table_to_sheet(workbook, layout, &table)?)
}

/// A workbook whose sheets each hold `<start>` at A3, `<end>` at A40 and a
/// footer at A41
#[cfg(test)]
pub(crate) fn template_workbook(sheets: &[&str]) -> Workbook {
    use tagsheet_core::Worksheet;
    use tagsheet_template::{END_TAG, START_TAG};

    let mut workbook = Workbook::empty();
    for name in sheets {
        let mut sheet = Worksheet::new(*name);
        sheet.set_cell_value("A1", *name).unwrap();
        sheet.set_cell_value("A3", START_TAG).unwrap();
        sheet.set_cell_value("A40", END_TAG).unwrap();
        sheet.set_cell_value("A41", "Source: NHS Digital").unwrap();
        workbook.add_existing_worksheet(sheet).unwrap();
    }
    workbook
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagsheet_core::CellValue;

    #[test]
    fn test_table_for_orders_columns() {
        let frame = Frame::new(
            vec!["DNA".into(), "appt_date".into(), "Attended".into()],
            vec![vec![1.into(), "01/Apr/22".into(), 9.into()]],
        )
        .unwrap();
        let layout = layout_with("Table X", &["appt_date"], &["Attended", "DNA"]);

        let table = table_for(&frame, &layout).unwrap();
        assert_eq!(table.columns, vec!["appt_date", "Attended", "DNA"]);
        assert_eq!(
            table.rows,
            vec![vec![CellValue::from("01/Apr/22"), CellValue::Number(9.0), CellValue::Number(1.0)]]
        );
    }

    #[test]
    fn test_table_for_names_missing_column() {
        let frame = Frame::with_columns(&["appt_date"]);
        let layout = layout_with("Table 2a", &["weekday", "appt_date"], &[]);

        let err = table_for(&frame, &layout).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumn { ref sheet, ref column }
                if sheet == "Table 2a" && column == "weekday"
        ));
    }
}
