//! Report months and date labels

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

use crate::error::{ReportError, ReportResult};

/// Label format for report months, e.g. `Apr-22`
pub const MONTH_LABEL_FORMAT: &str = "%b-%y";

/// Label format for appointment dates, e.g. `01/Apr/22`
pub const DATE_LABEL_FORMAT: &str = "%d/%b/%y";

/// `count` month labels going backward from `report_month`, latest first
pub fn report_months(report_month: NaiveDate, count: u32) -> ReportResult<Vec<String>> {
    let first = report_month
        .with_day(1)
        .ok_or_else(|| ReportError::InvalidDate(report_month.to_string()))?;

    (0..count)
        .map(|back| {
            first
                .checked_sub_months(Months::new(back))
                .map(|month| month.format(MONTH_LABEL_FORMAT).to_string())
                .ok_or_else(|| {
                    ReportError::InvalidDate(format!("{} months before {}", back, first))
                })
        })
        .collect()
}

/// Parse an extract date (`2022-04-01`, optionally with a time part)
pub fn parse_iso_date(text: &str) -> ReportResult<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| ReportError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", text)))
}

/// `2022-04-01` -> `01/Apr/22`
pub fn date_label(iso: &str) -> ReportResult<String> {
    Ok(parse_iso_date(iso)?.format(DATE_LABEL_FORMAT).to_string())
}

/// `2022-04-01` -> `Fri`
pub fn weekday_label(iso: &str) -> ReportResult<String> {
    Ok(parse_iso_date(iso)?.format("%a").to_string())
}
