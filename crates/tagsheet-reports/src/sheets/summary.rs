//! The tag-keyed summary sheet (`Table 1`)
//!
//! Every figure cell carries a tag `<breakdown_1,breakdown_2,breakdown_3>`,
//! repeated once per month column. A month column is filled by looking each
//! tag up in `table1_data.csv` and writing the value found in that month's
//! column of the extract.

use std::collections::HashMap;

use tagsheet_core::{CellValue, Workbook};
use tagsheet_csv::Frame;
use tagsheet_template::{write_tagged_cells, MONTH_TAG};
use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};

/// Template sheet name
pub const SUMMARY_SHEET: &str = "Table 1";

/// Column of the latest month; earlier months follow to the right
const FIRST_MONTH_COLUMN: u16 = 3;

const COVERAGE: &[&str] = &[
    "<Coverage,Open active practices,count>",
    "<Coverage,Count of practices included,count>",
    "<Coverage,Practice coverage,count>",
    "<Coverage,Registered patients at open active practices,count>",
    "<Coverage,Registered patients at included practices,count>",
    "<Coverage,Patient coverage,count>",
];

const WORKING_DAYS: &[&str] = &["<Working Days,Number of working weekdays,count>"];

const APPOINTMENT_COUNT: &[&str] = &[
    "<Appointment Count,Total count of appointments,count>",
    "<Appointment Count,Estimated England total count of appointments,count>",
    "<Appointment Count,Covid Vaccination appointments removed from GP Appointments Data return,count>",
];

const STATUS: &[&str] = &[
    "<Appointment Status,Attended,count>",
    "<Appointment Status,Did Not Attend,count>",
    "<Appointment Status,Unknown Status,count>",
];

const MODE: &[&str] = &[
    "<Appointment Mode,Face-to-Face,count>",
    "<Appointment Mode,Home Visit,count>",
    "<Appointment Mode,Telephone,count>",
    "<Appointment Mode,Video/Online,count>",
    "<Appointment Mode,Unknown Mode,count>",
];

// Spacing inside the labels matches the extract, double spaces included.
const TIME_BETWEEN: &[&str] = &[
    "<Time between,Same Day,count>",
    "<Time between,1 Day,count>",
    "<Time between,2 to 7 Days,count>",
    "<Time between,8  to 14 Days,count>",
    "<Time between,15  to 21 Days,count>",
    "<Time between,22  to 28 Days,count>",
    "<Time between,More than 28 Days,count>",
    "<Time between,Unknown / Data Quality,count>",
];

const HCP_TYPE: &[&str] = &[
    "<Healthcare Professional,GP,count>",
    "<Healthcare Professional,Other Practice staff,count>",
    "<Healthcare Professional,Unknown HCP,count>",
];

const STATUS_PERCENT: &[&str] = &[
    "<Appointment Status,Attended,percent>",
    "<Appointment Status,Did Not Attend,percent>",
    "<Appointment Status,Unknown Status,percent>",
];

const MODE_PERCENT: &[&str] = &[
    "<Appointment Mode,Face-to-Face,percent>",
    "<Appointment Mode,Home Visit,percent>",
    "<Appointment Mode,Telephone,percent>",
    "<Appointment Mode,Video/Online,percent>",
    "<Appointment Mode,Unknown Mode,percent>",
];

const TIME_BETWEEN_PERCENT: &[&str] = &[
    "<Time between,Same Day,percent>",
    "<Time between,1 Day,percent>",
    "<Time between,2 to 7 Days,percent>",
    "<Time between,8  to 14 Days,percent>",
    "<Time between,15  to 21 Days,percent>",
    "<Time between,22  to 28 Days,percent>",
    "<Time between,More than 28 Days,percent>",
    "<Time between,Unknown / Data Quality,percent>",
];

const HCP_TYPE_PERCENT: &[&str] = &[
    "<Healthcare Professional,GP,percent>",
    "<Healthcare Professional,Other Practice staff,percent>",
    "<Healthcare Professional,Unknown HCP,percent>",
];

const TAG_GROUPS: &[&[&str]] = &[
    COVERAGE,
    WORKING_DAYS,
    APPOINTMENT_COUNT,
    STATUS,
    MODE,
    TIME_BETWEEN,
    HCP_TYPE,
    STATUS_PERCENT,
    MODE_PERCENT,
    TIME_BETWEEN_PERCENT,
    HCP_TYPE_PERCENT,
];

/// Every figure tag of the summary sheet, in write order
pub fn summary_tags() -> impl Iterator<Item = &'static str> {
    TAG_GROUPS.iter().flat_map(|group| group.iter().copied())
}

/// Split `<b1,b2,b3>` into its three breakdowns. Parts are not trimmed.
pub fn parse_tag(tag: &str) -> ReportResult<(&str, &str, &str)> {
    let inner = tag
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| ReportError::InvalidTag(tag.to_string()))?;

    let mut parts = inner.split(',');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(b1), Some(b2), Some(b3), None) => Ok((b1, b2, b3)),
        _ => Err(ReportError::InvalidTag(tag.to_string())),
    }
}

/// `table1_data.csv` indexed by its breakdown columns
#[derive(Debug)]
pub struct SummaryValues<'a> {
    frame: &'a Frame,
    rows: HashMap<(String, String, String), usize>,
}

impl<'a> SummaryValues<'a> {
    /// Index the extract; the first row wins when breakdowns repeat
    pub fn new(frame: &'a Frame) -> ReportResult<Self> {
        let b1 = frame.require_column("breakdown_1")?;
        let b2 = frame.require_column("breakdown_2")?;
        let b3 = frame.require_column("breakdown_3")?;

        let mut rows = HashMap::new();
        for (index, row) in frame.rows().iter().enumerate() {
            let key = (row[b1].to_string(), row[b2].to_string(), row[b3].to_string());
            rows.entry(key).or_insert(index);
        }
        Ok(Self { frame, rows })
    }

    /// The figure for `tag` in `month`
    pub fn value(&self, tag: &str, month: &str) -> ReportResult<CellValue> {
        let (b1, b2, b3) = parse_tag(tag)?;
        let key = (b1.to_string(), b2.to_string(), b3.to_string());
        let row = self
            .rows
            .get(&key)
            .copied()
            .ok_or_else(|| ReportError::MissingBreakdown {
                tag: tag.to_string(),
                month: month.to_string(),
            })?;
        Ok(self.frame.value(row, month)?.clone())
    }
}

/// Fill one summary column per month, latest month in column `C`.
pub fn write_summary_sheet(
    workbook: &mut Workbook,
    table1: &Frame,
    months: &[String],
) -> ReportResult<()> {
    let values = SummaryValues::new(table1)?;
    let sheet = workbook.require_sheet_mut(SUMMARY_SHEET)?;

    let mut cells = Vec::with_capacity(months.len() * (summary_tags().count() + 1));
    for (offset, month) in months.iter().enumerate() {
        let column = u16::try_from(offset)
            .ok()
            .and_then(|offset| FIRST_MONTH_COLUMN.checked_add(offset))
            .ok_or_else(|| ReportError::Config(format!("too many report months ({})", months.len())))?;

        cells.push((column, MONTH_TAG, CellValue::from(month.as_str())));
        for tag in summary_tags() {
            cells.push((column, tag, values.value(tag, month)?));
        }
        debug!(month = month.as_str(), column, "collected summary month");
    }

    // Every tag is located before the first write
    let written = write_tagged_cells(sheet, cells)?;
    debug!(written, "wrote summary cells");

    info!(sheet = SUMMARY_SHEET, months = months.len(), "wrote summary");
    Ok(())
}
