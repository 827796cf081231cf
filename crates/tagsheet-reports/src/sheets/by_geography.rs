use tagsheet_core::Workbook;
use tagsheet_csv::Frame;

use crate::error::ReportResult;
use crate::reshape::{dedup, inner_join, pivot, sort_by_geography, with_row_total, Aggregate};
use crate::sheets::{
    layout_with, write_frame, BOOKING_CATEGORIES, HCP_CATEGORIES, MODE_CATEGORIES,
    STATUS_CATEGORIES,
};

/// Appointments by geography next to the practice counts for each area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeographySheet {
    /// Template sheet name
    pub sheet: &'static str,
    /// `breakdown` values covering the national, region, STP and CCG levels
    pub breakdowns: &'static [&'static str],
    /// Extract column whose values become the sheet's columns
    pub category: &'static str,
    /// Category columns, in sheet order
    pub categories: &'static [&'static str],
}

pub static TABLE_3A: GeographySheet = GeographySheet {
    sheet: "Table 3a",
    breakdowns: &[
        "national_count_by_appt_status",
        "by_ccg_and_appt_status",
        "by_stp_and_appt_status",
        "by_region_and_appt_status",
    ],
    category: "appt_status",
    categories: STATUS_CATEGORIES,
};

pub static TABLE_3B: GeographySheet = GeographySheet {
    sheet: "Table 3b",
    breakdowns: &[
        "national_count_by_hcp_type",
        "by_ccg_and_hcp_type",
        "by_stp_and_hcp_type",
        "by_region_and_hcp_type",
    ],
    category: "hcp_type",
    categories: HCP_CATEGORIES,
};

pub static TABLE_3C: GeographySheet = GeographySheet {
    sheet: "Table 3c",
    breakdowns: &[
        "national_count_by_appt_mode",
        "by_ccg_and_appt_mode",
        "by_stp_and_appt_mode",
        "by_region_and_appt_mode",
    ],
    category: "appt_mode",
    categories: MODE_CATEGORIES,
};

pub static TABLE_3D: GeographySheet = GeographySheet {
    sheet: "Table 3d",
    breakdowns: &[
        "national_count_by_time_between_booking_and_appt",
        "by_ccg_and_time_between_booking_and_appt",
        "by_stp_and_time_between_booking_and_appt",
        "by_region_and_time_between_booking_and_appt",
    ],
    category: "time_between_booking_and_appt",
    categories: BOOKING_CATEGORIES,
};

const LEADING_COLUMNS: &[&str] = &[
    "geog_type",
    "geog_code",
    "geog_ons_code",
    "geog_name",
    "count_of_open_practice",
    "count_of_included_practice",
    "total",
];

/// Join practice counts with pivoted appointments, one row per geography.
///
/// Rows follow the practices ordered by geography level then `geog_code`;
/// geographies missing from either side are dropped.
pub fn geography_frame(
    appointments: &Frame,
    practices: &Frame,
    spec: &GeographySheet,
) -> ReportResult<Frame> {
    let mut practices = practices.clone();
    sort_by_geography(&mut practices)?;
    let practices = practices.select(&[
        "geog_type",
        "geog_ons_code",
        "count_of_open_practice",
        "count_of_included_practice",
    ])?;

    let filtered = appointments.filter_in("breakdown", spec.breakdowns)?;
    let geographies = filtered.select(&["geog_ons_code", "geog_name", "geog_code"])?;

    let mut counts = pivot(
        &filtered,
        "geog_ons_code",
        spec.category,
        "appt_count",
        Aggregate::Mean,
    )?;
    with_row_total(&mut counts, "total", &["geog_ons_code"])?;

    let mut named = inner_join(&counts, &geographies, "geog_ons_code")?;
    dedup(&mut named);

    let mut combined = inner_join(&practices, &named, "geog_ons_code")?;
    dedup(&mut combined);
    Ok(combined)
}

/// Assemble and write one of the `Table 3x` sheets
pub fn write_geography_sheet(
    workbook: &mut Workbook,
    appointments: &Frame,
    practices: &Frame,
    spec: &GeographySheet,
) -> ReportResult<u32> {
    let combined = geography_frame(appointments, practices, spec)?;
    let layout = layout_with(spec.sheet, LEADING_COLUMNS, spec.categories);
    write_frame(workbook, &layout, &combined)
}
