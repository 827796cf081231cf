//! Report templates and extracts written to a temporary directory

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tagsheet_reports::sheets::{
    summary_tags, ByDateSheet, GeographySheet, TABLE_2A, TABLE_2B, TABLE_2C, TABLE_2D, TABLE_3A,
    TABLE_3B, TABLE_3C, TABLE_3D, WEEKDAY_BREAKDOWN,
};

pub const MONTHS: [&str; 2] = ["Apr-22", "Mar-22"];

pub static BY_DATE: [&ByDateSheet; 4] = [&TABLE_2A, &TABLE_2B, &TABLE_2C, &TABLE_2D];

pub static BY_GEOGRAPHY: [&GeographySheet; 4] = [&TABLE_3A, &TABLE_3B, &TABLE_3C, &TABLE_3D];

/// (geog_type, geog_ons_code, geog_code, geog_name), in report order
pub const GEOGRAPHIES: [(&str, &str, &str, &str); 4] = [
    ("National", "E92000001", "ENG", "England"),
    ("Region", "E40000003", "Y56", "London"),
    ("STP", "E54000008", "QWO", "West Yorkshire"),
    ("CCG", "E38000001", "02N", "Airedale"),
];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn inline(cell: &str, text: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
        cell,
        escape(text)
    )
}

/// `<start>` at A3, `<end>` at A30, a footer at A31
pub fn table_sheet(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            r#"<dimension ref="A1:A31"/><sheetData>"#,
            r#"<row r="1">{}</row><row r="3">{}</row><row r="30">{}</row>"#,
            r#"<row r="31" ht="30" customHeight="1">{}</row>"#,
            r#"</sheetData></worksheet>"#
        ),
        inline("A1", title),
        inline("A3", "<start>"),
        inline("A30", "<end>"),
        inline("A31", "Source: NHS Digital"),
    )
}

/// Month headings in C4/D4, then one summary tag per row from row 6
pub fn summary_sheet() -> String {
    let mut rows = format!(
        r#"<row r="1">{}</row><row r="4">{}{}</row>"#,
        inline("A1", "Summary"),
        inline("C4", "<month>"),
        inline("D4", "<month>"),
    );
    for (row, tag) in (6..).zip(summary_tags()) {
        rows.push_str(&format!(
            r#"<row r="{row}">{}{}</row>"#,
            inline(&format!("C{}", row), tag),
            inline(&format!("D{}", row), tag),
        ));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            r#"<sheetData>{}</sheetData></worksheet>"#
        ),
        rows
    )
}

/// Write a package holding `sheets` as (name, worksheet XML)
pub fn write_template(path: &Path, sheets: &[(&str, String)]) {
    let mut content_types = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    ));
    let mut workbook = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    ));
    let mut rels = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    ));

    for (n, (name, _)) in (1..).zip(sheets) {
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape(name)
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str(r#"</sheets><calcPr calcId="191029"/></workbook>"#);
    rels.push_str("</Relationships>");

    let root_rels = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
        r#"</Relationships>"#
    );

    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types),
        ("_rels/.rels".into(), root_rels.into()),
        ("xl/workbook.xml".into(), workbook),
        ("xl/_rels/workbook.xml.rels".into(), rels),
    ];
    for (n, (_, xml)) in (1..).zip(sheets) {
        parts.push((format!("xl/worksheets/sheet{}.xml", n), xml.clone()));
    }

    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Template for a project whose sheets are all tables, plus `Table 1` when
/// `with_summary` is set
pub fn write_project_template(path: &Path, table_sheets: &[&str], with_summary: bool) {
    let mut sheets: Vec<(&str, String)> = Vec::new();
    if with_summary {
        sheets.push(("Table 1", summary_sheet()));
    }
    sheets.extend(table_sheets.iter().map(|name| (*name, table_sheet(name))));
    write_template(path, &sheets);
}

fn write_csv(path: &Path, header: &str, rows: &[String]) {
    let mut text = format!("{}\n", header);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}

/// Both easy extracts; `Easy B` counts are ten times `Easy A`'s
pub fn write_easy_extracts(dir: &Path) {
    let header = "appt_date,weekday,total,Attended,DNA,Unknown";
    for (file, scale) in [("data_for_sheet_easy_a.csv", 1), ("data_for_sheet_easy_b.csv", 10)] {
        let rows = vec![
            format!("01/Apr/22,Fri,{},{},{},{}", 100 * scale, 90 * scale, 6 * scale, 4 * scale),
            format!("04/Apr/22,Mon,{},{},{},{}", 200 * scale, 180 * scale, 12 * scale, 8 * scale),
        ];
        write_csv(&dir.join(file), header, &rows);
    }
}

/// Appointments covering every category of every daily and geographic sheet
pub fn write_medium_extracts(dir: &Path) {
    let categories = [
        "appt_status",
        "hcp_type",
        "appt_mode",
        "time_between_booking_and_appt",
    ];
    let header = format!(
        "breakdown,appt_date,geog_ons_code,geog_name,geog_code,{},appt_count",
        categories.join(",")
    );

    let category_fields = |column: &str, value: &str| -> String {
        categories
            .iter()
            .map(|c| if *c == column { value } else { "" })
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut rows = Vec::new();
    for spec in BY_DATE {
        for (n, category) in (1..).zip(spec.categories) {
            for date in ["2022-04-01", "2022-04-04"] {
                rows.push(format!(
                    "{},{},,,,{},{}",
                    spec.breakdown,
                    date,
                    category_fields(spec.category, category),
                    n * 10
                ));
            }
        }
    }
    for spec in BY_GEOGRAPHY {
        for breakdown in spec.breakdowns {
            let (_, ons, code, name) = GEOGRAPHIES
                .iter()
                .copied()
                .find(|(kind, ..)| level_of(breakdown) == *kind)
                .unwrap();
            for (n, category) in (1..).zip(spec.categories) {
                rows.push(format!(
                    "{},,{},{},{},{},{}",
                    breakdown,
                    ons,
                    name,
                    code,
                    category_fields(spec.category, category),
                    n
                ));
            }
        }
    }
    write_csv(&dir.join("appointment_data.csv"), &header, &rows);

    // Listed out of order on purpose
    let practices: Vec<String> = GEOGRAPHIES
        .iter()
        .rev()
        .enumerate()
        .map(|(i, (kind, ons, code, _))| format!("{},{},{},{},{}", kind, ons, code, 100 + i, 90 + i))
        .collect();
    write_csv(
        &dir.join("practices_data.csv"),
        "geog_type,geog_ons_code,geog_code,count_of_open_practice,count_of_included_practice",
        &practices,
    );

    write_table1_extract(dir);
}

fn level_of(breakdown: &str) -> &'static str {
    if breakdown.starts_with("national") {
        "National"
    } else if breakdown.starts_with("by_region") {
        "Region"
    } else if breakdown.starts_with("by_stp") {
        "STP"
    } else {
        "CCG"
    }
}

/// Every summary tag, the weekday estimates and patient coverage for
/// [`MONTHS`]. The n-th summary tag holds `n` in `Apr-22` and `n * 10` in
/// `Mar-22`.
pub fn write_table1_extract(dir: &Path) {
    let mut rows: Vec<String> = (1..)
        .zip(summary_tags())
        .map(|(n, tag)| {
            let inner = &tag[1..tag.len() - 1];
            format!("{},{},{}", inner, n, n * 10)
        })
        .collect();
    for (n, day) in (1..).zip(["Mon", "Tue", "Wed", "Thu", "Fri"]) {
        rows.push(format!("{},{},count,{},{}", WEEKDAY_BREAKDOWN, day, n * 1000, n * 900));
    }
    write_csv(
        &dir.join("table1_data.csv"),
        &format!("breakdown_1,breakdown_2,breakdown_3,{},{}", MONTHS[0], MONTHS[1]),
        &rows,
    );
}
