//! XLSX writer
//!
//! Writes a workbook back into the package it was read from. Every part is
//! copied through unchanged except:
//! - worksheets, whose `sheetData`, `dimension` and `mergeCells` are
//!   regenerated from the cell grid
//! - `xl/workbook.xml`, whose `calcPr` is told to recalculate on load
//! - the calculation chain, which is dropped together with its content type
//!   override and relationship

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use tracing::{debug, info, warn};

use crate::error::{XlsxError, XlsxResult};
use tagsheet_core::{CellAddress, CellData, CellValue, RowProps, Workbook, Worksheet};

const CALC_CHAIN_PART: &str = "xl/calcChain.xml";

/// Worksheet children that must come after `mergeCells`
const MERGE_CELLS_FOLLOWERS: &[&[u8]] = &[
    b"phoneticPr",
    b"conditionalFormatting",
    b"dataValidations",
    b"hyperlinks",
    b"printOptions",
    b"pageMargins",
    b"pageSetup",
    b"headerFooter",
    b"rowBreaks",
    b"colBreaks",
    b"customProperties",
    b"cellWatches",
    b"ignoredErrors",
    b"smartTags",
    b"drawing",
    b"legacyDrawing",
    b"legacyDrawingHF",
    b"drawingHF",
    b"picture",
    b"oleObjects",
    b"controls",
    b"webPublishItems",
    b"tableParts",
    b"extLst",
];

/// Workbook children that must come after `calcPr`
const CALC_PR_FOLLOWERS: &[&[u8]] = &[
    b"oleSize",
    b"customWorkbookViews",
    b"pivotCaches",
    b"smartTagPr",
    b"smartTagTypes",
    b"webPublishing",
    b"fileRecoveryPr",
    b"webPublishObjects",
    b"extLst",
];

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::write(workbook, BufWriter::new(file))?;
        info!(path = %path.display(), sheets = workbook.sheet_count(), "wrote workbook");
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let package = workbook.source_package().ok_or(XlsxError::NoTemplate)?;

        let mut sheets_by_part: HashMap<&str, &Worksheet> = HashMap::new();
        for sheet in workbook.worksheets() {
            match sheet.source_part() {
                Some(part) => {
                    sheets_by_part.insert(part, sheet);
                }
                None => warn!(
                    sheet = sheet.name(),
                    "worksheet has no template part and will not be written"
                ),
            }
        }

        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();

        for part in package.parts() {
            let name = part.name.as_str();
            if name == CALC_CHAIN_PART {
                debug!(part = name, "dropping calculation chain");
                continue;
            }

            let rewritten = match name {
                "[Content_Types].xml" => Some(Self::drop_calc_chain_override(&part.data)?),
                "xl/_rels/workbook.xml.rels" => Some(Self::drop_calc_chain_relationship(&part.data)?),
                "xl/workbook.xml" => Some(Self::request_full_calc(&part.data)?),
                _ => match sheets_by_part.get(name) {
                    Some(sheet) => Some(Self::rewrite_worksheet(&part.data, sheet)?),
                    None => None,
                },
            };

            zip.start_file(name, options)?;
            match rewritten {
                Some(data) => zip.write_all(&data)?,
                None => zip.write_all(&part.data)?,
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn drop_calc_chain_override(data: &[u8]) -> XlsxResult<Vec<u8>> {
        rewrite_part(data, |event| match event {
            Event::Start(e) | Event::Empty(e)
                if e.name().as_ref() == b"Override"
                    && attr_value(e, b"PartName").as_deref() == Some("/xl/calcChain.xml") =>
            {
                Edit::Replace(String::new())
            }
            _ => Edit::Keep,
        })
    }

    fn drop_calc_chain_relationship(data: &[u8]) -> XlsxResult<Vec<u8>> {
        rewrite_part(data, |event| match event {
            Event::Start(e) | Event::Empty(e)
                if e.name().as_ref() == b"Relationship"
                    && attr_value(e, b"Type").map_or(false, |t| t.ends_with("/calcChain")) =>
            {
                Edit::Replace(String::new())
            }
            _ => Edit::Keep,
        })
    }

    /// Formulas are written without cached results, so Excel has to
    /// recalculate them when the file is opened.
    fn request_full_calc(data: &[u8]) -> XlsxResult<Vec<u8>> {
        let mut placed = false;
        rewrite_part(data, |event| match event {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"calcPr" => {
                    placed = true;
                    let mut calc_pr = BytesStart::new("calcPr");
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() != b"fullCalcOnLoad" {
                            calc_pr.push_attribute(attr);
                        }
                    }
                    calc_pr.push_attribute(("fullCalcOnLoad", "1"));
                    Edit::Replace(format!("<{}/>", String::from_utf8_lossy(&calc_pr)))
                }
                name if !placed && CALC_PR_FOLLOWERS.contains(&name) => {
                    placed = true;
                    Edit::InsertBefore(r#"<calcPr fullCalcOnLoad="1"/>"#.to_string())
                }
                _ => Edit::Keep,
            },
            Event::End(_) if !placed => {
                placed = true;
                Edit::InsertBefore(r#"<calcPr fullCalcOnLoad="1"/>"#.to_string())
            }
            _ => Edit::Keep,
        })
    }

    fn rewrite_worksheet(data: &[u8], sheet: &Worksheet) -> XlsxResult<Vec<u8>> {
        let mut sheet_data = sheet_data_xml(sheet);
        let mut merge_cells = merge_cells_xml(sheet);
        let dimension = format!(
            r#"<dimension ref="{}"/>"#,
            sheet
                .used_range()
                .map(|range| range.to_string())
                .unwrap_or_else(|| "A1".to_string())
        );
        let mut merges_placed = false;

        let rewritten = rewrite_part(data, |event| match event {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"sheetData" => Edit::Replace(std::mem::take(&mut sheet_data)),
                b"dimension" => Edit::Replace(dimension.clone()),
                b"mergeCells" => {
                    merges_placed = true;
                    Edit::Replace(std::mem::take(&mut merge_cells))
                }
                name if !merges_placed && MERGE_CELLS_FOLLOWERS.contains(&name) => {
                    merges_placed = true;
                    Edit::InsertBefore(std::mem::take(&mut merge_cells))
                }
                _ => Edit::Keep,
            },
            Event::End(_) if !merges_placed => {
                merges_placed = true;
                Edit::InsertBefore(std::mem::take(&mut merge_cells))
            }
            _ => Edit::Keep,
        })?;

        debug!(
            sheet = sheet.name(),
            cells = sheet.cell_count(),
            merges = sheet.merged_regions().len(),
            "rewrote worksheet"
        );
        Ok(rewritten)
    }
}

/// What to do with a direct child of a part's root element
enum Edit {
    Keep,
    /// Swap the element, content included, for raw XML (empty drops it)
    Replace(String),
    /// Emit raw XML, then the element itself
    InsertBefore(String),
}

/// Stream `data` through, letting `edit` decide the fate of every event
/// directly inside the root element. The root's own end tag is offered too,
/// so insertions can land at the very end.
fn rewrite_part<F>(data: &[u8], mut edit: F) -> XlsxResult<Vec<u8>>
where
    F: FnMut(&Event<'_>) -> Edit,
{
    let mut reader = Reader::from_reader(data);
    let mut writer = Writer::new(Vec::with_capacity(data.len()));
    let mut buf = Vec::new();
    let mut skip = Vec::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        if matches!(event, Event::Eof) {
            break;
        }

        let action = if depth == 1 { edit(&event) } else { Edit::Keep };
        let replaced = matches!(action, Edit::Replace(_));
        match action {
            Edit::Keep => writer.write_event(&event)?,
            Edit::Replace(xml) => {
                if let Event::Start(e) = &event {
                    reader.read_to_end_into(e.name(), &mut skip)?;
                    skip.clear();
                }
                writer.get_mut().extend_from_slice(xml.as_bytes());
            }
            Edit::InsertBefore(xml) => {
                writer.get_mut().extend_from_slice(xml.as_bytes());
                writer.write_event(&event)?;
            }
        }

        if !replaced {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.try_get_attribute(key)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn sheet_data_xml(sheet: &Worksheet) -> String {
    let mut xml = String::from("<sheetData>");

    for row in sheet.row_indices() {
        let mut cells = String::new();
        for (col, cell) in sheet.row_cells(row) {
            push_cell(&mut cells, CellAddress::new(row, col), cell);
        }

        let props = sheet.row_props(row);
        if cells.is_empty() && !props.map_or(false, RowProps::has_custom_settings) {
            continue;
        }

        xml.push_str(&format!("<row r=\"{}\"", row));
        if let Some(props) = props {
            if let Some(style) = props.style_index {
                xml.push_str(&format!(" s=\"{}\" customFormat=\"1\"", style));
            }
            if let Some(height) = props.height {
                xml.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
            }
            if props.hidden {
                xml.push_str(" hidden=\"1\"");
            }
        }

        if cells.is_empty() {
            xml.push_str("/>");
        } else {
            xml.push('>');
            xml.push_str(&cells);
            xml.push_str("</row>");
        }
    }

    xml.push_str("</sheetData>");
    xml
}

fn push_cell(xml: &mut String, addr: CellAddress, cell: &CellData) {
    let cell_ref = addr.to_a1_string();
    let style_attr = if cell.style_index != 0 {
        format!(" s=\"{}\"", cell.style_index)
    } else {
        String::new()
    };

    match &cell.value {
        CellValue::Number(n) if n.is_finite() => {
            xml.push_str(&format!(
                "<c r=\"{}\"{}><v>{}</v></c>",
                cell_ref, style_attr, n
            ));
        }
        CellValue::Number(_) => {
            xml.push_str(&format!(
                "<c r=\"{}\"{} t=\"e\"><v>#NUM!</v></c>",
                cell_ref, style_attr
            ));
        }
        CellValue::String(s) => {
            xml.push_str(&format!(
                "<c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                cell_ref,
                style_attr,
                escape_text(s.as_str())
            ));
        }
        CellValue::Boolean(b) => {
            xml.push_str(&format!(
                "<c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                u8::from(*b)
            ));
        }
        CellValue::Formula { text, .. } => {
            let formula_text = text.strip_prefix('=').unwrap_or(text);
            xml.push_str(&format!(
                "<c r=\"{}\"{}><f>{}</f></c>",
                cell_ref,
                style_attr,
                escape_xml(formula_text)
            ));
        }
        CellValue::Error(e) => {
            xml.push_str(&format!(
                "<c r=\"{}\"{} t=\"e\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                escape_xml(e.as_str())
            ));
        }
        CellValue::Empty => {
            // Style-only cells keep the template's formatting
            if cell.style_index != 0 {
                xml.push_str(&format!("<c r=\"{}\"{}/>", cell_ref, style_attr));
            }
        }
    }
}

fn merge_cells_xml(sheet: &Worksheet) -> String {
    let regions = sheet.merged_regions();
    if regions.is_empty() {
        return String::new();
    }

    let mut xml = format!("<mergeCells count=\"{}\">", regions.len());
    for range in regions {
        xml.push_str(&format!("<mergeCell ref=\"{}\"/>", range));
    }
    xml.push_str("</mergeCells>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape cell text, encoding control characters the way Excel does
/// (`_xHHHH_`) and protecting literal text that would read as such an escape.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '_' if looks_like_excel_escape(&s[i..]) => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            c if u32::from(c) < 0x20 => out.push_str(&format!("_x{:04X}_", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

fn looks_like_excel_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}
