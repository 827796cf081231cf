//! XLSX reader

mod shared_formula;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, info};

use self::shared_formula::SharedFormula;
use crate::error::{XlsxError, XlsxResult};
use tagsheet_core::{
    CellAddress, CellData, CellError, CellRange, CellValue, RowProps, SourcePackage, Workbook,
    Worksheet,
};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry directly:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    result.push_str(rest);
    result
}

fn attr_is_true(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let workbook = Self::read(BufReader::new(file))?;
        info!(
            path = %path.display(),
            sheets = workbook.sheet_count(),
            "read template"
        );
        Ok(workbook)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let package = Self::read_package(reader)?;

        // Verify this is an XLSX file
        if package.get("[Content_Types].xml").is_none() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = match package.get("xl/sharedStrings.xml") {
            Some(data) => Self::read_shared_strings(data)?,
            None => Vec::new(),
        };

        let workbook_xml = package
            .get("xl/workbook.xml")
            .ok_or_else(|| XlsxError::MissingPart("xl/workbook.xml".into()))?;
        let sheet_info = Self::read_workbook_xml(workbook_xml)?;

        let rels_xml = package
            .get("xl/_rels/workbook.xml.rels")
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;
        let sheet_paths = Self::read_workbook_rels(rels_xml)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            // Chartsheets and dialog sheets have no worksheet relationship
            let Some(path) = sheet_paths.get(r_id) else {
                debug!(sheet = name.as_str(), "skipping non-worksheet sheet");
                continue;
            };
            let data = package
                .get(path)
                .ok_or_else(|| XlsxError::MissingPart(path.clone()))?;

            let mut worksheet = Worksheet::new(name.as_str());
            worksheet.set_source_part(path.as_str());
            Self::read_worksheet(data, &mut worksheet, &shared_strings)?;
            debug!(
                sheet = name.as_str(),
                part = path.as_str(),
                cells = worksheet.cell_count(),
                "read worksheet"
            );
            workbook.add_existing_worksheet(worksheet)?;
        }

        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat("Workbook has no worksheets".into()));
        }

        workbook.set_source_package(package);
        Ok(workbook)
    }

    /// Load every file of the archive, in archive order
    fn read_package<R: Read + Seek>(reader: R) -> XlsxResult<SourcePackage> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut package = SourcePackage::new();

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut data)?;
            package.push(name, data);
        }

        Ok(package)
    }

    /// Read the shared strings table
    ///
    /// Rich text runs are concatenated; phonetic runs (`rPh`) are skipped.
    fn read_shared_strings(data: &[u8]) -> XlsxResult<Vec<String>> {
        let mut xml_reader = Reader::from_reader(data);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in tab order
    fn read_workbook_xml(data: &[u8]) -> XlsxResult<Vec<(String, String)>> {
        let mut xml_reader = Reader::from_reader(data);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"r:id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to map worksheet rIds to part paths
    fn read_workbook_rels(data: &[u8]) -> XlsxResult<HashMap<String, String>> {
        let mut xml_reader = Reader::from_reader(data);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Parse a `<row>` element's attributes
    fn parse_row_attrs(e: &BytesStart<'_>, previous_row: u32) -> XlsxResult<(u32, RowProps)> {
        let mut row_num = None;
        let mut ht = None;
        let mut custom_height = false;
        let mut style = None;
        let mut custom_format = false;
        let mut props = RowProps::default();

        for attr in e.attributes().flatten() {
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"r" => {
                    row_num = Some(value.parse::<u32>().map_err(|_| {
                        XlsxError::Parse(format!("Invalid row number '{}'", value))
                    })?);
                }
                b"ht" => ht = value.parse::<f64>().ok(),
                b"customHeight" => custom_height = attr_is_true(&value),
                b"hidden" => props.hidden = attr_is_true(&value),
                b"s" => style = value.parse::<u32>().ok(),
                b"customFormat" => custom_format = attr_is_true(&value),
                _ => {}
            }
        }

        if custom_height {
            props.height = ht;
        }
        if custom_format {
            props.style_index = style;
        }
        Ok((row_num.unwrap_or(previous_row + 1), props))
    }

    /// Read a worksheet's cells, row formatting and merged regions
    fn read_worksheet(
        data: &[u8],
        worksheet: &mut Worksheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let mut xml_reader = Reader::from_reader(data);

        let mut buf = Vec::new();

        // Position tracking for rows/cells that omit their reference
        let mut current_row: u32 = 0;
        let mut last_col: u16 = 0;

        // Current cell state
        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        let mut shared_formulas: HashMap<u32, SharedFormula> = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        let (row, props) = Self::parse_row_attrs(&e, current_row)?;
                        current_row = row;
                        last_col = 0;
                        worksheet.set_row_props(row, props);
                    }
                    b"c" => {
                        in_cell = true;
                        cell = PendingCell::from_attrs(&e, current_row, last_col)?;
                    }
                    b"v" if in_cell => in_value = true,
                    b"f" if in_cell => {
                        in_formula = true;
                        cell.formula.get_or_insert_with(String::new);
                        cell.note_formula_attrs(&e)?;
                    }
                    b"is" if in_cell => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        let (row, props) = Self::parse_row_attrs(&e, current_row)?;
                        current_row = row;
                        last_col = 0;
                        worksheet.set_row_props(row, props);
                    }
                    b"c" => {
                        // Style-only cell
                        let pending = PendingCell::from_attrs(&e, current_row, last_col)?;
                        last_col = pending.addr.col;
                        if pending.style != 0 {
                            worksheet.set_cell_style_index_at(
                                pending.addr.row,
                                pending.addr.col,
                                pending.style,
                            )?;
                        }
                    }
                    // Shared-formula follower
                    b"f" if in_cell => cell.note_formula_attrs(&e)?,
                    b"mergeCell" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"ref" {
                                let value = attr.unescape_value()?;
                                let range = CellRange::parse(&value)?;
                                worksheet.merge_cells(&range)?;
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        let mut pending = std::mem::take(&mut cell);
                        last_col = pending.addr.col;
                        pending.resolve_shared_formula(&mut shared_formulas);
                        let (addr, data) = pending.into_cell_data(shared_strings)?;
                        worksheet.set_cell_data_at(addr.row, addr.col, data)?;
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        cell.value.get_or_insert_with(String::new).push_str(&e.unescape()?);
                    } else if in_formula {
                        cell.formula.get_or_insert_with(String::new).push_str(&e.unescape()?);
                    } else if in_inline_text {
                        cell.inline.get_or_insert_with(String::new).push_str(&e.unescape()?);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

/// A `<c>` element collected while streaming
#[derive(Debug)]
struct PendingCell {
    addr: CellAddress,
    cell_type: Option<String>,
    style: u32,
    value: Option<String>,
    formula: Option<String>,
    shared_index: Option<u32>,
    inline: Option<String>,
}

impl Default for PendingCell {
    fn default() -> Self {
        Self {
            addr: CellAddress::new(1, 1),
            cell_type: None,
            style: 0,
            value: None,
            formula: None,
            shared_index: None,
            inline: None,
        }
    }
}

impl PendingCell {
    fn from_attrs(e: &BytesStart<'_>, current_row: u32, last_col: u16) -> XlsxResult<Self> {
        let mut pending = PendingCell {
            addr: CellAddress::new(current_row.max(1), last_col.saturating_add(1)),
            ..PendingCell::default()
        };

        for attr in e.attributes().flatten() {
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"r" => {
                    pending.addr = CellAddress::parse(&value).map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", value, err))
                    })?;
                }
                b"t" => pending.cell_type = Some(value.to_string()),
                b"s" => pending.style = value.parse::<u32>().unwrap_or(0),
                _ => {}
            }
        }

        Ok(pending)
    }

    /// Record the shared-group index of a `<f t="shared" si="..">`
    fn note_formula_attrs(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        let mut shared = false;
        let mut index = None;
        for attr in e.attributes().flatten() {
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"t" => shared = value == "shared",
                b"si" => index = value.parse::<u32>().ok(),
                _ => {}
            }
        }
        if shared {
            self.shared_index = index;
        }
        Ok(())
    }

    /// A master registers its group; a follower takes the master's
    /// formula moved to its own position.
    fn resolve_shared_formula(&mut self, groups: &mut HashMap<u32, SharedFormula>) {
        let Some(index) = self.shared_index else {
            return;
        };
        if let Some(text) = self.formula.as_deref().filter(|text| !text.is_empty()) {
            groups.insert(index, SharedFormula::new(self.addr, text));
            return;
        }
        match groups.get(&index) {
            Some(master) => self.formula = Some(master.translate_to(self.addr)),
            None => debug!(cell = %self.addr, index, "shared formula follower without a master"),
        }
    }

    /// Turn the collected parts into a typed cell
    fn into_cell_data(self, shared_strings: &[String]) -> XlsxResult<(CellAddress, CellData)> {
        let cell_type = self.cell_type.as_deref();

        let literal = match (cell_type, self.value.as_deref(), self.inline) {
            (Some("inlineStr"), _, Some(text)) => {
                Some(CellValue::string(decode_excel_escapes(&text)))
            }
            (_, Some(v), _) => Some(Self::typed_value(cell_type, v, shared_strings)?),
            _ => None,
        };

        let value = match self.formula {
            Some(text) if !text.is_empty() => CellValue::Formula {
                text: if text.starts_with('=') {
                    text
                } else {
                    format!("={}", text)
                },
                cached_value: literal.map(Box::new),
            },
            // A follower whose master never appeared keeps its last result
            _ => literal.unwrap_or(CellValue::Empty),
        };

        Ok((self.addr, CellData::with_style(value, self.style)))
    }

    fn typed_value(cell_type: Option<&str>, value: &str, shared_strings: &[String]) -> XlsxResult<CellValue> {
        Ok(match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = value.parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s.as_str())
            }

            // Boolean
            Some("b") => CellValue::Boolean(attr_is_true(value)),

            // Error
            Some("e") => CellError::parse(value)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // Formula string result or explicit string
            Some("str") | Some("inlineStr") => CellValue::string(decode_excel_escapes(value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            // Unknown type - treat as string
            Some(_) => CellValue::string(value),
        })
    }
}
