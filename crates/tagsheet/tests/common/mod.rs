//! Builds a small template workbook on disk

use std::fs::File;
use std::io::Write;
use std::path::Path;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Table 1" sheetId="1" r:id="rId1"/><sheet name="Table 2a" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4"><si><t>&lt;month&gt;</t></si><si><t>&lt;Coverage,Open active practices,count&gt;</t></si><si><t>&lt;start&gt;</t></si><si><t>&lt;end&gt;</t></si></sst>"#;

/// Summary sheet: two month columns (C, D) with one tagged value each
const SUMMARY_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:D5"/><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Summary</t></is></c></row><row r="4"><c r="C4" t="s"><v>0</v></c><c r="D4" t="s"><v>0</v></c></row><row r="5"><c r="B5" t="inlineStr"><is><t>Open practices</t></is></c><c r="C5" t="s"><v>1</v></c><c r="D5" t="s"><v>1</v></c></row></sheetData></worksheet>"#;

/// Table sheet: `<start>` at B3, `<end>` at B7, footer rows below
const TABLE_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:C9"/><cols><col min="2" max="3" width="14" customWidth="1"/></cols><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Appointments by status</t></is></c></row><row r="3"><c r="B3" s="1" t="s"><v>2</v></c><c r="C3" s="1"/></row><row r="4"><c r="B4" s="1"/><c r="C4" s="1"/></row><row r="5"><c r="B5" s="1"/><c r="C5" s="1"/></row><row r="6"><c r="B6" s="1"/><c r="C6" s="1"/></row><row r="7"><c r="B7" s="1" t="s"><v>3</v></c><c r="C7" s="1"/></row><row r="8" ht="25" customHeight="1"><c r="A8" t="inlineStr"><is><t>Source: NHS Digital</t></is></c></row><row r="9"><c r="A9" t="inlineStr"><is><t>Notes</t></is></c></row></sheetData><mergeCells count="1"><mergeCell ref="A9:C9"/></mergeCells><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

/// Write the template to `path`
pub fn write_template(path: &Path) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/worksheets/sheet1.xml", SUMMARY_SHEET),
        ("xl/worksheets/sheet2.xml", TABLE_SHEET),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}
