use std::fs;

use pretty_assertions::assert_eq;
use tagsheet_core::CellValue;
use tagsheet_csv::{CsvError, CsvReader};

#[test]
fn reads_extract_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practices_data.csv");
    fs::write(
        &path,
        "geog_type,geog_code,count_of_open_practice\nNational,ENG,6500\nRegion,Y56,900\n",
    )
    .unwrap();

    let frame = CsvReader::read_file(&path).unwrap();
    let regions = frame.filter_eq("geog_type", "Region").unwrap();

    assert_eq!(regions.height(), 1);
    assert_eq!(
        regions.value(0, "count_of_open_practice").unwrap(),
        &CellValue::Number(900.0)
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvReader::read_file(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, CsvError::Io(_)));
}
