//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tagsheet_core::CellValue;
use tracing::{debug, warn};

use crate::error::CsvResult;
use crate::frame::Frame;
use crate::options::CsvReadOptions;

/// CSV extract reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file with default options
    pub fn read_file<P: AsRef<Path>>(path: P) -> CsvResult<Frame> {
        Self::read_file_with_options(path, &CsvReadOptions::default())
    }

    /// Read a CSV file
    pub fn read_file_with_options<P: AsRef<Path>>(
        path: P,
        options: &CsvReadOptions,
    ) -> CsvResult<Frame> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let frame = Self::read_with_options(file, options)?;
        debug!(
            path = %path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "read extract"
        );
        Ok(frame)
    }

    /// Read CSV from a reader with default options
    pub fn read<R: Read>(reader: R) -> CsvResult<Frame> {
        Self::read_with_options(reader, &CsvReadOptions::default())
    }

    /// Read CSV from a reader. The first record names the columns.
    ///
    /// With type detection on, each column is typed as a whole: it becomes
    /// numeric only when every non-empty field parses as a finite number,
    /// otherwise all of its fields stay text. Empty fields are `Empty`.
    pub fn read_with_options<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Frame> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // Records of the wrong length are rejected by the csv reader itself
        let records = csv_reader
            .records()
            .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

        let numeric: Vec<bool> = (0..columns.len())
            .map(|index| {
                options.auto_detect_types && Self::is_numeric_column(&columns[index], &records, index)
            })
            .collect();

        let mut frame = Frame::with_columns(&columns);
        for record in &records {
            let row = record
                .iter()
                .zip(&numeric)
                .map(|(field, &numeric)| Self::typed_field(field, numeric))
                .collect();
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Every non-empty field of the column is a finite number
    fn is_numeric_column(name: &str, records: &[csv::StringRecord], index: usize) -> bool {
        let mut numbers = 0usize;
        let mut texts = 0usize;
        for field in records.iter().filter_map(|record| record.get(index)) {
            if field.is_empty() {
                continue;
            }
            match Self::parse_number(field) {
                Some(_) => numbers += 1,
                None => texts += 1,
            }
        }

        // A column of numbers with stray text usually means a bad extract
        if numbers > 0 && texts > 0 {
            warn!(column = name, numbers, texts, "column mixes numbers and text; read as text");
        }
        texts == 0 && numbers > 0
    }

    fn parse_number(field: &str) -> Option<f64> {
        field.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }

    fn typed_field(field: &str, numeric: bool) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }
        match Self::parse_number(field).filter(|_| numeric) {
            Some(n) => CellValue::Number(n),
            None => CellValue::string(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use pretty_assertions::assert_eq;

    const EXTRACT: &str = "\
appt_date,breakdown,appt_status,appt_count
2022-04-01,by_status_by_date,Attended,100
2022-04-01,by_status_by_date,DNA,
2022-04-02,by_status_by_date,\"Unknown, late\",7.5
";

    #[test]
    fn test_read_types_fields() {
        let frame = CsvReader::read(EXTRACT.as_bytes()).unwrap();

        assert_eq!(
            frame.columns(),
            &["appt_date", "breakdown", "appt_status", "appt_count"]
        );
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.value(0, "appt_count").unwrap(), &CellValue::Number(100.0));
        assert_eq!(frame.value(1, "appt_count").unwrap(), &CellValue::Empty);
        assert_eq!(frame.value(2, "appt_count").unwrap(), &CellValue::Number(7.5));
        assert_eq!(
            frame.value(2, "appt_status").unwrap(),
            &CellValue::from("Unknown, late")
        );
        assert_eq!(frame.value(0, "appt_date").unwrap(), &CellValue::from("2022-04-01"));
    }

    #[test]
    fn test_read_without_type_detection() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            ..CsvReadOptions::default()
        };
        let frame = CsvReader::read_with_options(EXTRACT.as_bytes(), &options).unwrap();

        assert_eq!(frame.value(0, "appt_count").unwrap(), &CellValue::from("100"));
        assert_eq!(frame.value(1, "appt_count").unwrap(), &CellValue::Empty);
    }

    #[test]
    fn test_text_that_looks_special_stays_text() {
        let frame = CsvReader::read("code,label\nNaN,inf\nE54000008,x\n".as_bytes()).unwrap();

        assert_eq!(frame.value(0, "code").unwrap(), &CellValue::from("NaN"));
        assert_eq!(frame.value(0, "label").unwrap(), &CellValue::from("inf"));
        assert_eq!(frame.value(1, "code").unwrap(), &CellValue::from("E54000008"));
    }

    #[test]
    fn test_ragged_record() {
        let err = CsvReader::read("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        match err {
            CsvError::Csv(inner) => {
                assert!(matches!(inner.kind(), csv::ErrorKind::UnequalLengths { .. }))
            }
            other => panic!("expected a csv error, got {:?}", other),
        }
    }

    #[test]
    fn test_codes_keep_leading_zeros_in_text_columns() {
        let frame = CsvReader::read(
            "geog_code,count\n00L,10\n0123,20\n,\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(frame.value(0, "geog_code").unwrap(), &CellValue::from("00L"));
        assert_eq!(frame.value(1, "geog_code").unwrap(), &CellValue::from("0123"));
        assert_eq!(frame.value(2, "geog_code").unwrap(), &CellValue::Empty);
        assert_eq!(frame.value(1, "count").unwrap(), &CellValue::Number(20.0));
        assert_eq!(frame.value(2, "count").unwrap(), &CellValue::Empty);
    }
}
