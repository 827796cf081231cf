//! Source extract files and a per-build cache of loaded frames

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tagsheet_csv::{CsvReader, Frame};
use tracing::info;

use crate::error::{ReportError, ReportResult};

/// Extract behind the `Easy A` sheet
pub const EASY_A_FILE: &str = "data_for_sheet_easy_a.csv";
/// Extract behind the `Easy B` sheet
pub const EASY_B_FILE: &str = "data_for_sheet_easy_b.csv";
/// Appointment counts by breakdown, date and geography
pub const APPOINTMENTS_FILE: &str = "appointment_data.csv";
/// Practice counts per geography
pub const PRACTICES_FILE: &str = "practices_data.csv";
/// Monthly summary figures keyed by `breakdown_1..3`
pub const TABLE1_FILE: &str = "table1_data.csv";

/// Extracts read from one data directory, each loaded at most once
#[derive(Debug)]
pub struct SourceData {
    dir: PathBuf,
    frames: HashMap<&'static str, Frame>,
}

impl SourceData {
    /// Read extracts from `dir`
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            frames: HashMap::new(),
        }
    }

    /// Use an already loaded frame for `file`
    pub fn insert(&mut self, file: &'static str, frame: Frame) {
        self.frames.insert(file, frame);
    }

    /// Load `file` unless it is already loaded
    pub fn ensure(&mut self, file: &'static str) -> ReportResult<()> {
        if let Entry::Vacant(slot) = self.frames.entry(file) {
            let path = self.dir.join(file);
            let frame = CsvReader::read_file(&path)?;
            info!(
                path = %path.display(),
                rows = frame.height(),
                "loaded extract"
            );
            slot.insert(frame);
        }
        Ok(())
    }

    /// Load every file in `files`
    pub fn ensure_all(&mut self, files: &[&'static str]) -> ReportResult<()> {
        files.iter().try_for_each(|file| self.ensure(file))
    }

    /// A loaded frame
    pub fn frame(&self, file: &str) -> ReportResult<&Frame> {
        self.frames
            .get(file)
            .ok_or_else(|| ReportError::Config(format!("extract {} was not loaded", file)))
    }
}
