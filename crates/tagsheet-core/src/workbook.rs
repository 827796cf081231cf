//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// A workbook opened from a template also carries the raw parts of the file
/// it came from, so that styles, column widths, drawings and everything else
/// the cell model does not describe can be written back untouched.
#[derive(Debug, Default)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
    /// Raw parts of the package the workbook was loaded from
    source: Option<SourcePackage>,
}

impl Workbook {
    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name, failing with [`Error::SheetNotFound`]
    pub fn require_sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheet_by_name_mut(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Raw package the workbook was loaded from
    pub fn source_package(&self) -> Option<&SourcePackage> {
        self.source.as_ref()
    }

    /// Attach the raw package the workbook was loaded from
    pub fn set_source_package(&mut self, package: SourcePackage) {
        self.source = Some(package);
    }

    /// Validate a sheet name
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        // Excel compares sheet names case-insensitively
        let name_lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

/// One file inside a spreadsheet package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePart {
    /// Path inside the archive (e.g. `xl/styles.xml`)
    pub name: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

/// The raw parts of a spreadsheet package, in archive order
#[derive(Debug, Clone, Default)]
pub struct SourcePackage {
    parts: Vec<PackagePart>,
}

impl SourcePackage {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part
    pub fn push(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.push(PackagePart {
            name: name.into(),
            data,
        });
    }

    /// Look up a part by path
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Iterate over parts in archive order
    pub fn parts(&self) -> impl Iterator<Item = &PackagePart> {
        self.parts.iter()
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::empty();
        assert!(wb.is_empty());

        assert_eq!(wb.add_worksheet_with_name("Easy A").unwrap(), 0);
        assert_eq!(wb.add_worksheet_with_name("Easy B").unwrap(), 1);
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.sheet_index("Easy B"), Some(1));
        assert_eq!(wb.worksheet(0).unwrap().name(), "Easy A");
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Table 1").unwrap();

        assert!(wb.add_worksheet_with_name("TABLE 1").is_err());
        assert!(wb.add_worksheet_with_name("table 1").is_err());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::empty();

        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet:1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());

        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet_with_name(&long_name).is_err());
    }

    #[test]
    fn test_require_sheet_mut() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Data").unwrap();

        assert!(wb.require_sheet_mut("Data").is_ok());
        assert!(matches!(
            wb.require_sheet_mut("Missing"),
            Err(Error::SheetNotFound(name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_source_package_lookup() {
        let mut package = SourcePackage::new();
        package.push("xl/styles.xml", b"<styleSheet/>".to_vec());
        package.push("xl/workbook.xml", b"<workbook/>".to_vec());

        let mut wb = Workbook::empty();
        wb.set_source_package(package);

        let source = wb.source_package().unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.get("xl/styles.xml"), Some(&b"<styleSheet/>"[..]));
        assert_eq!(source.get("xl/missing.xml"), None);
    }
}
