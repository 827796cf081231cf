//! What a template cell can hold

use std::fmt;
use std::sync::Arc;

/// A cell's content.
///
/// Tags are ordinary strings; formulas are kept only so a template's own
/// formulas survive a fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    /// Every number, dates included, is an `f64`
    Number(f64),
    String(SharedString),
    Error(CellError),
    /// A template formula and its last saved result
    Formula {
        /// Text with the leading `=`
        text: String,
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Text value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(SharedString::new(s.into()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric reading of the cell: numbers, booleans as 0/1, and a
    /// formula's cached number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(b) => Some(f64::from(u8::from(*b))),
            CellValue::Formula {
                cached_value: Some(cached),
                ..
            } => cached.as_number(),
            _ => None,
        }
    }

    /// The literal text of a string cell.
    ///
    /// Formulas are never looked through, so a formula whose cached result
    /// spells a tag is not itself a tag.
    pub fn as_string(&self) -> Option<&str> {
        if let CellValue::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Formula text, `=` included
    pub fn formula_text(&self) -> Option<&str> {
        if let CellValue::Formula { text, .. } = self {
            Some(text)
        } else {
            None
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => f.write_str(s.as_str()),
            CellValue::Error(e) => f.write_str(e.as_str()),
            CellValue::Formula {
                cached_value: Some(cached),
                ..
            } => fmt::Display::fmt(cached, f),
            CellValue::Formula { text, .. } => f.write_str(text),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::string(s)
    }
}

/// The error literals a worksheet can store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    Na,
}

const ERROR_LITERALS: [(CellError, &str); 7] = [
    (CellError::Null, "#NULL!"),
    (CellError::Div0, "#DIV/0!"),
    (CellError::Value, "#VALUE!"),
    (CellError::Ref, "#REF!"),
    (CellError::Name, "#NAME?"),
    (CellError::Num, "#NUM!"),
    (CellError::Na, "#N/A"),
];

impl CellError {
    /// The literal as it appears in a cell, e.g. `#N/A`
    pub fn as_str(&self) -> &'static str {
        ERROR_LITERALS
            .iter()
            .find(|(error, _)| error == self)
            .map_or("#N/A", |(_, literal)| *literal)
    }

    /// Match a literal, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        ERROR_LITERALS
            .iter()
            .find(|(_, literal)| literal.eq_ignore_ascii_case(s))
            .map(|(error, _)| *error)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference-counted text, so repeated labels (weekdays, geography types)
/// share one allocation when a table is cloned into a sheet.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharedString(Arc<str>);

impl SharedString {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
