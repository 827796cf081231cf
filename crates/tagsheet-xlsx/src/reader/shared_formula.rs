//! Shared-formula expansion
//!
//! A shared formula is stored once, on the master cell of its group. The
//! other cells carry only `<f t="shared" si=".."/>`. Each follower gets the
//! master's text with its relative references moved by the follower's offset
//! from the master, so the cell model only ever holds plain formulas.

use tagsheet_core::{CellAddress, MAX_COLS, MAX_ROWS};

/// The master formula of one shared group
#[derive(Debug, Clone)]
pub(crate) struct SharedFormula {
    origin: CellAddress,
    text: String,
}

impl SharedFormula {
    pub(crate) fn new<S: Into<String>>(origin: CellAddress, text: S) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }

    /// The master's formula as it reads at `target`
    pub(crate) fn translate_to(&self, target: CellAddress) -> String {
        let row_delta = i64::from(target.row) - i64::from(self.origin.row);
        let col_delta = i64::from(target.col) - i64::from(self.origin.col);
        shift_references(&self.text, row_delta, col_delta)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$'
}

/// Index one past the quoted run opening at `start`; doubled quotes escape
fn quoted_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

/// Move every relative A1 reference in `formula` by the given offsets.
///
/// Absolute parts (`$A`, `$1`) stay put. String literals, quoted sheet
/// names, structured references and function names are copied as they are.
/// A reference pushed off the sheet becomes `#REF!`.
pub(crate) fn shift_references(formula: &str, row_delta: i64, col_delta: i64) -> String {
    let chars: Vec<char> = formula.chars().collect();
    let mut out = String::with_capacity(formula.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            let end = quoted_end(&chars, i);
            out.extend(&chars[i..end]);
            i = end;
        } else if c == '[' {
            let end = chars[i..]
                .iter()
                .position(|&ch| ch == ']')
                .map_or(chars.len(), |p| i + p + 1);
            out.extend(&chars[i..end]);
            i = end;
        } else if is_name_char(c) {
            let end = chars[i..]
                .iter()
                .position(|&ch| !is_name_char(ch))
                .map_or(chars.len(), |p| i + p);
            let token: String = chars[i..end].iter().collect();
            let next = chars.get(end).copied();
            let in_range = next == Some(':') || (i > 0 && chars[i - 1] == ':');

            let shifted = match next {
                Some('(') | Some('!') | Some('[') => None,
                _ => shift_cell(&token, row_delta, col_delta).or_else(|| {
                    in_range
                        .then(|| {
                            shift_column(&token, col_delta).or_else(|| shift_row(&token, row_delta))
                        })
                        .flatten()
                }),
            };
            out.push_str(shifted.as_deref().unwrap_or(&token));
            i = end;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

fn strip_dollar(s: &str) -> (bool, &str) {
    match s.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

fn dollar(absolute: bool) -> &'static str {
    if absolute {
        "$"
    } else {
        ""
    }
}

fn moved_row(row: u32, absolute: bool, delta: i64) -> Option<u32> {
    if absolute {
        return Some(row);
    }
    u32::try_from(i64::from(row) + delta)
        .ok()
        .filter(|r| (1..=MAX_ROWS).contains(r))
}

fn moved_col(col: u16, absolute: bool, delta: i64) -> Option<u16> {
    if absolute {
        return Some(col);
    }
    u16::try_from(i64::from(col) + delta)
        .ok()
        .filter(|c| (1..=MAX_COLS).contains(c))
}

fn parse_column(letters: &str) -> Option<u16> {
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    CellAddress::letters_to_column(letters).ok()
}

fn parse_row(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|r| (1..=MAX_ROWS).contains(r))
}

/// `A1`, `$A1`, `A$1` or `$A$1`
fn shift_cell(token: &str, row_delta: i64, col_delta: i64) -> Option<String> {
    let (col_abs, rest) = strip_dollar(token);
    let split = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (letters, rest) = rest.split_at(split);
    let (row_abs, digits) = strip_dollar(rest);

    let col = parse_column(letters)?;
    let row = parse_row(digits)?;

    Some(
        match (moved_col(col, col_abs, col_delta), moved_row(row, row_abs, row_delta)) {
            (Some(col), Some(row)) => format!(
                "{}{}{}{}",
                dollar(col_abs),
                CellAddress::column_to_letters(col),
                dollar(row_abs),
                row
            ),
            _ => "#REF!".to_string(),
        },
    )
}

/// One side of a whole-column range such as `A:C`
fn shift_column(token: &str, delta: i64) -> Option<String> {
    let (absolute, letters) = strip_dollar(token);
    let col = parse_column(letters)?;
    Some(match moved_col(col, absolute, delta) {
        Some(col) => format!("{}{}", dollar(absolute), CellAddress::column_to_letters(col)),
        None => "#REF!".to_string(),
    })
}

/// One side of a whole-row range such as `2:5`
fn shift_row(token: &str, delta: i64) -> Option<String> {
    let (absolute, digits) = strip_dollar(token);
    let row = parse_row(digits)?;
    Some(match moved_row(row, absolute, delta) {
        Some(row) => format!("{}{}", dollar(absolute), row),
        None => "#REF!".to_string(),
    })
}
