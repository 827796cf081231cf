//! Frame reshaping: pivots, totals, joins and geography ordering

use std::cmp::Ordering;
use std::collections::HashMap;

use tagsheet_core::CellValue;
use tagsheet_csv::Frame;
use tracing::warn;

use crate::error::ReportResult;

/// How pivot cells combine the values that fall into them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregate {
    /// Arithmetic mean of the numeric values
    #[default]
    Mean,
    /// Sum of the numeric values
    Sum,
}

/// Order cell values: numbers first (numerically), then text, then the rest.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    fn class(v: &CellValue) -> u8 {
        match v {
            CellValue::Number(_) => 0,
            CellValue::String(_) => 1,
            CellValue::Empty => 3,
            _ => 2,
        }
    }

    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::String(x), CellValue::String(y)) => x.as_str().cmp(y.as_str()),
        _ => class(a)
            .cmp(&class(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

/// Distinct non-empty values, sorted with [`compare_cells`]
fn distinct_sorted<'a, I>(values: I) -> Vec<CellValue>
where
    I: Iterator<Item = &'a CellValue>,
{
    let mut distinct: Vec<CellValue> = values.filter(|v| !v.is_empty()).cloned().collect();
    distinct.sort_by(compare_cells);
    distinct.dedup();
    distinct
}

/// Spread `values` into one column per distinct `columns` value.
///
/// The result has the `index` column first (one row per distinct index value,
/// ascending) then one column per category (ascending). Rows with an empty
/// index or category are ignored, as are non-numeric values. Combinations
/// with no numeric value are 0.
pub fn pivot(
    frame: &Frame,
    index: &str,
    columns: &str,
    values: &str,
    aggregate: Aggregate,
) -> ReportResult<Frame> {
    let index_col = frame.require_column(index)?;
    let category_col = frame.require_column(columns)?;
    let value_col = frame.require_column(values)?;

    let keys = distinct_sorted(frame.rows().iter().map(|row| &row[index_col]));
    let categories = distinct_sorted(frame.rows().iter().map(|row| &row[category_col]));

    let mut cells: HashMap<(usize, usize), (f64, u32)> = HashMap::new();
    for row in frame.rows() {
        let Ok(key) = keys.binary_search_by(|k| compare_cells(k, &row[index_col])) else {
            continue;
        };
        let Ok(category) = categories.binary_search_by(|c| compare_cells(c, &row[category_col]))
        else {
            continue;
        };
        let Some(value) = row[value_col].as_number() else {
            continue;
        };
        let cell = cells.entry((key, category)).or_insert((0.0, 0));
        cell.0 += value;
        cell.1 += 1;
    }

    let mut names = vec![index.to_string()];
    names.extend(categories.iter().map(|c| c.to_string()));

    let rows = keys
        .into_iter()
        .enumerate()
        .map(|(k, key)| {
            let mut row = Vec::with_capacity(names.len());
            row.push(key);
            row.extend((0..categories.len()).map(|c| {
                let value = match cells.get(&(k, c)) {
                    Some(&(sum, count)) => match aggregate {
                        Aggregate::Mean => sum / f64::from(count),
                        Aggregate::Sum => sum,
                    },
                    None => 0.0,
                };
                CellValue::Number(value)
            }));
            row
        })
        .collect();

    Ok(Frame::new(names, rows)?)
}

/// Append a column `name` holding, per row, the sum of every numeric value
/// outside the `exclude` columns.
pub fn with_row_total(frame: &mut Frame, name: &str, exclude: &[&str]) -> ReportResult<()> {
    let skipped = exclude
        .iter()
        .map(|column| frame.require_column(column))
        .collect::<Result<Vec<_>, _>>()?;

    let totals = frame
        .rows()
        .iter()
        .map(|row| {
            let total: f64 = row
                .iter()
                .enumerate()
                .filter(|(i, _)| !skipped.contains(i))
                .filter_map(|(_, v)| match v {
                    CellValue::Number(n) => Some(*n),
                    _ => None,
                })
                .sum();
            CellValue::Number(total)
        })
        .collect();

    frame.push_column(name, totals)?;
    Ok(())
}

/// Join rows of `left` and `right` that share a `key` value.
///
/// Left row order is kept; each left row repeats once per matching right row,
/// in right order. The right key column is dropped, as is any right column
/// whose name the left frame already has.
pub fn inner_join(left: &Frame, right: &Frame, key: &str) -> ReportResult<Frame> {
    let left_key = left.require_column(key)?;
    let right_key = right.require_column(key)?;

    let kept: Vec<usize> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != right_key && left.column_index(name).is_none())
        .map(|(i, _)| i)
        .collect();

    let mut columns = left.columns().to_vec();
    columns.extend(kept.iter().map(|&i| right.columns()[i].clone()));

    let mut matches: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        if !row[right_key].is_empty() {
            matches.entry(row[right_key].to_string()).or_default().push(i);
        }
    }

    let mut joined = Frame::with_columns(&columns);
    for row in left.rows() {
        if row[left_key].is_empty() {
            continue;
        }
        let Some(right_rows) = matches.get(&row[left_key].to_string()) else {
            continue;
        };
        for &r in right_rows {
            let mut out = row.clone();
            out.extend(kept.iter().map(|&i| right.rows()[r][i].clone()));
            joined.push_row(out)?;
        }
    }

    Ok(joined)
}

/// Drop exact duplicate rows, keeping the first
pub fn dedup(frame: &mut Frame) {
    frame.dedup();
}

/// Sort rank of a geography level: National, Region, STP, CCG, then others
pub fn geography_rank(geog_type: &CellValue) -> u8 {
    match geog_type.as_string() {
        Some("National") => 0,
        Some("Region") => 1,
        Some("STP") => 2,
        Some("CCG") => 3,
        _ => 4,
    }
}

/// Stable sort by geography level, then by `geog_code`
pub fn sort_by_geography(frame: &mut Frame) -> ReportResult<()> {
    let type_col = frame.require_column("geog_type")?;
    let code_col = frame.require_column("geog_code")?;

    let unranked = frame
        .rows()
        .iter()
        .filter(|row| geography_rank(&row[type_col]) == 4)
        .count();
    if unranked > 0 {
        warn!(rows = unranked, "geography rows with an unknown geog_type sort last");
    }

    frame.sort_by(|a, b| {
        geography_rank(&a[type_col])
            .cmp(&geography_rank(&b[type_col]))
            .then_with(|| compare_cells(&a[code_col], &b[code_col]))
    });
    Ok(())
}
