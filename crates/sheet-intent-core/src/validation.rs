//! Syntax checks on user-entered ranges, header rows, columns and slice values.
//!
//! These mirror the sidebar form's field checks; each returns a plain verdict
//! so the caller can mark the offending field.

use lazy_static::lazy_static;
use regex::Regex;

use crate::query::{SliceOp, SliceScalar};
use crate::DateColumnProfile;

lazy_static! {
    static ref CELL: Regex = Regex::new(r"^[A-Za-z]+[0-9]+$").unwrap();
    static ref COLUMN_OR_CELL: Regex = Regex::new(r"^[A-Za-z]+[0-9]*$").unwrap();
    static ref COLUMN: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
    static ref ROW: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

fn split_range(a1: &str) -> (&str, Option<&str>) {
    match a1.split_once(':') {
        Some((start, end)) => (start, Some(end)),
        None => (a1, None),
    }
}

/// Check that a user-entered range is well formed.
///
/// Accepted shapes: a cell (`B5`), optionally followed by a cell, column or
/// row end (`B5:D20`, `B5:D`, `B5:20`); a column start with a cell or column
/// end (`B:D20`, `B:D`); a row start with a cell or row end (`5:D20`, `5:20`).
pub fn check_range_validity(a1: &str) -> bool {
    let (start, end) = split_range(a1);
    if CELL.is_match(start) {
        match end {
            None => true,
            Some(end) => COLUMN_OR_CELL.is_match(end) || ROW.is_match(end),
        }
    } else if COLUMN.is_match(start) {
        end.map_or(false, |end| COLUMN_OR_CELL.is_match(end))
    } else if ROW.is_match(start) {
        end.map_or(false, |end| CELL.is_match(end) || ROW.is_match(end))
    } else {
        false
    }
}

/// Check that a header row entry is a positive row number.
pub fn check_header_validity(text: &str) -> bool {
    text.trim().parse::<i64>().map_or(false, |row| row > 0)
}

fn leading_letters(cell: &str) -> &str {
    let end = cell
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(cell.len());
    &cell[..end]
}

/// Header range for a header row over a data range's columns.
///
/// `("3", "C5:F20")` gives `"C3:F3"`. Returns an empty string when either
/// input is invalid. A range with no columns (`"5:20"`) starts at column A,
/// and a missing end column collapses the header to a single cell.
pub fn set_header_range(header_row: &str, data_range: &str) -> String {
    if !check_range_validity(data_range) || !check_header_validity(header_row) {
        return String::new();
    }
    let row = header_row.trim();
    let (start, end) = split_range(data_range);

    let mut start_col = leading_letters(start);
    let mut end_col = end.map(leading_letters).unwrap_or("");
    if start_col.is_empty() && end_col.is_empty() {
        start_col = "A";
    }
    if end_col.is_empty() {
        end_col = start_col;
    }

    if end_col == start_col {
        format!("{start_col}{row}")
    } else {
        format!("{start_col}{row}:{end_col}{row}")
    }
}

/// Check that a column name is one of the table headers (empty means unset).
pub fn is_valid_column_name<S: AsRef<str>>(headers: &[S], name: &str) -> bool {
    name.is_empty() || headers.iter().any(|h| h.as_ref() == name)
}

/// Check that a column was classified as a date column (empty means unset).
pub fn is_valid_date_column(profile: &DateColumnProfile, name: &str) -> bool {
    name.is_empty() || profile.contains(name)
}

/// Check that the entered slice values suit the operator.
///
/// A single blank value is always accepted. Only `In` and `Not in` take more
/// than one value, and ordering operators need a numeric value.
pub fn slice_val_compatible(values: &[SliceScalar], op: SliceOp) -> bool {
    if values.len() == 1 && values[0].is_blank() {
        return true;
    }
    if op.takes_list() {
        return true;
    }
    if values.len() > 1 {
        return false;
    }
    match values.first() {
        Some(value) if op.is_ordering() => value.is_numeric(),
        _ => true,
    }
}
