//! Geometry types for sheet coordinates and rectangular ranges.
//!
//! All coordinates are 1-based and inclusive, matching the host spreadsheet's
//! row/column numbering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Rectangular cell range with 1-based inclusive bounds.
///
/// Serialized as its A1 notation (e.g. `"C3:I46"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rectangle {
    /// First row (inclusive)
    pub row_start: u32,
    /// Last row (inclusive)
    pub row_end: u32,
    /// First column (inclusive)
    pub col_start: u32,
    /// Last column (inclusive)
    pub col_end: u32,
}

impl Rectangle {
    /// Create a rectangle from its four bounds.
    ///
    /// Fails when a bound is 0 or a start lies past its end.
    pub fn new(row_start: u32, row_end: u32, col_start: u32, col_end: u32) -> Result<Self> {
        if row_start == 0 || col_start == 0 || row_start > row_end || col_start > col_end {
            return Err(Error::InvalidRange(format!(
                "rows {row_start}..={row_end}, cols {col_start}..={col_end}"
            )));
        }
        Ok(Self {
            row_start,
            row_end,
            col_start,
            col_end,
        })
    }

    /// Single-cell rectangle.
    pub fn cell(row: u32, col: u32) -> Result<Self> {
        Self::new(row, row, col, col)
    }

    /// Rectangle from a top-left corner plus height and width.
    pub fn from_origin(row: u32, col: u32, height: u32, width: u32) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidRange(format!(
                "{height}x{width} range at row {row}, col {col}"
            )));
        }
        Self::new(row, row + height - 1, col, col + width - 1)
    }

    /// Number of rows spanned.
    pub fn height(&self) -> u32 {
        self.row_end - self.row_start + 1
    }

    /// Number of columns spanned.
    pub fn width(&self) -> u32 {
        self.col_end - self.col_start + 1
    }

    /// Cell count (height * width).
    pub fn area(&self) -> u64 {
        self.height() as u64 * self.width() as u64
    }

    /// Check if a cell lies inside the rectangle.
    pub fn contains_cell(&self, row: u32, col: u32) -> bool {
        row >= self.row_start && row <= self.row_end && col >= self.col_start && col <= self.col_end
    }

    /// Check if `other` is fully nested (rows and columns) inside this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.row_start >= self.row_start
            && other.row_end <= self.row_end
            && other.col_start >= self.col_start
            && other.col_end <= self.col_end
    }

    /// Check if the rectangle lies within `[1, max_rows] x [1, max_cols]`.
    pub fn fits_within(&self, max_rows: u32, max_cols: u32) -> bool {
        self.row_end <= max_rows && self.col_end <= max_cols
    }

    /// One-row rectangle at `row` spanning this rectangle's columns.
    pub fn row_band(&self, row: u32) -> Result<Rectangle> {
        Rectangle::new(row, row, self.col_start, self.col_end)
    }

    /// A1 notation, e.g. `C3:I46`, or `C3` for a single cell.
    pub fn to_a1(&self) -> String {
        let start = format!("{}{}", column_to_letters(self.col_start), self.row_start);
        if self.row_start == self.row_end && self.col_start == self.col_end {
            start
        } else {
            format!(
                "{start}:{}{}",
                column_to_letters(self.col_end),
                self.row_end
            )
        }
    }

    /// Parse A1 notation (`B5` or `B5:D20`, case-insensitive).
    ///
    /// Corners given in reverse order are normalized.
    pub fn parse_a1(notation: &str) -> Result<Self> {
        let notation = notation.trim();
        let (first, second) = match notation.split_once(':') {
            Some((a, b)) => (a, b),
            None => (notation, notation),
        };
        let (r1, c1) = parse_cell(first).ok_or_else(|| Error::InvalidA1(notation.to_string()))?;
        let (r2, c2) = parse_cell(second).ok_or_else(|| Error::InvalidA1(notation.to_string()))?;
        Self::new(r1.min(r2), r1.max(r2), c1.min(c2), c1.max(c2))
    }

    /// Parse A1 notation that may leave rows or columns open (`B5:D`, `5:20`, `B:D`).
    ///
    /// Open ends extend to `max_rows` and `max_cols`; an open start begins at
    /// row or column 1.
    pub fn parse_open_a1(notation: &str, max_rows: u32, max_cols: u32) -> Result<Self> {
        let notation = notation.trim();
        let invalid = || Error::InvalidA1(notation.to_string());
        let (first, second) = notation.split_once(':').unwrap_or((notation, notation));
        let (r1, c1) = parse_partial_cell(first).ok_or_else(invalid)?;
        let (r2, c2) = parse_partial_cell(second).ok_or_else(invalid)?;
        let (r1, r2) = (r1.unwrap_or(1), r2.unwrap_or(max_rows));
        let (c1, c2) = (c1.unwrap_or(1), c2.unwrap_or(max_cols));
        Self::new(r1.min(r2), r1.max(r2), c1.min(c2), c1.max(c2))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

impl FromStr for Rectangle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_a1(s)
    }
}

impl TryFrom<String> for Rectangle {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_a1(&value)
    }
}

impl From<Rectangle> for String {
    fn from(rect: Rectangle) -> Self {
        rect.to_a1()
    }
}

/// Convert a 1-based column number to letters (1 -> `A`, 27 -> `AA`).
pub fn column_to_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert column letters to a 1-based column number (`A` -> 1, `aa` -> 27).
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Parse a single `B5`-style cell into (row, col).
fn parse_cell(cell: &str) -> Option<(u32, u32)> {
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    let col = letters_to_column(letters)?;
    let row: u32 = digits.parse().ok()?;
    (row > 0).then_some((row, col))
}

/// Parse a cell whose row or column may be missing (`B`, `5`, `B5`).
fn parse_partial_cell(cell: &str) -> Option<(Option<u32>, Option<u32>)> {
    let split = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);
    let col = match letters {
        "" => None,
        letters => Some(letters_to_column(letters)?),
    };
    let row = match digits {
        "" => None,
        digits => Some(digits.parse::<u32>().ok().filter(|row| *row > 0)?),
    };
    (row.is_some() || col.is_some()).then_some((row, col))
}
