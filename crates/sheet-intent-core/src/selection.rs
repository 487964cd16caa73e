//! Table selection state and selection validation outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rectangle;

/// The user's active table, persisted in the document property store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSelection {
    /// Name of the sheet holding the table
    pub input_sheet: String,
    /// Range the user works on (table body, possibly a sub-range)
    #[serde(rename = "rangeA1Notation")]
    pub range: Rectangle,
    /// Row holding the column names
    pub header_row: u32,
    /// Header row across the selected range's columns
    pub header_range: Rectangle,
    /// Full detected table containing `range`
    pub entire_table_range: Rectangle,
}

impl TableSelection {
    /// First row holding data (never the header row itself).
    pub fn data_start_row(&self) -> u32 {
        self.range.row_start.max(self.header_row + 1)
    }

    /// Data rows of the selection, spanning the entire table's columns.
    ///
    /// None when the selection holds no row below the header.
    pub fn data_band(&self) -> Option<Rectangle> {
        Rectangle::new(
            self.data_start_row(),
            self.range.row_end,
            self.entire_table_range.col_start,
            self.entire_table_range.col_end,
        )
        .ok()
    }

    /// Header row spanning the entire table's columns.
    pub fn header_band(&self) -> Rectangle {
        Rectangle {
            row_start: self.header_row,
            row_end: self.header_row,
            col_start: self.entire_table_range.col_start,
            col_end: self.entire_table_range.col_end,
        }
    }

    /// Key identifying the table contents this selection covers.
    ///
    /// Two selections with the same fingerprint read the same cells.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}!{}@{}/{}",
            self.input_sheet, self.range, self.header_row, self.entire_table_range
        )
    }
}

/// A range choice offered to the user before confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRange {
    /// Proposed table range
    #[serde(rename = "rangeA1Notation")]
    pub range: Rectangle,
    /// Proposed header row
    pub header_row: u32,
    /// Header row across the proposed range's columns
    pub header_range: Rectangle,
}

/// Field-scoped validation failure when confirming a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Header row lies inside the range, or is not the table's first/second row
    #[error("Header row must be the table's first or second row, at or above the range")]
    HeaderRow,

    /// Confirmed range holds fewer than two rows
    #[error("Range must span at least two rows")]
    RangeTooSmall,

    /// Range entry is not A1 notation
    #[error("Range is not valid A1 notation")]
    MalformedRange,

    /// Header row entry is not a positive row number
    #[error("Header row must be a positive row number")]
    MalformedHeaderRow,
}

impl SelectionError {
    /// Name of the offending UI field.
    pub fn error_in(&self) -> &'static str {
        match self {
            SelectionError::HeaderRow | SelectionError::MalformedHeaderRow => "headerRow",
            SelectionError::RangeTooSmall | SelectionError::MalformedRange => "range",
        }
    }
}

/// UI-facing outcome of a selection confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    /// Whether the selection was accepted
    pub success: bool,
    /// Offending field on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_in: Option<String>,
    /// Accepted selection on success
    #[serde(flatten)]
    pub selection: Option<TableSelection>,
}

impl From<Result<TableSelection, SelectionError>> for ConfirmResponse {
    fn from(result: Result<TableSelection, SelectionError>) -> Self {
        match result {
            Ok(selection) => Self {
                success: true,
                error_in: None,
                selection: Some(selection),
            },
            Err(err) => Self {
                success: false,
                error_in: Some(err.error_in().to_string()),
                selection: None,
            },
        }
    }
}

impl ConfirmResponse {
    /// Response for a confirmation outcome.
    ///
    /// Field-scoped rejections become a failure response; any other error is
    /// passed through.
    pub fn from_outcome(outcome: crate::Result<TableSelection>) -> crate::Result<Self> {
        match outcome {
            Ok(selection) => Ok(Self::from(Ok::<_, SelectionError>(selection))),
            Err(crate::Error::Selection(err)) => Ok(Self::from(Err::<TableSelection, _>(err))),
            Err(other) => Err(other),
        }
    }
}
