//! Request and response types exchanged with the sidebar.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sheet_intent_core::TableSelection;

/// Parameters for confirming a table selection, as typed into the form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSelectionParams {
    /// Table range in A1 notation; rows or columns may be left open (`B5:D`)
    pub range_a1_notation: String,

    /// Header row number
    pub header_row: String,

    /// Header range in A1 notation.
    /// If not specified, the header row across the range's columns is used
    #[serde(default)]
    pub header_range: Option<String>,
}

impl ConfirmSelectionParams {
    /// Parameters without an explicit header range.
    pub fn new(range: impl Into<String>, header_row: impl Into<String>) -> Self {
        Self {
            range_a1_notation: range.into(),
            header_row: header_row.into(),
            header_range: None,
        }
    }
}

/// Response for launch and reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    /// Session identifier
    pub session_id: String,

    /// Preselected table; absent when the detected range is a single row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<TableSelection>,
}
