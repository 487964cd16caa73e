//! The spreadsheet capabilities the add-on consumes.

use sheet_intent_core::{Grid, Rectangle, Result};

/// Access to the host spreadsheet.
///
/// Sheets are addressed by name; all ranges use 1-based sheet coordinates.
pub trait SpreadsheetHost {
    /// Name of the sheet the user is looking at.
    fn active_sheet(&self) -> &str;

    /// The user's current selection on the active sheet.
    fn active_range(&self) -> Rectangle;

    /// Populated region of a sheet, from `A1` to its last non-blank row and column.
    fn data_range(&self, sheet: &str) -> Result<Rectangle>;

    /// Typed cell values under `range`.
    fn values(&self, sheet: &str, range: &Rectangle) -> Result<Grid>;

    /// Formatted display strings under `range`.
    fn display_values(&self, sheet: &str, range: &Rectangle) -> Result<Grid>;

    /// Make `range` the user's selection, switching to `sheet`.
    fn activate(&mut self, sheet: &str, range: &Rectangle) -> Result<()>;
}
