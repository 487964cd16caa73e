//! In-memory workbook implementing the spreadsheet host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sheet_intent_core::{Error, Grid, Rectangle, Result};

use crate::SpreadsheetHost;

fn default_active_range() -> Rectangle {
    Rectangle {
        row_start: 1,
        row_end: 1,
        col_start: 1,
        col_end: 1,
    }
}

/// Named sheets held in memory, plus the user's current selection.
///
/// Loads from JSON such as
/// `{"sheets": {"Sheet1": [["Region", "Units"], ["East", 95]]}, "activeSheet": "Sheet1", "activeRange": "A1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryWorkbook {
    sheets: BTreeMap<String, Grid>,
    active_sheet: String,
    #[serde(default = "default_active_range")]
    active_range: Rectangle,
}

impl InMemoryWorkbook {
    /// Workbook with a single sheet, selection at `A1`.
    pub fn new(sheet: impl Into<String>, grid: Grid) -> Self {
        let sheet = sheet.into();
        let mut sheets = BTreeMap::new();
        sheets.insert(sheet.clone(), grid);
        Self {
            sheets,
            active_sheet: sheet,
            active_range: default_active_range(),
        }
    }

    /// Parse a workbook from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let workbook: InMemoryWorkbook = serde_json::from_str(json)?;
        workbook.sheet(&workbook.active_sheet)?;
        Ok(workbook)
    }

    /// Add or replace a sheet.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.sheets.insert(name.into(), grid);
        self
    }

    /// Replace a sheet's cells in place, keeping the selection.
    pub fn put_sheet(&mut self, name: impl Into<String>, grid: Grid) {
        self.sheets.insert(name.into(), grid);
    }

    /// Switch to another sheet and select `A1` on it.
    pub fn set_active_sheet(&mut self, name: &str) -> Result<()> {
        self.sheet(name)?;
        self.active_sheet = name.to_string();
        self.active_range = default_active_range();
        Ok(())
    }

    /// Select a range on the active sheet.
    pub fn select(&mut self, range: Rectangle) {
        self.active_range = range;
    }

    /// Select a range given in A1 notation.
    pub fn select_a1(&mut self, a1: &str) -> Result<()> {
        self.active_range = Rectangle::parse_a1(a1)?;
        Ok(())
    }

    /// Look up a sheet's cells.
    pub fn sheet(&self, name: &str) -> Result<&Grid> {
        self.sheets
            .get(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }
}

impl SpreadsheetHost for InMemoryWorkbook {
    fn active_sheet(&self) -> &str {
        &self.active_sheet
    }

    fn active_range(&self) -> Rectangle {
        self.active_range
    }

    fn data_range(&self, sheet: &str) -> Result<Rectangle> {
        let grid = self.sheet(sheet)?;
        let mut last_row = 0;
        let mut last_col = 0;
        for (r, row) in grid.rows().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_blank() {
                    last_row = last_row.max(r as u32 + 1);
                    last_col = last_col.max(c as u32 + 1);
                }
            }
        }
        Rectangle::new(1, last_row.max(1), 1, last_col.max(1))
    }

    fn values(&self, sheet: &str, range: &Rectangle) -> Result<Grid> {
        Ok(self.sheet(sheet)?.sub_grid(range))
    }

    fn display_values(&self, sheet: &str, range: &Rectangle) -> Result<Grid> {
        Ok(self.sheet(sheet)?.sub_grid(range).to_display())
    }

    fn activate(&mut self, sheet: &str, range: &Rectangle) -> Result<()> {
        self.sheet(sheet)?;
        self.active_sheet = sheet.to_string();
        self.active_range = *range;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_intent_core::CellValue;

    fn workbook() -> InMemoryWorkbook {
        InMemoryWorkbook::new(
            "Sheet1",
            Grid::from_strs(&[&["", "", ""], &["", "a", "b"], &["", "c", ""], &["", "", ""]]),
        )
    }

    #[test]
    fn test_data_range_ignores_trailing_blanks() {
        let wb = workbook();
        assert_eq!(wb.data_range("Sheet1").unwrap().to_a1(), "A1:C3");
    }

    #[test]
    fn test_data_range_of_empty_sheet() {
        let wb = InMemoryWorkbook::new("Empty", Grid::default());
        assert_eq!(wb.data_range("Empty").unwrap().to_a1(), "A1");
    }

    #[test]
    fn test_missing_sheet() {
        let wb = workbook();
        assert!(matches!(wb.data_range("Nope"), Err(Error::SheetNotFound(_))));
    }

    #[test]
    fn test_display_values() {
        let wb = InMemoryWorkbook::new(
            "Sheet1",
            Grid::new(vec![vec![CellValue::Number(95.0), CellValue::Bool(true)]]),
        );
        let range = Rectangle::parse_a1("A1:B1").unwrap();
        let display = wb.display_values("Sheet1", &range).unwrap();
        assert_eq!(display, Grid::from_strs(&[&["95", "TRUE"]]));
    }

    #[test]
    fn test_activate_switches_selection() {
        let mut wb = workbook().with_sheet("Other", Grid::from_strs(&[&["x"]]));
        let range = Rectangle::parse_a1("A1").unwrap();
        wb.activate("Other", &range).unwrap();
        assert_eq!(wb.active_sheet(), "Other");
        assert_eq!(wb.active_range(), range);
        assert!(wb.activate("Missing", &range).is_err());
    }

    #[test]
    fn test_from_json() {
        let wb = InMemoryWorkbook::from_json(
            r#"{"sheets": {"Sales": [["Region", "Units"], ["East", 95]]},
                "activeSheet": "Sales", "activeRange": "B2"}"#,
        )
        .unwrap();
        assert_eq!(wb.active_sheet(), "Sales");
        assert_eq!(wb.active_range().to_a1(), "B2");
        let range = Rectangle::parse_a1("B2").unwrap();
        assert_eq!(
            wb.values("Sales", &range).unwrap(),
            Grid::new(vec![vec![CellValue::Number(95.0)]])
        );
    }

    #[test]
    fn test_from_json_unknown_active_sheet() {
        let result = InMemoryWorkbook::from_json(r#"{"sheets": {}, "activeSheet": "Sales"}"#);
        assert!(matches!(result, Err(Error::SheetNotFound(_))));
    }
}
