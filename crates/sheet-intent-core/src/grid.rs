//! Immutable 2D snapshot of sheet cells.

use serde::{Deserialize, Serialize};

use crate::{CellValue, Rectangle};

/// Rectangular snapshot of cell values, addressed with 1-based (row, col).
///
/// Serializes as a JSON array of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// Create a grid from rows of cells.
    ///
    /// Ragged rows are padded with blank cells to the widest row.
    pub fn new(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows }
    }

    /// Grid holding a single row with no cells (`[[]]`).
    pub fn single_empty_row() -> Self {
        Self {
            rows: vec![Vec::new()],
        }
    }

    /// Build a grid from string literals, `""` meaning blank.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|s| CellValue::text(*s)).collect())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of columns.
    pub fn col_count(&self) -> u32 {
        self.rows.first().map_or(0, |r| r.len() as u32)
    }

    /// Check if the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Get cell at a 1-based position.
    ///
    /// Returns None if position is out of bounds.
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
    }

    /// Check if the cell at a 1-based position is blank.
    ///
    /// Positions outside the grid count as blank.
    pub fn is_blank(&self, row: u32, col: u32) -> bool {
        self.cell(row, col).map_or(true, CellValue::is_blank)
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Get a 1-based row as a slice.
    pub fn row(&self, row: u32) -> Option<&[CellValue]> {
        if row == 0 {
            return None;
        }
        self.rows.get(row as usize - 1).map(Vec::as_slice)
    }

    /// Copy out the cells under `range`; cells past the grid edge are blank.
    pub fn sub_grid(&self, range: &Rectangle) -> Grid {
        let rows = (range.row_start..=range.row_end)
            .map(|r| {
                (range.col_start..=range.col_end)
                    .map(|c| self.cell(r, c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Grid { rows }
    }

    /// Stack `other` below this grid.
    pub fn concat(mut self, other: Grid) -> Grid {
        self.rows.extend(other.rows);
        Grid::new(self.rows)
    }

    /// Grid of display strings.
    pub fn to_display(&self) -> Grid {
        Grid {
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(CellValue::to_display_cell).collect())
                .collect(),
        }
    }

    /// Replace the 0-based column `col` with the same column from `source`.
    ///
    /// Rows missing from `source` are left untouched.
    pub fn replace_column(&mut self, col: usize, source: &Grid) {
        for (row, src) in self.rows.iter_mut().zip(source.rows.iter()) {
            if let (Some(dst), Some(value)) = (row.get_mut(col), src.get(col)) {
                *dst = value.clone();
            }
        }
    }

    /// Consume the grid into its rows.
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_ragged_rows() {
        let grid = Grid::from_strs(&[&["a", "b", "c"], &["d"]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 3);
        assert!(grid.is_blank(2, 3));
    }

    #[test]
    fn test_cell_access_is_one_based() {
        let grid = Grid::from_strs(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(grid.cell(1, 1), Some(&CellValue::text("a")));
        assert_eq!(grid.cell(2, 2), Some(&CellValue::text("d")));
        assert_eq!(grid.cell(0, 1), None);
        assert_eq!(grid.cell(3, 1), None);
        assert!(grid.is_blank(3, 1));
    }

    #[test]
    fn test_sub_grid() {
        let grid = Grid::from_strs(&[&["a", "b", "c"], &["d", "e", "f"]]);
        let sub = grid.sub_grid(&Rectangle::parse_a1("B1:C3").unwrap());
        assert_eq!(sub, Grid::from_strs(&[&["b", "c"], &["e", "f"], &["", ""]]));
    }

    #[test]
    fn test_concat_and_replace_column() {
        let header = Grid::from_strs(&[&["Date", "Units"]]);
        let typed = Grid::new(vec![vec![CellValue::Number(43466.0), CellValue::Number(5.0)]]);
        let display = Grid::from_strs(&[&["1/1/2019", "5"]]);

        let mut data = typed.clone();
        data.replace_column(0, &display);
        let table = header.concat(data);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(2, 1), Some(&CellValue::text("1/1/2019")));
        assert_eq!(table.cell(2, 2), Some(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        let grid = Grid::new(vec![
            vec![CellValue::text("Units"), CellValue::text("Unit Cost")],
            vec![CellValue::Number(95.0), CellValue::Number(1.99)],
        ]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[["Units","Unit Cost"],[95,1.99]]"#);
    }

    #[test]
    fn test_single_empty_row_serialization() {
        let json = serde_json::to_string(&Grid::single_empty_row()).unwrap();
        assert_eq!(json, "[[]]");
    }
}
