//! Grid builders for detection tests and benchmarks.

use sheet_intent_core::{CellValue, Grid, Rectangle};

/// Build a grid from a character picture.
///
/// `.` and space are blank cells; any other character becomes a text cell
/// holding that character.
pub fn grid_from_pattern(lines: &[&str]) -> Grid {
    Grid::new(
        lines
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '.' | ' ' => CellValue::Empty,
                        other => CellValue::text(other.to_string()),
                    })
                    .collect()
            })
            .collect(),
    )
}

/// A `rows x cols` grid whose cells are filled only inside `block`.
pub fn grid_with_block(rows: u32, cols: u32, block: &Rectangle) -> Grid {
    Grid::new(
        (1..=rows)
            .map(|r| {
                (1..=cols)
                    .map(|c| {
                        if block.contains_cell(r, c) {
                            CellValue::Number(f64::from(r * cols + c))
                        } else {
                            CellValue::Empty
                        }
                    })
                    .collect()
            })
            .collect(),
    )
}
