//! Flood-fill detection of a table's rectangular extent.

use sheet_intent_core::{Grid, Rectangle};
use tracing::debug;

/// Grows a seed range to the table around it.
///
/// Each pass first walks every spanned column, pushing the top edge up and
/// the bottom edge down while that column's next cell is non-blank. It then
/// walks every spanned row the same way for the left and right edges. Passes
/// repeat until one changes nothing.
///
/// Edges are shared within a pass: a column scanned later starts from the
/// edges earlier columns already moved, so the result is the union of what
/// any single column or row justified. Only edges grow; the seed's own cells
/// are never checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableBoundaryDetector;

impl TableBoundaryDetector {
    /// Create a new boundary detector.
    pub fn new() -> Self {
        Self
    }

    /// Detect the table containing `seed`, within `[1, max_rows] x [1, max_cols]`.
    ///
    /// Cells outside `grid` count as blank. The returned rectangle always
    /// contains `seed`.
    pub fn detect(&self, seed: Rectangle, grid: &Grid, max_rows: u32, max_cols: u32) -> Rectangle {
        let mut range = seed;
        let mut passes = 0usize;

        loop {
            passes += 1;
            let mut changed = false;

            for col in range.col_start..=range.col_end.min(max_cols) {
                while range.row_start > 1
                    && range.row_start - 1 <= max_rows
                    && !grid.is_blank(range.row_start - 1, col)
                {
                    range.row_start -= 1;
                    changed = true;
                }
                while range.row_end < max_rows && !grid.is_blank(range.row_end + 1, col) {
                    range.row_end += 1;
                    changed = true;
                }
            }

            for row in range.row_start..=range.row_end.min(max_rows) {
                while range.col_start > 1
                    && range.col_start - 1 <= max_cols
                    && !grid.is_blank(row, range.col_start - 1)
                {
                    range.col_start -= 1;
                    changed = true;
                }
                while range.col_end < max_cols && !grid.is_blank(row, range.col_end + 1) {
                    range.col_end += 1;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        debug!(seed = %seed, detected = %range, passes, "Detected table boundary");
        range
    }

    /// Detect within the grid's own extent.
    pub fn detect_in(&self, seed: Rectangle, grid: &Grid) -> Rectangle {
        self.detect(seed, grid, grid.row_count(), grid.col_count())
    }
}
