//! Add-on session: table selection, date profile cache and query assembly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sheet_intent_core::{
    CellValue, DateColumnProfile, Error, Grid, QueryDescriptor, QueryForm, Rectangle, Result,
    SelectedRange, SelectionError, SelectionSettings, TableSelection,
};
use sheet_intent_detector::TableBoundaryDetector;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::keys;
use crate::{PropertyStore, SpreadsheetHost};

/// Identifier assigned to every add-on launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn corrupt(key: &str, reason: impl ToString) -> Error {
    Error::CorruptProperty {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// The add-on's state over one spreadsheet host and its property store.
///
/// Operations run one at a time; the store is the only state shared between
/// them and is cleared by [`AddOnSession::launch`].
pub struct AddOnSession<H, S> {
    id: SessionId,
    host: H,
    store: S,
    settings: SelectionSettings,
    detector: TableBoundaryDetector,
}

impl<H: SpreadsheetHost, S: PropertyStore> AddOnSession<H, S> {
    /// Create a session with default selection settings.
    pub fn new(host: H, store: S) -> Self {
        Self::with_settings(host, store, SelectionSettings::default())
    }

    /// Create a session with custom selection settings.
    pub fn with_settings(host: H, store: S, settings: SelectionSettings) -> Self {
        Self {
            id: SessionId::new(),
            host,
            store,
            settings,
            detector: TableBoundaryDetector::new(),
        }
    }

    /// Current session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The spreadsheet host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The spreadsheet host, mutably (e.g. to change the user's selection).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The property store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start over: clear the store, reset the date profile, and preselect the
    /// table around the user's current selection.
    ///
    /// Returns None when the preselected range is a single row; otherwise the
    /// range is activated in the host.
    pub fn launch(&mut self) -> Result<Option<TableSelection>> {
        self.id = SessionId::new();
        self.store.delete_all();
        self.store.set(keys::DATE_COLUMNS, "{}".to_string());
        info!(session = %self.id, "Launching");

        let selection = self.establish_selection()?;
        self.present(selection)
    }

    /// Recompute the entire table around the stored range and persist it.
    pub fn reload_entire_table(&mut self) -> Result<Option<TableSelection>> {
        let mut selection = self.require_selection()?;
        selection.entire_table_range = self.detect_table(&selection.input_sheet, selection.range)?;
        self.store.set(
            keys::ENTIRE_TABLE_RANGE,
            selection.entire_table_range.to_a1(),
        );
        info!(session = %self.id, table = %selection.entire_table_range, "Reloaded table");
        self.present(selection)
    }

    fn present(&mut self, selection: TableSelection) -> Result<Option<TableSelection>> {
        if selection.range.height() < 2 {
            info!(session = %self.id, range = %selection.range, "Single-row range, nothing preselected");
            return Ok(None);
        }
        self.host.activate(&selection.input_sheet, &selection.range)?;
        Ok(Some(selection))
    }

    /// Preselect a table from the user's current selection.
    pub fn establish_selection(&mut self) -> Result<TableSelection> {
        let anchor = self.host.active_range();
        self.establish_selection_from(anchor)
    }

    /// Preselect a table from `anchor` on the active sheet and persist it.
    ///
    /// An anchor with enough rows and cells is taken as the table body
    /// itself; otherwise the detected table is. The header row is always the
    /// first row of the table detected around the anchor.
    pub fn establish_selection_from(&mut self, anchor: Rectangle) -> Result<TableSelection> {
        let sheet = self.host.active_sheet().to_string();
        debug!(session = %self.id, anchor = %anchor, "Pre-selected range");

        let entire = self.detect_table(&sheet, anchor)?;
        let header_row = entire.row_start;
        let range = if self.trusts_anchor(&anchor) {
            anchor
        } else {
            entire
        };

        let selection = TableSelection {
            input_sheet: sheet,
            range,
            header_row,
            header_range: range.row_band(header_row)?,
            entire_table_range: entire,
        };
        info!(
            session = %self.id,
            range = %selection.range,
            header_row,
            table = %selection.entire_table_range,
            "Detected table"
        );
        self.persist(&selection);
        Ok(selection)
    }

    fn trusts_anchor(&self, anchor: &Rectangle) -> bool {
        anchor.height() >= self.settings.min_trusted_rows
            && anchor.area() >= self.settings.min_trusted_area
    }

    fn detect_table(&self, sheet: &str, seed: Rectangle) -> Result<Rectangle> {
        let data = self.host.data_range(sheet)?;
        let grid = self.host.values(sheet, &data)?;
        Ok(self
            .detector
            .detect(seed, &grid, data.row_end, data.col_end))
    }

    /// Propose a header for the user's current selection.
    pub fn reconcile_with_previous(&self) -> Result<SelectedRange> {
        self.reconcile(self.host.active_range())
    }

    /// Propose a header for `anchor`.
    ///
    /// Inside the stored range the stored header row carries over; anywhere
    /// else the anchor's first row is the header.
    pub fn reconcile(&self, anchor: Rectangle) -> Result<SelectedRange> {
        let previous = self
            .store
            .get(keys::RANGE)
            .map(|a1| Rectangle::parse_a1(&a1).map_err(|e| corrupt(keys::RANGE, e)))
            .transpose()?;

        let header_row = match previous {
            Some(previous) if previous.contains(&anchor) => {
                self.stored_header_row()?.unwrap_or(anchor.row_start)
            }
            _ => anchor.row_start,
        };

        let proposal = SelectedRange {
            range: anchor,
            header_row,
            header_range: anchor.row_band(header_row)?,
        };
        debug!(session = %self.id, range = %proposal.range, header_row, "Range selected by user");
        Ok(proposal)
    }

    /// Propose a whole table, headed by its first row.
    pub fn select_entire_table(&self, table: Rectangle) -> Result<SelectedRange> {
        Ok(SelectedRange {
            range: table,
            header_row: table.row_start,
            header_range: table.row_band(table.row_start)?,
        })
    }

    /// Validate and persist the user's choice of range and header.
    ///
    /// Field-scoped rejections come back as [`Error::Selection`]; the store is
    /// left untouched in that case.
    pub fn confirm_selection(
        &mut self,
        range: Rectangle,
        header_row: u32,
        header_range: Rectangle,
    ) -> Result<TableSelection> {
        let sheet = self.host.active_sheet().to_string();
        let entire = self.detect_table(&sheet, range)?;

        let rejection = if range.row_start < header_row {
            Some(SelectionError::HeaderRow)
        } else if entire.row_start != header_row && entire.row_start + 1 != header_row {
            Some(SelectionError::HeaderRow)
        } else if range.height() < 2 {
            Some(SelectionError::RangeTooSmall)
        } else {
            None
        };
        if let Some(err) = rejection {
            info!(session = %self.id, range = %range, header_row, error_in = err.error_in(), "Selection rejected");
            return Err(err.into());
        }

        self.host.activate(&sheet, &range)?;
        let selection = TableSelection {
            input_sheet: sheet,
            range,
            header_row,
            header_range,
            entire_table_range: entire,
        };
        info!(session = %self.id, range = %range, header_row, table = %entire, "Selection confirmed");
        self.persist(&selection);
        Ok(selection)
    }

    fn persist(&mut self, selection: &TableSelection) {
        self.store
            .set(keys::INPUT_SHEET, selection.input_sheet.clone());
        self.store.set(keys::RANGE, selection.range.to_a1());
        self.store
            .set(keys::HEADER_ROW, selection.header_row.to_string());
        self.store
            .set(keys::HEADER_RANGE, selection.header_range.to_a1());
        self.store.set(
            keys::ENTIRE_TABLE_RANGE,
            selection.entire_table_range.to_a1(),
        );
    }

    fn stored_header_row(&self) -> Result<Option<u32>> {
        self.store
            .get(keys::HEADER_ROW)
            .map(|row| row.trim().parse::<u32>().map_err(|e| corrupt(keys::HEADER_ROW, e)))
            .transpose()
    }

    fn stored_range(&self, key: &str) -> Result<Rectangle> {
        let a1 = self
            .store
            .get(key)
            .ok_or_else(|| corrupt(key, "missing"))?;
        Rectangle::parse_a1(&a1).map_err(|e| corrupt(key, e))
    }

    /// The persisted selection, if one has been established since launch.
    pub fn selection(&self) -> Result<Option<TableSelection>> {
        let (Some(input_sheet), Some(_)) = (self.store.get(keys::INPUT_SHEET), self.store.get(keys::RANGE))
        else {
            return Ok(None);
        };

        Ok(Some(TableSelection {
            input_sheet,
            range: self.stored_range(keys::RANGE)?,
            header_row: self
                .stored_header_row()?
                .ok_or_else(|| corrupt(keys::HEADER_ROW, "missing"))?,
            header_range: self.stored_range(keys::HEADER_RANGE)?,
            entire_table_range: self.stored_range(keys::ENTIRE_TABLE_RANGE)?,
        }))
    }

    /// The persisted selection, or [`Error::NoActiveSelection`].
    pub fn require_selection(&self) -> Result<TableSelection> {
        self.selection()?.ok_or(Error::NoActiveSelection)
    }

    /// Column names from the stored header range.
    pub fn headers(&self) -> Result<Vec<String>> {
        let selection = self.require_selection()?;
        let grid = self
            .host
            .values(&selection.input_sheet, &selection.header_range)?;
        Ok(grid
            .row(1)
            .map(|row| row.iter().map(CellValue::display).collect())
            .unwrap_or_default())
    }

    /// Typed values under the user's current selection, for filter pickers.
    pub fn filter_values(&self) -> Result<Grid> {
        self.host
            .values(self.host.active_sheet(), &self.host.active_range())
    }

    /// Header row followed by the selected data rows, across the whole table.
    ///
    /// Cells are typed, except in columns of the cached date profile, which
    /// carry their display strings.
    pub fn table_snapshot(&self) -> Result<Grid> {
        let selection = self.require_selection()?;
        let profile = self.date_columns()?;
        let sheet = &selection.input_sheet;

        let header = self.host.values(sheet, &selection.header_band())?;
        let Some(band) = selection.data_band() else {
            return Ok(header);
        };
        let mut data = self.host.values(sheet, &band)?;

        if !profile.is_empty() {
            let display = self.host.display_values(sheet, &band)?;
            let date_columns: Vec<usize> = header
                .row(1)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .filter(|(_, name)| profile.contains(&name.display()))
                .map(|(col, _)| col)
                .collect();
            for col in date_columns {
                data.replace_column(col, &display);
            }
        }
        Ok(header.concat(data))
    }

    /// Header row and selected data rows as display strings, for date detection.
    pub fn date_detection_table(&self) -> Result<Grid> {
        let selection = self.require_selection()?;
        let sheet = &selection.input_sheet;

        let header = self.host.display_values(sheet, &selection.header_band())?;
        match selection.data_band() {
            Some(band) => Ok(header.concat(self.host.display_values(sheet, &band)?)),
            None => Ok(header),
        }
    }

    /// Cache a date profile for the current selection.
    pub fn store_date_columns(&mut self, profile: &DateColumnProfile) -> Result<()> {
        let selection = self.require_selection()?;
        self.store
            .set(keys::DATE_COLUMNS, serde_json::to_string(profile)?);
        self.store
            .set(keys::DATE_COLUMNS_SELECTION, selection.fingerprint());
        debug!(session = %self.id, date_columns = profile.len(), "Cached date profile");
        Ok(())
    }

    /// Cached date profile, or an empty one if none was computed for the
    /// current selection.
    pub fn date_columns(&self) -> Result<DateColumnProfile> {
        let Some(selection) = self.selection()? else {
            return Ok(DateColumnProfile::empty());
        };
        let cached_for = self.store.get(keys::DATE_COLUMNS_SELECTION);
        if cached_for.as_deref() != Some(selection.fingerprint().as_str()) {
            return Ok(DateColumnProfile::empty());
        }

        match self.store.get(keys::DATE_COLUMNS) {
            Some(json) => serde_json::from_str(&json).map_err(|e| corrupt(keys::DATE_COLUMNS, e)),
            None => Ok(DateColumnProfile::empty()),
        }
    }

    /// Build a query descriptor from a form over the current selection.
    pub fn build_descriptor(&self, form: &QueryForm) -> Result<QueryDescriptor> {
        let selection = self.require_selection()?;
        let table = self.table_snapshot()?;
        let profile = self.date_columns()?;
        QueryDescriptor::build(form, table, selection.range, profile)
    }
}
