//! Selection, header reconciliation and snapshot flows over an in-memory workbook.

use chrono::NaiveDate;
use sheet_intent_core::{
    CellValue, ConfirmResponse, DateBound, DateColumnInfo, DateColumnProfile, DateColumnType,
    Error, Grid, IntentKind, QueryForm, Rectangle, SelectionError, SummaryOperator,
};
use sheet_intent_session::store::keys;
use sheet_intent_session::{AddOnSession, InMemoryWorkbook, MemoryPropertyStore, PropertyStore, SpreadsheetHost};

const HEADERS: [&str; 7] = ["OrderDate", "Region", "Rep", "Item", "Units", "Unit Cost", "Total"];

type Session = AddOnSession<InMemoryWorkbook, MemoryPropertyStore>;

fn rect(a1: &str) -> Rectangle {
    Rectangle::parse_a1(a1).unwrap()
}

/// Sheet with a table at C3 spanning `last_row`, header in row 3.
fn sales_sheet(last_row: u32) -> Grid {
    let mut rows = vec![vec![CellValue::Empty; 10]; last_row as usize + 4];
    for (i, name) in HEADERS.iter().enumerate() {
        rows[2][i + 2] = CellValue::text(*name);
    }
    for r in 4..=last_row as usize {
        let row = &mut rows[r - 1];
        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap() + chrono::Duration::days(r as i64);
        row[2] = CellValue::Date(day.and_hms_opt(0, 0, 0).unwrap());
        row[3] = CellValue::text(if r % 2 == 0 { "East" } else { "West" });
        row[4] = CellValue::text(format!("Rep{}", r % 5));
        row[5] = CellValue::text(if r % 3 == 0 { "Pencil" } else { "Binder" });
        row[6] = CellValue::Number(r as f64);
        row[7] = CellValue::Number(1.5);
        row[8] = CellValue::Number(r as f64 * 1.5);
    }
    Grid::new(rows)
}

fn session() -> Session {
    AddOnSession::new(
        InMemoryWorkbook::new("Sales", sales_sheet(46)),
        MemoryPropertyStore::new(),
    )
}

fn launched_from(anchor: &str) -> Session {
    let mut session = session();
    session.host_mut().select_a1(anchor).unwrap();
    session.launch().unwrap();
    session
}

fn order_date_profile() -> DateColumnProfile {
    let mut profile = DateColumnProfile::empty();
    profile.insert(
        "OrderDate",
        DateColumnInfo {
            column_type: DateColumnType::Consistent,
            day_first: Some(false),
            min_date: DateBound::default(),
            max_date: DateBound::default(),
        },
    );
    profile
}

#[test]
fn test_launch_from_single_cell_selects_whole_table() {
    let mut session = session();
    session.host_mut().select_a1("C3").unwrap();

    let selection = session.launch().unwrap().unwrap();
    assert_eq!(selection.input_sheet, "Sales");
    assert_eq!(selection.range.to_a1(), "C3:I46");
    assert_eq!(selection.header_row, 3);
    assert_eq!(selection.header_range.to_a1(), "C3:I3");
    assert_eq!(selection.entire_table_range.to_a1(), "C3:I46");

    assert_eq!(session.host().active_range().to_a1(), "C3:I46");
    let store = session.store();
    assert_eq!(store.get(keys::RANGE).as_deref(), Some("C3:I46"));
    assert_eq!(store.get(keys::HEADER_ROW).as_deref(), Some("3"));
    assert_eq!(store.get(keys::DATE_COLUMNS).as_deref(), Some("{}"));
}

#[test]
fn test_launch_keeps_trusted_anchor() {
    let session = launched_from("D5:G10");
    let selection = session.require_selection().unwrap();
    assert_eq!(selection.range.to_a1(), "D5:G10");
    assert_eq!(selection.header_row, 3);
    assert_eq!(selection.header_range.to_a1(), "D3:G3");
    assert_eq!(selection.entire_table_range.to_a1(), "C3:I46");
}

#[test]
fn test_launch_clears_previous_properties() {
    let mut session = launched_from("C3");
    session.store_date_columns(&order_date_profile()).unwrap();
    session.host_mut().select_a1("C3").unwrap();
    session.launch().unwrap();
    assert!(session.date_columns().unwrap().is_empty());
    assert!(session.store().get(keys::DATE_COLUMNS_SELECTION).is_none());
}

#[test]
fn test_launch_on_single_row_table() {
    let grid = Grid::from_strs(&[&["Region", "Units", "Total"]]);
    let mut session = AddOnSession::new(
        InMemoryWorkbook::new("Sheet1", grid),
        MemoryPropertyStore::new(),
    );
    session.host_mut().select_a1("B1").unwrap();

    assert!(session.launch().unwrap().is_none());
    // Nothing activated, but the detection is still persisted
    assert_eq!(session.host().active_range().to_a1(), "B1");
    assert_eq!(session.store().get(keys::RANGE).as_deref(), Some("A1:C1"));
}

#[test]
fn test_reconcile_inside_previous_range_keeps_header() {
    let session = launched_from("C3");
    let proposal = session.reconcile(rect("D5:G10")).unwrap();
    assert_eq!(proposal.range.to_a1(), "D5:G10");
    assert_eq!(proposal.header_row, 3);
    assert_eq!(proposal.header_range.to_a1(), "D3:G3");
}

#[test]
fn test_reconcile_outside_previous_range_uses_first_row() {
    let mut session = launched_from("D5:G10");
    session.host_mut().select_a1("C4:I20").unwrap();
    let proposal = session.reconcile_with_previous().unwrap();
    assert_eq!(proposal.header_row, 4);
    assert_eq!(proposal.header_range.to_a1(), "C4:I4");
}

#[test]
fn test_reconcile_without_previous_range() {
    let session = session();
    let proposal = session.reconcile(rect("E10:F12")).unwrap();
    assert_eq!(proposal.header_row, 10);
    assert_eq!(proposal.header_range.to_a1(), "E10:F10");
}

#[test]
fn test_select_entire_table() {
    let session = launched_from("D5:G10");
    let proposal = session.select_entire_table(rect("C3:I46")).unwrap();
    assert_eq!(proposal.range.to_a1(), "C3:I46");
    assert_eq!(proposal.header_row, 3);
    assert_eq!(proposal.header_range.to_a1(), "C3:I3");
}

#[test]
fn test_confirm_rejects_header_below_range_start() {
    let mut session = launched_from("C3");
    let result = session.confirm_selection(rect("C3:I46"), 4, rect("C4:I4"));
    assert!(matches!(result, Err(Error::Selection(SelectionError::HeaderRow))));
    assert_eq!(session.store().get(keys::HEADER_ROW).as_deref(), Some("3"));
}

#[test]
fn test_confirm_rejects_header_away_from_table_top() {
    let mut session = launched_from("C3");
    let result = session.confirm_selection(rect("C10:I46"), 8, rect("C8:I8"));
    let response = ConfirmResponse::from_outcome(result).unwrap();
    assert!(!response.success);
    assert_eq!(response.error_in.as_deref(), Some("headerRow"));
    assert_eq!(session.store().get(keys::RANGE).as_deref(), Some("C3:I46"));
}

#[test]
fn test_confirm_rejects_single_row_range() {
    let mut session = launched_from("C3");
    let result = session.confirm_selection(rect("C10:I10"), 3, rect("C3:I3"));
    assert!(matches!(
        result,
        Err(Error::Selection(SelectionError::RangeTooSmall))
    ));
}

#[test]
fn test_confirm_accepts_second_row_header() {
    let mut session = launched_from("C3");
    let selection = session
        .confirm_selection(rect("C5:I30"), 4, rect("C4:I4"))
        .unwrap();
    assert_eq!(selection.entire_table_range.to_a1(), "C3:I46");
    assert_eq!(session.host().active_range().to_a1(), "C5:I30");

    let stored = session.require_selection().unwrap();
    assert_eq!(stored, selection);

    let response = ConfirmResponse::from_outcome(Ok(selection)).unwrap();
    assert!(response.success);
}

#[test]
fn test_reload_entire_table_picks_up_growth() {
    let mut session = launched_from("D5:G10");
    session.host_mut().put_sheet("Sales", sales_sheet(50));

    let selection = session.reload_entire_table().unwrap().unwrap();
    assert_eq!(selection.range.to_a1(), "D5:G10");
    assert_eq!(selection.entire_table_range.to_a1(), "C3:I50");
    assert_eq!(
        session.store().get(keys::ENTIRE_TABLE_RANGE).as_deref(),
        Some("C3:I50")
    );
}

#[test]
fn test_reload_without_selection() {
    let mut session = session();
    assert!(matches!(
        session.reload_entire_table(),
        Err(Error::NoActiveSelection)
    ));
}

#[test]
fn test_headers_and_filter_values() {
    let mut session = launched_from("C3");
    assert_eq!(session.headers().unwrap(), HEADERS.to_vec());

    session.host_mut().select_a1("D4:D6").unwrap();
    let values = session.filter_values().unwrap();
    assert_eq!(
        values,
        Grid::from_strs(&[&["East"], &["West"], &["East"]])
    );
}

#[test]
fn test_date_cache_follows_selection() {
    let mut session = launched_from("C3");
    session.store_date_columns(&order_date_profile()).unwrap();
    assert!(session.date_columns().unwrap().contains("OrderDate"));

    // Re-confirming the same selection keeps the cache
    session
        .confirm_selection(rect("C3:I46"), 3, rect("C3:I3"))
        .unwrap();
    assert_eq!(session.date_columns().unwrap().len(), 1);

    session
        .confirm_selection(rect("C3:I20"), 3, rect("C3:I3"))
        .unwrap();
    assert!(session.date_columns().unwrap().is_empty());
}

#[test]
fn test_table_snapshot_window() {
    let session = launched_from("D5:G10");
    let table = session.table_snapshot().unwrap();

    // Header plus rows 5..=10, across the whole table width
    assert_eq!(table.row_count(), 7);
    assert_eq!(table.col_count(), 7);
    assert_eq!(table.cell(1, 1), Some(&CellValue::text("OrderDate")));
    assert_eq!(table.cell(2, 5), Some(&CellValue::Number(5.0)));
    assert!(matches!(table.cell(2, 1), Some(CellValue::Date(_))));
}

#[test]
fn test_table_snapshot_uses_display_for_date_columns() {
    let mut session = launched_from("D5:G10");
    session.store_date_columns(&order_date_profile()).unwrap();

    let table = session.table_snapshot().unwrap();
    assert_eq!(table.cell(2, 1), Some(&CellValue::text("2019-01-06")));
    assert_eq!(table.cell(2, 5), Some(&CellValue::Number(5.0)));
}

#[test]
fn test_date_detection_table_is_all_display() {
    let session = launched_from("C3");
    let table = session.date_detection_table().unwrap();
    assert_eq!(table.row_count(), 44);
    assert_eq!(table.cell(2, 1), Some(&CellValue::text("2019-01-05")));
    assert_eq!(table.cell(2, 5), Some(&CellValue::text("4")));
}

#[test]
fn test_build_descriptor_over_selection() {
    let mut form = QueryForm::new(IntentKind::Show);
    form.metric = Some("Units".to_string());
    form.summary_operator = Some(SummaryOperator::Sum);
    form.dimensions = vec!["Item".to_string()];

    assert!(matches!(
        session().build_descriptor(&form),
        Err(Error::NoActiveSelection)
    ));

    let session = launched_from("D5:G10");
    let descriptor = session.build_descriptor(&form).unwrap();
    assert_eq!(descriptor.range.to_a1(), "D5:G10");
    assert_eq!(descriptor.table.row_count(), 7);

    form.dimensions = vec!["Warehouse".to_string()];
    assert!(matches!(
        session.build_descriptor(&form),
        Err(Error::UnknownColumn(name)) if name == "Warehouse"
    ));
}
