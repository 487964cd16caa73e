//! End-to-end flows: launch, confirm, detect dates, evaluate a query.

use std::sync::Arc;

use serde_json::{json, Value};
use sheet_intent::{ConfirmSelectionParams, IntentService};
use sheet_intent_core::{AddOnConfig, Error, QueryStatus};
use sheet_intent_gateway::testing::CannedTransport;
use sheet_intent_session::{InMemoryWorkbook, MemoryPropertyStore};

type Service = IntentService<InMemoryWorkbook, MemoryPropertyStore, CannedTransport>;

const SALES_WORKBOOK: &str = r#"{
    "activeSheet": "Sales",
    "activeRange": "A1:G13",
    "sheets": {
        "Sales": [
            ["OrderDate", "Region", "Rep", "Item", "Units", "Unit Cost", "Total"],
            ["2019-01-06", "East", "Jones", "Pencil", 95, 1.99, 189.05],
            ["2019-01-23", "Central", "Kivell", "Binder", 50, 19.99, 999.5],
            ["2019-02-09", "Central", "Jardine", "Pencil", 36, 4.99, 179.64],
            ["2019-02-26", "Central", "Gill", "Pen", 27, 19.99, 539.73],
            ["2019-03-15", "West", "Sorvino", "Pencil", 56, 2.99, 167.44],
            ["2019-04-01", "East", "Jones", "Binder", 60, 4.99, 299.4],
            ["2019-04-18", "Central", "Andrews", "Pencil", 75, 1.99, 149.25],
            ["2019-05-05", "Central", "Jardine", "Pencil", 90, 4.99, 449.1],
            ["2019-05-22", "West", "Thompson", "Pencil", 32, 1.99, 63.68],
            ["2019-06-08", "East", "Jones", "Binder", 60, 8.99, 539.4],
            ["2019-06-25", "Central", "Morgan", "Pencil", 90, 4.99, 449.1],
            ["2019-07-12", "East", "Howard", "Binder", 29, 1.99, 57.71]
        ]
    }
}"#;

const DATE_PROFILE: &str = r#"{
    "OrderDate": {
        "type": "CONSISTENT",
        "day_first": false,
        "min_date": {"day_first_false": "2019-01-06"},
        "max_date": {"day_first_false": "2019-07-12"}
    }
}"#;

const SHOW_FORM: &str = r#"{
    "intent": "show",
    "metric": "Units",
    "summaryOperator": "Sum",
    "dimensions": ["Item"],
    "dateRange": {"dateCol": "OrderDate", "dateStart": "2019-01-06", "dateEnd": "2019-07-12"}
}"#;

fn service_with(config: &AddOnConfig) -> (Service, Arc<CannedTransport>) {
    let transport = Arc::new(CannedTransport::new());
    let workbook = InMemoryWorkbook::from_json(SALES_WORKBOOK).unwrap();
    let service = IntentService::new(
        workbook,
        MemoryPropertyStore::new(),
        Arc::clone(&transport),
        config,
    );
    (service, transport)
}

fn service() -> (Service, Arc<CannedTransport>) {
    service_with(&AddOnConfig::default())
}

#[tokio::test]
async fn test_show_query_end_to_end() {
    let config = AddOnConfig::default();
    let (mut service, transport) = service_with(&config);
    transport.push_response(200, DATE_PROFILE);
    transport.push_response(
        200,
        r#"{"outputTable": [["Item", "Units"], ["Binder", 199], ["Pen", 27], ["Pencil", 474]],
            "suggestions": []}"#,
    );

    let launch = service.launch().unwrap();
    let selection = launch.selection.unwrap();
    assert_eq!(selection.range.to_a1(), "A1:G13");
    assert_eq!(selection.header_row, 1);

    let profile = service.detect_dates().await.unwrap();
    assert!(profile.contains("OrderDate"));

    let form = service.form_from_json(SHOW_FORM).unwrap();
    let result = service.eval_query(&form).await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.row_count(), 4);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, config.endpoints.date_detection_url);
    let detection_table: Vec<Vec<String>> = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(detection_table.len(), 13);
    assert_eq!(detection_table[1][4], "95");

    assert_eq!(requests[1].url, config.endpoints.query_url);
    let query: Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(result.json_query, requests[1].body);

    assert_eq!(query["table"].as_array().unwrap().len(), 13);
    assert_eq!(query["table"][0][0], "OrderDate");
    assert_eq!(query["intent"], "show");
    assert_eq!(query["rangeA1Notation"], "A1:G13");
    assert_eq!(query["metric"], "Units");
    assert_eq!(query["summaryOperator"], "Sum");
    assert_eq!(query["dimensions"], json!(["Item"]));
    assert_eq!(
        query["dateRange"],
        json!({"dateCol": "OrderDate", "dateStart": "2019-01-06", "dateEnd": "2019-07-12"})
    );
    assert_eq!(query["isAsc"], false);
    assert_eq!(query["topKLimit"], 10);
    assert_eq!(query["dateColumns"]["OrderDate"]["type"], "CONSISTENT");

    let object = query.as_object().unwrap();
    for omitted in [
        "slices",
        "comparisonValue",
        "compareDateRange",
        "correlationMetrics",
        "timeGranularity",
    ] {
        assert!(!object.contains_key(omitted), "{omitted} should be omitted");
    }
}

#[tokio::test]
async fn test_service_failure_is_uniform() {
    let (mut service, transport) = service();
    transport.push_response(200, DATE_PROFILE);
    transport.push_response(500, "<html>Internal Server Error</html>");

    service.launch().unwrap();
    service.detect_dates().await.unwrap();
    let form = service.form_from_json(SHOW_FORM).unwrap();
    let result = service.eval_query(&form).await.unwrap();

    assert_eq!(result.status, QueryStatus::Fail);
    assert!(!result.json_query.is_empty());
    assert_eq!(
        serde_json::to_value(&result.output_table).unwrap(),
        json!([[]])
    );
}

#[tokio::test]
async fn test_date_filter_needs_detected_date_column() {
    let (mut service, transport) = service();
    transport.push_failure("connection refused");

    service.launch().unwrap();
    let profile = service.detect_dates().await.unwrap();
    assert!(profile.is_empty());

    let form = service.form_from_json(SHOW_FORM).unwrap();
    let result = service.eval_query(&form).await;
    assert!(matches!(result, Err(Error::NotADateColumn(col)) if col == "OrderDate"));
    // Rejected forms never reach the query service
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_query_before_launch() {
    let (service, transport) = service();
    let form = service.form_from_json(SHOW_FORM).unwrap();
    assert!(matches!(
        service.eval_query(&form).await,
        Err(Error::NoActiveSelection)
    ));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_form_defaults_come_from_config() {
    let mut config = AddOnConfig::default();
    config.query.default_top_k_limit = 5;
    let (mut service, _) = service_with(&config);
    service.launch().unwrap();

    let form = service
        .form_from_json(r#"{"intent": "topk", "metric": "Units"}"#)
        .unwrap();
    assert_eq!(form.top_k_limit, 5);
    assert!(!form.is_asc);

    let wire: Value = serde_json::from_str(&service.describe(&form).unwrap()).unwrap();
    assert_eq!(wire["intent"], "topk");
    assert_eq!(wire["topKLimit"], 5);
    assert!(wire.get("summaryOperator").is_none());

    // Explicit values win over defaults
    let form = service
        .form_from_json(r#"{"intent": "topk", "metric": "Units", "topKLimit": 3.0, "isAsc": true}"#)
        .unwrap();
    assert_eq!(form.top_k_limit, 3);
    assert!(form.is_asc);
}

#[test]
fn test_confirm_selection_from_form() {
    let (mut service, _) = service();
    service.launch().unwrap();

    let response = service
        .confirm_selection(&ConfirmSelectionParams::new("A2:G", "1"))
        .unwrap();
    assert!(response.success);
    let selection = response.selection.unwrap();
    assert_eq!(selection.range.to_a1(), "A2:G13");
    assert_eq!(selection.header_range.to_a1(), "A1:G1");
    assert_eq!(service.headers().unwrap()[0], "OrderDate");
}

#[test]
fn test_confirm_selection_rejections() {
    let (mut service, _) = service();
    service.launch().unwrap();

    let cases = [
        (ConfirmSelectionParams::new("A2:G13", "zero"), "headerRow"),
        (ConfirmSelectionParams::new("A2:G13", "0"), "headerRow"),
        (ConfirmSelectionParams::new("2A:G13", "1"), "range"),
        (ConfirmSelectionParams::new("A2:G13", "3"), "headerRow"),
        (ConfirmSelectionParams::new("A5:G13", "4"), "headerRow"),
        (ConfirmSelectionParams::new("A5:G5", "1"), "range"),
    ];
    for (params, field) in cases {
        let response = service.confirm_selection(&params).unwrap();
        assert!(!response.success, "{params:?} should be rejected");
        assert_eq!(response.error_in.as_deref(), Some(field), "{params:?}");
    }

    // The launch selection is still in place
    assert_eq!(
        service.session().require_selection().unwrap().range.to_a1(),
        "A1:G13"
    );
}

#[test]
fn test_select_entire_table_and_reload() {
    let (mut service, _) = service();
    service.launch().unwrap();
    service
        .confirm_selection(&ConfirmSelectionParams::new("A3:G8", "1"))
        .unwrap();

    let proposal = service.select_entire_table().unwrap();
    assert_eq!(proposal.range.to_a1(), "A1:G13");
    assert_eq!(proposal.header_row, 1);

    let reload = service.reload().unwrap();
    assert_eq!(reload.selection.unwrap().range.to_a1(), "A3:G8");
}
