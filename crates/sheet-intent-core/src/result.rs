//! Normalized query results handed back to the UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a query round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Service answered with a usable payload
    Success,
    /// Transport, status, parse or contract failure
    Fail,
}

/// Result of one query, successful or not.
///
/// On failure the table is `[[]]`, suggestions are empty, and both optional
/// annotations are null; callers never see a partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Outcome
    pub status: QueryStatus,
    /// The query that was sent, as serialized
    pub json_query: String,
    /// Result table rows
    pub output_table: Vec<Vec<Value>>,
    /// Follow-up suggestions, passed through as returned
    pub suggestions: Vec<Value>,
    /// Per-row entries marking rows that passed the query's filters, as
    /// returned (usually booleans)
    pub filters_passed: Option<Vec<Value>>,
    /// Per-row entries marking rows in the top-k set, as returned
    pub in_top_k: Option<Vec<Value>>,
}

impl QueryResult {
    /// Uniform failure for a query.
    pub fn failure(json_query: impl Into<String>) -> Self {
        Self {
            status: QueryStatus::Fail,
            json_query: json_query.into(),
            output_table: vec![Vec::new()],
            suggestions: Vec::new(),
            filters_passed: None,
            in_top_k: None,
        }
    }

    /// Check if the query succeeded.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// Number of rows in the result table, header included.
    pub fn row_count(&self) -> usize {
        self.output_table.iter().filter(|row| !row.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_shape() {
        let result = QueryResult::failure(r#"{"intent":"show"}"#);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "fail",
                "jsonQuery": "{\"intent\":\"show\"}",
                "outputTable": [[]],
                "suggestions": [],
                "filtersPassed": null,
                "inTopK": null
            })
        );
        assert!(!result.is_success());
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_success_row_count() {
        let result = QueryResult {
            status: QueryStatus::Success,
            json_query: "{}".to_string(),
            output_table: vec![vec![json!("Item"), json!("SUM of Units")], vec![json!("Pencil"), json!(95)]],
            suggestions: vec![],
            filters_passed: Some(vec![json!(true), json!(false)]),
            in_top_k: None,
        };
        assert!(result.is_success());
        assert_eq!(result.row_count(), 2);
    }
}
