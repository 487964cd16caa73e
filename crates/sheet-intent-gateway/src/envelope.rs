//! Validation of the query service's response envelope.

use serde::Deserialize;
use serde_json::Value;
use sheet_intent_core::{QueryResult, QueryStatus};
use thiserror::Error;
use tracing::warn;

use crate::HttpResponse;

/// Keys a successful reply must carry.
const REQUIRED_KEYS: [&str; 2] = ["outputTable", "suggestions"];

/// A response arrived but broke the service contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Status other than 200
    #[error("Unexpected status {0}")]
    Status(u16),

    /// Body is not JSON
    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    /// Body is JSON but not an object
    #[error("Response body is not a JSON object")]
    NotAnObject,

    /// Required key absent
    #[error("Response is missing '{0}'")]
    MissingKey(&'static str),

    /// Key present with the wrong shape
    #[error("Response has an unexpected shape: {0}")]
    Shape(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryEnvelope {
    output_table: Vec<Vec<Value>>,
    suggestions: Vec<Value>,
    #[serde(default, rename = "slicing_passed_list")]
    slicing_passed_list: Option<Value>,
    #[serde(default, rename = "list_topk_indices")]
    list_topk_indices: Option<Value>,
}

/// Per-row annotation list, passed through as returned.
///
/// Anything other than an array is dropped rather than failing the reply.
fn annotation(key: &str, value: Option<Value>) -> Option<Vec<Value>> {
    match value {
        Some(Value::Array(items)) => Some(items),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!(key, value = %other, "Ignoring malformed row annotation");
            None
        }
    }
}

/// Check whether a body parses as JSON.
pub fn check_json_validity(body: &str) -> bool {
    serde_json::from_str::<Value>(body).is_ok()
}

/// Turn a raw reply into a successful result, or say why it cannot be one.
pub fn validate_envelope(
    response: &HttpResponse,
    json_query: &str,
) -> Result<QueryResult, ContractError> {
    if response.status != 200 {
        return Err(ContractError::Status(response.status));
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| ContractError::MalformedJson(e.to_string()))?;
    let object = value.as_object().ok_or(ContractError::NotAnObject)?;
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(ContractError::MissingKey(*missing));
    }

    let envelope: QueryEnvelope =
        serde_json::from_value(value).map_err(|e| ContractError::Shape(e.to_string()))?;

    Ok(QueryResult {
        status: QueryStatus::Success,
        json_query: json_query.to_string(),
        output_table: envelope.output_table,
        suggestions: envelope.suggestions,
        filters_passed: annotation("slicing_passed_list", envelope.slicing_passed_list),
        in_top_k: annotation("list_topk_indices", envelope.list_topk_indices),
    })
}
