//! Query evaluation gateway.

use sheet_intent_core::{QueryDescriptor, QueryResult};
use tracing::{info, warn};

use crate::envelope::validate_envelope;
use crate::HttpTransport;

/// Sends query descriptors to the analytics service.
#[derive(Debug, Clone)]
pub struct QueryGateway<T> {
    transport: T,
    url: String,
}

impl<T: HttpTransport> QueryGateway<T> {
    /// Create a gateway posting to `url`.
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Endpoint the gateway posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Evaluate a query with a single request.
    ///
    /// Any failure (serialization, transport, status, body) yields
    /// [`QueryResult::failure`]; a result is either complete or the uniform
    /// failure, never a mix.
    pub async fn send(&self, descriptor: &QueryDescriptor) -> QueryResult {
        let json_query = match descriptor.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize query");
                return QueryResult::failure(String::new());
            }
        };
        self.send_json(json_query).await
    }

    /// Evaluate an already serialized query.
    pub async fn send_json(&self, json_query: String) -> QueryResult {
        let response = match self.transport.post_json(&self.url, json_query.clone()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Query request failed");
                return QueryResult::failure(json_query);
            }
        };

        match validate_envelope(&response, &json_query) {
            Ok(result) => {
                info!(
                    rows = result.row_count(),
                    suggestions = result.suggestions.len(),
                    "Query succeeded"
                );
                result
            }
            Err(e) => {
                warn!(status = response.status, reason = %e, "Query rejected");
                QueryResult::failure(json_query)
            }
        }
    }
}
