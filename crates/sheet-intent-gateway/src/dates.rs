//! Date column detection client.

use sheet_intent_core::{DateColumnProfile, Grid};
use tracing::{info, warn};

use crate::HttpTransport;

/// Asks the date service which table columns hold dates.
#[derive(Debug, Clone)]
pub struct DateDetectionClient<T> {
    transport: T,
    url: String,
}

impl<T: HttpTransport> DateDetectionClient<T> {
    /// Create a client posting to `url`.
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Classify the columns of `table` (header row first, display strings).
    ///
    /// Any failure yields an empty profile.
    pub async fn detect(&self, table: &Grid) -> DateColumnProfile {
        let body = match serde_json::to_string(table) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to serialize date detection table");
                return DateColumnProfile::empty();
            }
        };

        let response = match self.transport.post_json(&self.url, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Date detection request failed");
                return DateColumnProfile::empty();
            }
        };
        if response.status != 200 {
            warn!(status = response.status, "Date detection rejected");
            return DateColumnProfile::empty();
        }

        match serde_json::from_str::<DateColumnProfile>(&response.body) {
            Ok(profile) => {
                info!(date_columns = profile.len(), "Detected date columns");
                profile
            }
            Err(e) => {
                warn!(error = %e, "Unreadable date detection response");
                DateColumnProfile::empty()
            }
        }
    }
}
