//! Configuration types for the sheet-intent add-on.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Add-on configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AddOnConfig {
    /// Remote service endpoints
    pub endpoints: EndpointSettings,
    /// Table selection settings
    pub selection: SelectionSettings,
    /// Query form defaults
    pub query: QuerySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

fn invalid(message: impl Into<String>) -> crate::Error {
    crate::Error::Config(message.into())
}

impl AddOnConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: AddOnConfig =
            serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        self.endpoints.validate()?;

        if self.selection.min_trusted_rows == 0 {
            return Err(invalid("selection.min_trusted_rows must be > 0"));
        }

        if self.query.default_top_k_limit == 0 {
            return Err(invalid("query.default_top_k_limit must be >= 1"));
        }

        Ok(())
    }
}

/// Remote service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Query evaluation endpoint
    pub query_url: String,
    /// Date column detection endpoint
    pub date_detection_url: String,
    /// Request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            query_url: "http://localhost:8080/getOutput".to_string(),
            date_detection_url: "http://localhost:8080/detectDate".to_string(),
            timeout_secs: 0,
        }
    }
}

impl EndpointSettings {
    fn validate(&self) -> crate::Result<()> {
        for (key, url) in [
            ("endpoints.query_url", &self.query_url),
            ("endpoints.date_detection_url", &self.date_detection_url),
        ] {
            if url.trim().is_empty() {
                return Err(invalid(format!("{key} cannot be empty")));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(format!(
                    "{key} must be an http:// or https:// URL (got '{url}')"
                )));
            }
        }
        Ok(())
    }
}

/// Table selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Anchor rows needed before the anchor itself is trusted as the table
    pub min_trusted_rows: u32,
    /// Anchor cell count needed before the anchor is trusted
    pub min_trusted_area: u64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            min_trusted_rows: 3,
            min_trusted_area: 6,
        }
    }
}

/// Query form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Top-k limit used when the form leaves it unset
    pub default_top_k_limit: u32,
    /// Sort order used when the form leaves it unset
    pub default_is_asc: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_top_k_limit: 10,
            default_is_asc: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
