//! Error types for the sheet-intent crates.

use thiserror::Error;

/// Main error type for sheet-intent operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Rectangle bounds are zero or inverted
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A1 notation could not be parsed
    #[error("Invalid A1 notation: {0}")]
    InvalidA1(String),

    /// Sheet not present in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Query building was attempted before a table selection exists
    #[error("No active table selection")]
    NoActiveSelection,

    /// Intent form lacks a field the intent requires
    #[error("Intent '{intent}' requires field '{field}'")]
    MissingField {
        /// Intent name
        intent: &'static str,
        /// Wire name of the missing field
        field: &'static str,
    },

    /// Slice value does not fit its operator
    #[error("Invalid slice on column '{column}': {reason}")]
    InvalidSlice {
        /// Slice column
        column: String,
        /// Why the slice was rejected
        reason: String,
    },

    /// Selection confirmation rejected a field
    #[error("Invalid selection: {0}")]
    Selection(#[from] crate::selection::SelectionError),

    /// Query references a column missing from the header row
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Date filter names a column not classified as a date column
    #[error("Not a date column: {0}")]
    NotADateColumn(String),

    /// Top-k limit below 1
    #[error("Top-k limit must be at least 1 (got {0})")]
    InvalidTopKLimit(u32),

    /// Property store held a value that could not be read back
    #[error("Corrupt property '{key}': {reason}")]
    CorruptProperty {
        /// Property key
        key: String,
        /// Parse failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
