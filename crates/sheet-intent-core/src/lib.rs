//! # sheet-intent-core
//!
//! Core types for the sheet-intent add-on.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other sheet-intent crates. It provides:
//!
//! - Geometry types (`Rectangle`, A1 notation)
//! - Cell values and immutable grid snapshots
//! - Table selection state and its validation outcomes
//! - Date column profiles returned by the date-detection service
//! - The intent query model and its wire form
//! - Query results and form field validators
//! - Configuration and error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other sheet-intent crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all modules
pub mod cell;
pub mod config;
pub mod date_profile;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod query;
pub mod result;
pub mod selection;
pub mod validation;

// Re-export commonly used types
pub use cell::CellValue;
pub use config::{AddOnConfig, EndpointSettings, LoggingSettings, QuerySettings, SelectionSettings};
pub use date_profile::{DateBound, DateColumnInfo, DateColumnProfile, DateColumnType};
pub use error::{Error, Result};
pub use geometry::{column_to_letters, letters_to_column, Rectangle};
pub use grid::Grid;
pub use query::{
    CompareDateRange, CorrelationMetrics, DateRange, Intent, IntentKind, QueryDescriptor,
    QueryForm, Ranking, Slice, SliceComparison, SliceOp, SliceScalar, SliceValue,
    SummaryOperator, TimeGranularity, WireQuery,
};
pub use result::{QueryResult, QueryStatus};
pub use selection::{ConfirmResponse, SelectedRange, SelectionError, TableSelection};
