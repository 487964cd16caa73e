//! # sheet-intent
//!
//! Server side of a spreadsheet analytics add-on.
//!
//! This crate ties the layers together into the operations the sidebar calls:
//! - Launch: reset state and preselect the table around the user's selection
//! - Header reconciliation and selection confirmation
//! - Date column detection and caching
//! - Query evaluation against the analytics service
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on:
//! - sheet-intent-core: Core types
//! - sheet-intent-session: Selection state over a spreadsheet host
//! - sheet-intent-gateway: Remote date detection and query evaluation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod params;
pub mod service;

// Re-export commonly used types
pub use params::{ConfirmSelectionParams, LaunchResponse};
pub use service::IntentService;
