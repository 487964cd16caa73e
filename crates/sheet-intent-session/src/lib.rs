//! # sheet-intent-session
//!
//! Add-on session state for the sheet-intent add-on.
//!
//! This crate provides:
//! - The `SpreadsheetHost` capability the add-on consumes, and an in-memory
//!   workbook implementing it
//! - The document property store and the keys the add-on persists
//! - `AddOnSession`: table selection, header reconciliation and
//!   confirmation, the date column profile cache, and table snapshots for
//!   query assembly
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on sheet-intent-core
//! and sheet-intent-detector.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod host;
pub mod session;
pub mod store;
pub mod workbook;

// Re-export commonly used types
pub use host::SpreadsheetHost;
pub use session::{AddOnSession, SessionId};
pub use store::{MemoryPropertyStore, PropertyStore};
pub use workbook::InMemoryWorkbook;
