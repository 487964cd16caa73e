//! # sheet-intent-detector
//!
//! Table boundary detection for the sheet-intent add-on.
//!
//! This crate provides:
//! - `TableBoundaryDetector`, which grows a seed range to the contiguous
//!   non-blank table around it
//! - Grid builders for tests and benchmarks
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on sheet-intent-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod testing;

// Re-export commonly used types
pub use boundary::TableBoundaryDetector;
