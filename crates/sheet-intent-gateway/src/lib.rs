//! # sheet-intent-gateway
//!
//! Remote service calls for the sheet-intent add-on.
//!
//! This crate provides:
//! - `HttpTransport`, the seam every request goes through, and its
//!   `reqwest` implementation
//! - `QueryGateway`, which posts a query descriptor and normalizes the reply
//!   into a `QueryResult`
//! - `DateDetectionClient`, which asks the date service to classify columns
//! - Response envelope validation with typed contract errors
//!
//! Every call is a single attempt with no retry. Failures never escape as
//! errors: a query fails into the uniform failure result and a date
//! detection fails into an empty profile.
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on sheet-intent-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dates;
pub mod envelope;
pub mod gateway;
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use dates::DateDetectionClient;
pub use envelope::{check_json_validity, validate_envelope, ContractError};
pub use gateway::QueryGateway;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
