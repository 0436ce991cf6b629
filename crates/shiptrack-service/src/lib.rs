//! Shipment tracking HTTP service.
//!
//! This crate provides the REST surface over the shiptrack record store:
//!
//! - [`router`]: the axum router carrying the whole request/response contract
//! - [`AppState`]: the shared store handle passed to every handler
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent errors
//! - [`logging`]: structured JSON/text logging setup
//!
//! # Endpoints
//!
//! - `GET /shipments?limit=&offset=` - Paginated list, newest first
//! - `POST /shipments` - Create a shipment
//! - `GET /shipments/{id}` - Fetch one shipment
//! - `PUT /shipments/{id}` - Sparse update of one shipment
//! - `DELETE /shipments/{id}` - Permanently remove one shipment
//! - `GET /health` - Liveness probe
//!
//! The handlers are thin: field validation, partial-update semantics, and
//! the uniqueness constraint all live in `shiptrack-lib`; this crate only
//! translates domain outcomes into HTTP responses.

#![deny(warnings)]

mod handlers;
mod health;
pub mod logging;
mod problem;
mod state;

pub use handlers::{router, ListParams, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT};
pub use health::{health, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use problem::{
    from_store_error, ProblemDetails, PROBLEM_DUPLICATE_TRACKING_NUMBER, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_SHIPMENT_NOT_FOUND,
};
pub use state::AppState;
