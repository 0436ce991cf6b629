//! Request handlers for the shipment API.
//!
//! Each handler parses a typed payload, dispatches one store operation, and
//! maps the outcome (or its absence) to a response. Out-of-range list
//! parameters are silently clamped; every other invalid input is rejected
//! before it can reach storage.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use shiptrack_lib::{NewShipment, Shipment, ShipmentPage, ShipmentPatch};

use crate::health::health;
use crate::problem::{from_store_error, ProblemDetails};
use crate::state::AppState;

/// Smallest accepted page size.
pub const MIN_PAGE_LIMIT: i64 = 1;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Build the service router over the given state.
///
/// Transport-level layers (CORS, request tracing) are added by the binary;
/// the routes themselves carry the whole request/response contract.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/shipments", get(list_shipments).post(create_shipment))
        .route(
            "/shipments/{id}",
            get(get_shipment).put(update_shipment).delete(delete_shipment),
        )
        .route("/health", get(health))
        .with_state(state)
}

/// Pagination query parameters for `GET /shipments`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl ListParams {
    /// Clamp out-of-range values to the nearest bound instead of rejecting.
    fn clamped(self) -> (i64, i64) {
        (
            self.limit.clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT),
            self.offset.max(0),
        )
    }
}

/// Handle `GET /shipments`.
async fn list_shipments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ShipmentPage>, ProblemDetails> {
    let request_id = generate_request_id();
    let (limit, offset) = params.clamped();

    let page = state
        .store()
        .page(limit, offset)
        .map_err(|e| from_store_error(&e, &request_id))?;

    info!(
        request_id = %request_id,
        limit,
        offset,
        total = page.total,
        returned = page.items.len(),
        "listed shipments"
    );

    Ok(Json(page))
}

/// Handle `POST /shipments`.
async fn create_shipment(
    State(state): State<AppState>,
    Json(payload): Json<NewShipment>,
) -> Result<(StatusCode, Json<Shipment>), ProblemDetails> {
    let request_id = generate_request_id();

    let created = state
        .store()
        .insert(&payload)
        .map_err(|e| from_store_error(&e, &request_id))?;

    info!(
        request_id = %request_id,
        id = created.id,
        tracking_number = %created.tracking_number,
        "shipment created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handle `GET /shipments/{id}`.
async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Shipment>, ProblemDetails> {
    let request_id = generate_request_id();

    let shipment = state
        .store()
        .get(id)
        .map_err(|e| from_store_error(&e, &request_id))?;

    Ok(Json(shipment))
}

/// Handle `PUT /shipments/{id}`.
///
/// Sparse update: only fields present in the payload are applied, and the
/// resulting record is validated before anything is written.
async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ShipmentPatch>,
) -> Result<Json<Shipment>, ProblemDetails> {
    let request_id = generate_request_id();

    let updated = state
        .store()
        .update(id, &patch)
        .map_err(|e| from_store_error(&e, &request_id))?;

    info!(request_id = %request_id, id, "shipment updated");

    Ok(Json(updated))
}

/// Handle `DELETE /shipments/{id}`.
async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ProblemDetails> {
    let request_id = generate_request_id();

    state
        .store()
        .delete(id)
        .map_err(|e| from_store_error(&e, &request_id))?;

    info!(request_id = %request_id, id, "shipment deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req-{timestamp:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: i64, offset: i64) -> ListParams {
        ListParams { limit, offset }
    }

    #[test]
    fn test_clamping_bounds() {
        assert_eq!(params(0, 0).clamped(), (1, 0));
        assert_eq!(params(1000, 0).clamped(), (100, 0));
        assert_eq!(params(10, -5).clamped(), (10, 0));
        assert_eq!(params(50, 20).clamped(), (50, 20));
    }

    #[test]
    fn test_list_params_defaults() {
        let p: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(p.offset, 0);
    }
}
