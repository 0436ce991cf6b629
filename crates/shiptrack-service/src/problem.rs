//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details
//! standard. See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use shiptrack_lib::Error as StoreError;

/// Problem type URI for shipments that do not exist.
pub const PROBLEM_SHIPMENT_NOT_FOUND: &str = "/problems/shipment-not-found";

/// Problem type URI for invalid request payloads.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for tracking number collisions.
pub const PROBLEM_DUPLICATE_TRACKING_NUMBER: &str = "/problems/duplicate-tracking-number";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for a missing shipment.
    pub fn shipment_not_found(id: i64, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SHIPMENT_NOT_FOUND,
            "Shipment Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No shipment exists with id {id}"))
        .with_request_id(request_id)
    }

    /// Create a 409 Conflict problem for a tracking number collision.
    pub fn duplicate_tracking_number(
        tracking_number: &str,
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(
            PROBLEM_DUPLICATE_TRACKING_NUMBER,
            "Duplicate Tracking Number",
            StatusCode::CONFLICT,
        )
        .with_detail(format!(
            "A shipment with tracking number '{tracking_number}' already exists"
        ))
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert store-layer errors to ProblemDetails.
///
/// The `request_id` must be provided separately since store errors don't
/// carry one.
pub fn from_store_error(error: &StoreError, request_id: &str) -> ProblemDetails {
    match error {
        StoreError::NotFound { id } => ProblemDetails::shipment_not_found(*id, request_id),
        StoreError::Validation { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        StoreError::DuplicateTrackingNumber { tracking_number } => {
            ProblemDetails::duplicate_tracking_number(tracking_number, request_id)
        }
        StoreError::Sqlite(_) => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
