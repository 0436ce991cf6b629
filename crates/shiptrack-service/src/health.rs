//! Liveness check handler.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Fixed liveness payload: `{"status":"ok"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// The healthy status.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// `GET /health` returns a constant liveness signal and never fails.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::ok()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
