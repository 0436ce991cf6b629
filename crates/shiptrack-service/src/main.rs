//! Shipment tracking HTTP service binary.
//!
//! # Configuration
//!
//! - `SHIPTRACK_DB_PATH` - Path to the SQLite database file (default: shiptrack.db)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::env;
use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use shiptrack_service::{init_logging, router, AppState, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config);

    // Load configuration from environment
    let db_path = env::var("SHIPTRACK_DB_PATH").unwrap_or_else(|_| "shiptrack.db".to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %db_path, port = port, "starting shiptrack service");

    // Open the store; this also ensures the schema exists before the first
    // request is served.
    let state = AppState::open(&db_path).map_err(|e| {
        error!(error = %e, path = %db_path, "failed to open shipment store");
        e
    })?;

    // Build the router. CORS is wide open: the API serves browser frontends
    // from arbitrary origins and carries no credentials.
    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
