//! Public-facing web server.
//!
//! Serves the operational HTTP surface next to the bot:
//! `/health`, `/` (service banner), `/logs` (bearer-token gated) and
//! `POST /api/verify` for verification-id lookups.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::config;
use crate::storage::db::{log_by_verification_id, recent_logs, DbPool};
use crate::storage::get_connection;

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    db: Arc<DbPool>,
}

/// Builds the router. Production and tests serve the same tree.
pub fn router(db: Arc<DbPool>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/logs", get(logs_handler))
        .route("/api/verify", post(verify_handler))
        .with_state(WebState { db })
}

/// Start the public web server.
pub async fn start_web_server(port: u16, db: Arc<DbPool>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(db);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /health      - Health check");
    log::info!("  /logs        - Recent calculation logs (bearer token)");
    log::info!("  /api/verify  - Verification id lookup");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /: service banner.
async fn index_handler() -> impl IntoResponse {
    (StatusCode::OK, format!("gpabot v{} is running", env!("CARGO_PKG_VERSION")))
}

/// GET /health: simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Checks the Authorization header against the admin identifier.
fn bearer_is_admin(headers: &HeaderMap) -> bool {
    let admin_id = *config::admin::ADMIN_USER_ID;
    if admin_id == 0 {
        return false;
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == admin_id.to_string())
        .unwrap_or(false)
}

/// GET /logs: recent calculation records as JSON, admin token required.
async fn logs_handler(State(state): State<WebState>, headers: HeaderMap) -> Response {
    if !bearer_is_admin(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response();
    }

    let Ok(conn) = get_connection(&state.db) else {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "database unavailable"}))).into_response();
    };

    match recent_logs(&conn, 50) {
        Ok(records) => Json(json!({ "logs": records })).into_response(),
        Err(e) => {
            log::error!("Failed to read logs: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "query failed"}))).into_response()
        }
    }
}

#[derive(Deserialize)]
struct VerifyRequest {
    verification_id: String,
}

/// POST /api/verify: looks up a record by verification id.
///
/// Unknown ids return `{"valid": false}` with 200.
async fn verify_handler(State(state): State<WebState>, Json(req): Json<VerifyRequest>) -> Response {
    let Ok(conn) = get_connection(&state.db) else {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "database unavailable"}))).into_response();
    };

    match log_by_verification_id(&conn, &req.verification_id) {
        Ok(Some(record)) => Json(json!({
            "valid": true,
            "gpa": record.gpa,
            "kind": record.kind,
            "date": record.timestamp,
            "breakdown": record.breakdown,
        }))
        .into_response(),
        Ok(None) => Json(json!({ "valid": false })).into_response(),
        Err(e) => {
            log::error!("Verification lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "query failed"}))).into_response()
        }
    }
}
