//! Attest Web Server
//!
//! Axum-based REST API for the receipt incentive service: receipt image
//! upload, claim submission, and verdict polling. Validation itself lives
//! in attest-core; this crate wires the claim store, image storage, and
//! the OCR client together and runs each analysis as a background task.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use attest_core::chain::ValidationConfig;
use attest_core::db::Database;
use attest_core::ocr::OcrClient;
use attest_core::storage::ReceiptStorage;

mod handlers;
mod tasks;


/// Maximum receipt image upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Receipt image store the analysis task reads back from
    pub storage: Box<dyn ReceiptStorage>,
    /// OCR client; absent in offline deployments, where analysis resolves
    /// every claim as unprocessable
    pub ocr: Option<OcrClient>,
    /// Gate configuration handed to the validation chain
    pub config: ValidationConfig,
    /// Allowed CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(origins)
}

/// Build the API router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/api/v1/claims/upload", post(handlers::claims::upload))
        .route("/api/v1/claims/complete", post(handlers::claims::complete))
        .route("/api/v1/claims/:id/status", get(handlers::claims::status))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("attest server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return a generic message to the client
            message: "An internal error occurred".to_string(),
            // Keep the full error for logging
            internal: Some(err.into()),
        }
    }
}
