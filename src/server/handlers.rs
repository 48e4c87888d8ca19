//! HTTP route handlers
//!
//! This module provides HTTP route handler functions.

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::warn;

/// Health check endpoint handler
///
/// Reports 503 when the file storage backend fails its own check.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let backend = state.files.backend_name();
    let storage_ok = match state.files.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!("File storage health check failed: {}", e);
            false
        }
    };

    let body = json!({
        "status": if storage_ok { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "backend": backend,
            "healthy": storage_ok,
        }
    });

    if storage_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
