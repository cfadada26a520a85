use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::models::MessageResponse;
use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "Resume ATS service is running!";

/// Liveness message on `/`
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new(LIVENESS_MESSAGE))
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let pdf_service = state.extractor.is_available();
    let llm_service = state.generator.is_configured();
    let metrics = state.limiter.metrics();

    let status = if pdf_service && llm_service {
        "healthy"
    } else {
        "degraded"
    };

    let response = json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "pdf_processor": pdf_service,
            "llm": llm_service
        },
        "rate_limiting": {
            "total_requests": metrics.total_requests,
            "rejected_requests": metrics.rejected_requests,
            "available_permits": metrics.available_permits
        }
    });

    info!(
        status = status,
        pdf_available = pdf_service,
        llm_configured = llm_service,
        "Health check completed"
    );

    Json(response)
}

/// Readiness check endpoint
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if state.extractor.is_available() && state.generator.is_configured() {
        StatusCode::OK
    } else {
        info!("Readiness check failed - a backing service is unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
