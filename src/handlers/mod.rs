pub mod files;
pub mod health;
pub mod upload;

pub use files::*;
pub use health::*;
pub use upload::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{logging_middleware, rate_limit_middleware};
use crate::state::AppState;

// Headroom for the multipart framing and the custom_prompt field.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Builds the application router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/upload-resume/", post(upload_resume_handler))
        .route("/files/:filename", get(get_file_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        .with_state(state)
}
