use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;

/// `GET /files/{filename}`: return a previously uploaded PDF.
pub async fn get_file_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let bytes = state.storage.load(&filename).await?;
    info!(file_name = %filename, bytes = bytes.len(), "Serving stored file");
    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response())
}
