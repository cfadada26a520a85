use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    Extension,
};
use std::time::Instant;
use tracing::{info, debug, error};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{ProcessedFile, ResumeUpload, UploadResponse};
use crate::services::answerer::{answer_question, NO_PROMPT_SENTINEL};
use crate::services::ats_scorer::score_breakdown;
use crate::services::resume_extractor::extract_details;
use crate::state::AppState;

/// `POST /upload-resume/`: store the PDF, extract its text, structure it with
/// the LLM, score it and optionally answer the caller's question.
pub async fn upload_resume_handler(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let start = Instant::now();

    info!(request_id = %request_id, "Starting resume upload request");

    let body_size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let upload = read_upload_form(&mut multipart, state.config.max_file_size_mb, body_size).await?;
    let file = &upload.file;

    if !file.is_pdf() {
        return Err(AppError::NotPdf);
    }
    if file.content.is_empty() {
        return Err(AppError::invalid_file("File is empty"));
    }
    let limit = state.config.max_file_size_bytes();
    if file.size > limit {
        return Err(AppError::FileTooLarge {
            size: file.size / (1024 * 1024),
            limit: state.config.max_file_size_mb,
        });
    }

    info!(
        request_id = %request_id,
        file_name = %file.name,
        file_size = file.size,
        mime_type = ?file.mime_type,
        has_question = upload.question().is_some(),
        "Resume received"
    );

    state.storage.save(&file.name, &file.content).await?;

    let extraction = state.extractor.extract_text(&file.content).await.map_err(|e| {
        error!(request_id = %request_id, error = %e, "Text extraction failed");
        e
    })?;
    debug!(
        request_id = %request_id,
        pages = extraction.pages,
        processing_time_ms = extraction.processing_time_ms,
        text_length = extraction.text.len(),
        "Text extracted"
    );

    let details = extract_details(state.generator.as_ref(), &extraction.text)
        .await
        .map_err(|e| {
            error!(request_id = %request_id, error = %e, "Detail extraction failed");
            AppError::from(e)
        })?;

    let breakdown = score_breakdown(&details, &state.config.job_description);
    let ats_score = breakdown.percentage();
    info!(
        request_id = %request_id,
        skills = breakdown.skills,
        experience = breakdown.experience,
        education = breakdown.education,
        certifications = breakdown.certifications,
        keyword_count = breakdown.keyword_count,
        ats_score = ats_score,
        "ATS score computed"
    );

    let custom_answer = match upload.question() {
        Some(question) => answer_question(state.generator.as_ref(), &extraction.text, question)
            .await
            .map_err(|e| {
                error!(request_id = %request_id, error = %e, "Custom question failed");
                AppError::from(e)
            })?,
        None => NO_PROMPT_SENTINEL.to_string(),
    };

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(Json(UploadResponse::new(
        upload.file.name,
        details,
        ats_score,
        custom_answer,
    )))
}

async fn read_upload_form(
    multipart: &mut Multipart,
    limit_mb: usize,
    body_size: Option<usize>,
) -> AppResult<ResumeUpload> {
    let mut file = None;
    let mut custom_prompt = String::new();
    let form_error = |e: MultipartError| multipart_error(e, limit_mb, body_size);

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(form_error)?;

                let mut processed = ProcessedFile::new(file_name, data.to_vec());
                if let Some(mime_type) = content_type {
                    processed = processed.with_mime_type(mime_type);
                }
                file = Some(processed);
            }
            "custom_prompt" => {
                custom_prompt = field.text().await.map_err(form_error)?;
            }
            other => {
                debug!(field = other, "Ignoring unexpected multipart field");
            }
        }
    }

    let file = file.ok_or(AppError::MissingFile)?;
    Ok(ResumeUpload { file, custom_prompt })
}

/// Body-limit rejections surface here as multipart errors and are reported
/// as 413 like any other oversized upload.
fn multipart_error(e: MultipartError, limit_mb: usize, body_size: Option<usize>) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        const MB: usize = 1024 * 1024;
        let size = body_size
            .map(|bytes| (bytes + MB - 1) / MB)
            .unwrap_or(limit_mb + 1);
        AppError::FileTooLarge {
            size,
            limit: limit_mb,
        }
    } else {
        AppError::invalid_file(format!("Failed to read multipart form: {}", e))
    }
}
