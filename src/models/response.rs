use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDetails;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub resume_details: ResumeDetails,
    pub ats_score: f64,
    pub custom_answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl UploadResponse {
    pub fn new(
        filename: String,
        resume_details: ResumeDetails,
        ats_score: f64,
        custom_answer: String,
    ) -> Self {
        Self {
            filename,
            resume_details,
            ats_score,
            custom_answer,
        }
    }
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
