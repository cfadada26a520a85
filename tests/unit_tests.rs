//! Unit tests for individual components

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use resume_ats::{
    config::Config,
    error::AppError,
    models::{ProcessedFile, ResumeDetails, ResumeUpload, UploadResponse},
    services::{
        answerer::{answer_question, build_question_prompt},
        ats_scorer::{calculate_ats_score, score_breakdown, tokenize},
        llm_client::{LlmError, TextGenerator, DETERMINISTIC_TEMPERATURE},
        resume_extractor::{extract_details, parse_details},
        FileStorage, PdfProcessor, TextExtractor,
    },
};
use serde_json::json;
use std::sync::Mutex;

const JOB: &str = "software engineer python machine learning";

fn parsed(value: serde_json::Value) -> ResumeDetails {
    ResumeDetails::Parsed(value)
}

/// Replies with a fixed text and records every prompt it receives.
struct FixedGenerator {
    reply: String,
    calls: Mutex<Vec<(String, f32)>>,
}

impl FixedGenerator {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((prompt.to_string(), temperature));
        Ok(self.reply.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 429,
            message: "quota exhausted".to_string(),
        })
    }
}

fn sample_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

// ---- ATS scorer ----

#[test]
fn test_empty_job_description_scores_zero() {
    let details = parsed(json!({ "Skills": ["python", "rust"] }));
    assert_eq!(calculate_ats_score(&details, ""), 0.0);
    assert_eq!(calculate_ats_score(&details, "   \n\t "), 0.0);
}

#[test]
fn test_matching_skill_scores_full() {
    let details = parsed(json!({ "Skills": ["python"] }));
    assert_eq!(calculate_ats_score(&details, "python engineer"), 100.0);
}

#[test]
fn test_unmatched_skill_scores_zero() {
    let details = parsed(json!({ "Skills": ["java"] }));
    assert_eq!(calculate_ats_score(&details, "python engineer"), 0.0);
}

#[test]
fn test_skills_are_lowercased_before_matching() {
    let details = parsed(json!({ "Skills": ["Python", "PYTHON"] }));
    // Two skill entries each match once: 4 points over 2 keywords.
    assert_eq!(calculate_ats_score(&details, "Python Engineer"), 200.0);
}

#[test]
fn test_multi_word_skill_never_matches_single_tokens() {
    let details = parsed(json!({ "Skills": ["machine learning"] }));
    assert_eq!(calculate_ats_score(&details, JOB), 0.0);
}

#[test]
fn test_duplicate_job_tokens_do_not_amplify_skill() {
    let details = parsed(json!({ "Skills": ["python"] }));
    let breakdown = score_breakdown(&details, "python python");
    assert_eq!(breakdown.skills, 2.0);
    assert_eq!(breakdown.keyword_count, 2);
    assert_eq!(breakdown.percentage(), 100.0);
}

#[test]
fn test_weighted_categories() {
    let details = parsed(json!({
        "Skills": ["python", "docker"],
        "Work Experience": [
            { "Job Title": "Senior Software Engineer", "Company": "Acme" },
            { "Job Title": "Intern" }
        ],
        "Education": [{ "Degree": "BSc Machine Learning" }],
        "Certifications": ["AWS Machine Learning Specialty"]
    }));

    let breakdown = score_breakdown(&details, JOB);
    assert_eq!(breakdown.skills, 2.0);
    assert_eq!(breakdown.experience, 3.0);
    assert_eq!(breakdown.education, 3.0);
    assert_eq!(breakdown.certifications, 3.0);
    assert_eq!(breakdown.keyword_count, 5);
    assert_eq!(breakdown.total(), 11.0);
    assert!((calculate_ats_score(&details, JOB) - 220.0).abs() < 1e-9);
}

#[test]
fn test_missing_fields_contribute_nothing() {
    let details = parsed(json!({ "Full Name": "Jane Doe", "Skills": ["python"] }));
    let breakdown = score_breakdown(&details, JOB);
    assert_eq!(breakdown.experience, 0.0);
    assert_eq!(breakdown.education, 0.0);
    assert_eq!(breakdown.certifications, 0.0);
    assert!((calculate_ats_score(&details, JOB) - 40.0).abs() < 1e-9);
}

#[test]
fn test_unparsed_details_score_zero() {
    let details = ResumeDetails::unparsed("garbage");
    assert_eq!(calculate_ats_score(&details, JOB), 0.0);
}

#[test]
fn test_mistyped_fields_are_ignored() {
    let details = parsed(json!({
        "Skills": "python",
        "Work Experience": ["Software Engineer", { "Job Title": 42 }],
        "Education": { "Degree": "python" },
        "Certifications": [null, 7, "python"]
    }));
    let breakdown = score_breakdown(&details, JOB);
    assert_eq!(breakdown.skills, 0.0);
    assert_eq!(breakdown.experience, 0.0);
    assert_eq!(breakdown.education, 0.0);
    assert_eq!(breakdown.certifications, 1.5);
}

#[test]
fn test_non_object_details_score_zero() {
    assert_eq!(calculate_ats_score(&parsed(json!(["python"])), JOB), 0.0);
    assert_eq!(calculate_ats_score(&parsed(json!(null)), JOB), 0.0);
}

#[test]
fn test_scoring_is_deterministic() {
    let details = parsed(json!({
        "Skills": ["python"],
        "Education": [{ "Degree": "Software Engineering" }]
    }));
    let first = calculate_ats_score(&details, JOB);
    let second = calculate_ats_score(&details, JOB);
    assert_eq!(first, second);
}

#[test]
fn test_tokenize_keeps_duplicates_and_lowercases() {
    assert_eq!(tokenize("Python  python\nML"), vec!["python", "python", "ml"]);
}

// ---- Detail extraction normalizer ----

#[test]
fn test_fenced_reply_is_parsed() {
    let details = parse_details("```json\n{\"Full Name\": \"A\"}\n```");
    assert_eq!(details, parsed(json!({ "Full Name": "A" })));
}

#[test]
fn test_invalid_reply_becomes_error_payload() {
    let details = parse_details("not json");
    assert_eq!(
        serde_json::to_value(&details).unwrap(),
        json!({ "error": "Invalid JSON response from LLM", "raw_response": "not json" })
    );
}

#[test]
fn test_error_payload_keeps_cleaned_text() {
    let details = parse_details("```json\n{\"Full Name\": \n```");
    match details {
        ResumeDetails::Unparsed { raw_response, .. } => assert_eq!(raw_response, "{\"Full Name\":"),
        other => panic!("Expected unparsed details, got {:?}", other),
    }
}

#[test]
fn test_parsed_details_serialize_verbatim() {
    let value = json!({ "Skills": ["rust"], "Extra": { "nested": true } });
    let details = parse_details(&value.to_string());
    assert_eq!(serde_json::to_value(&details).unwrap(), value);
}

#[tokio::test]
async fn test_extract_details_uses_zero_temperature() {
    let generator = FixedGenerator::new("```json\n{\"Email\": \"a@b.c\"}\n```");
    let details = extract_details(&generator, "Resume body").await.unwrap();

    assert_eq!(details.field("Email"), Some(&json!("a@b.c")));
    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, DETERMINISTIC_TEMPERATURE);
    assert!(calls[0].0.contains("Resume body"));
}

#[tokio::test]
async fn test_extract_details_propagates_generation_failure() {
    let result = extract_details(&FailingGenerator, "Resume body").await;
    assert!(matches!(result, Err(LlmError::Api { status: 429, .. })));
}

// ---- Custom question answerer ----

#[tokio::test]
async fn test_answer_is_returned_verbatim() {
    let generator = FixedGenerator::new("```\nnot cleaned\n```  ");
    let answer = answer_question(&generator, "Resume body", "What languages?")
        .await
        .unwrap();
    assert_eq!(answer, "```\nnot cleaned\n```  ");

    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls[0].0, build_question_prompt("Resume body", "What languages?"));
    assert_eq!(calls[0].1, 0.0);
}

#[test]
fn test_question_prompt_embeds_text_and_question() {
    let prompt = build_question_prompt("Jane Doe, Rust", "Is she senior?");
    assert!(prompt.contains("Resume text: Jane Doe, Rust"));
    assert!(prompt.contains("Question: Is she senior?"));
}

// ---- Errors ----

#[test]
fn test_error_codes() {
    assert_eq!(AppError::NotPdf.error_code(), "NOT_PDF");
    assert_eq!(AppError::FileNotFound.error_code(), "FILE_NOT_FOUND");
    assert_eq!(AppError::RateLimitExceeded.error_code(), "RATE_LIMIT_EXCEEDED");
    assert_eq!(AppError::FileTooLarge { size: 20, limit: 10 }.error_code(), "FILE_TOO_LARGE");
    assert_eq!(AppError::Timeout.error_code(), "UPSTREAM_TIMEOUT");
}

#[test]
fn test_error_status_codes() {
    use axum::http::StatusCode;

    assert_eq!(AppError::NotPdf.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::FileNotFound.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::FileTooLarge { size: 20, limit: 10 }.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(AppError::Upstream { message: "x".to_string() }.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(AppError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
}

#[test]
fn test_fixed_error_messages() {
    assert_eq!(AppError::NotPdf.to_string(), "File must be a PDF.");
    assert_eq!(AppError::FileNotFound.to_string(), "File not found.");
    assert_eq!(
        AppError::Upstream { message: "secret detail".to_string() }.public_message(),
        "The language model request failed"
    );
}

#[test]
fn test_error_conversions() {
    let app_error: AppError = LlmError::Timeout.into();
    assert!(matches!(app_error, AppError::Timeout));

    let app_error: AppError = LlmError::EmptyContent.into();
    match app_error {
        AppError::Upstream { message } => assert!(message.contains("empty content")),
        other => panic!("Expected Upstream error, got {:?}", other),
    }

    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let app_error: AppError = io_error.into();
    match app_error {
        AppError::Internal { message } => assert!(message.contains("IO error")),
        other => panic!("Expected Internal error, got {:?}", other),
    }
}

// ---- Config and models ----

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.job_description, "software engineer python machine learning");
    assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
    assert!(config.gemini_api_key.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_rejects_zero_values() {
    let config = Config {
        max_concurrent_requests: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        llm_timeout_seconds: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_debug_redacts_api_key() {
    let config = Config {
        gemini_api_key: Some("super-secret".to_string()),
        ..Config::default()
    };
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_pdf_detection_uses_file_name_suffix() {
    assert!(ProcessedFile::new("cv.pdf".to_string(), vec![]).is_pdf());
    assert!(!ProcessedFile::new("cv.docx".to_string(), b"%PDF-1.5".to_vec()).is_pdf());
    assert!(!ProcessedFile::new("cv.PDF".to_string(), vec![]).is_pdf());
    assert!(!ProcessedFile::new(String::new(), vec![]).is_pdf());
}

#[test]
fn test_empty_custom_prompt_means_no_question() {
    let file = ProcessedFile::new("cv.pdf".to_string(), vec![1]);
    let upload = ResumeUpload { file: file.clone(), custom_prompt: String::new() };
    assert_eq!(upload.question(), None);

    let upload = ResumeUpload { file, custom_prompt: "Skills?".to_string() };
    assert_eq!(upload.question(), Some("Skills?"));
}

#[test]
fn test_upload_response_shape() {
    let response = UploadResponse::new(
        "cv.pdf".to_string(),
        ResumeDetails::unparsed("oops"),
        0.0,
        "No custom prompt provided!".to_string(),
    );
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["filename"], "cv.pdf");
    assert_eq!(value["resume_details"]["error"], "Invalid JSON response from LLM");
    assert_eq!(value["resume_details"]["raw_response"], "oops");
    assert_eq!(value["ats_score"], 0.0);
    assert_eq!(value["custom_answer"], "No custom prompt provided!");
}

// ---- Storage ----

#[test]
fn test_storage_resolves_only_final_component() {
    let storage = FileStorage::new("/srv/uploads");
    assert_eq!(
        storage.resolve("../../etc/passwd.pdf").unwrap(),
        std::path::Path::new("/srv/uploads/passwd.pdf")
    );
    assert_eq!(
        storage.resolve("dir\\cv.pdf").unwrap(),
        std::path::Path::new("/srv/uploads/cv.pdf")
    );
    assert!(storage.resolve("..").is_none());
    assert!(storage.resolve("").is_none());
    assert!(storage.resolve("uploads/").is_none());
}

#[tokio::test]
async fn test_storage_round_trip_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("resumes"));
    storage.init().await.unwrap();

    storage.save("cv.pdf", b"first").await.unwrap();
    storage.save("cv.pdf", b"second").await.unwrap();
    assert_eq!(storage.load("cv.pdf").await.unwrap(), b"second");

    assert!(matches!(storage.load("other.pdf").await, Err(AppError::FileNotFound)));
}

// ---- PDF processing ----

#[test]
fn test_pdf_page_count() {
    let processor = PdfProcessor::default();
    assert_eq!(processor.page_count(&sample_pdf(2)), Some(2));
    assert_eq!(processor.page_count(b"definitely not a pdf"), None);
}

#[tokio::test]
async fn test_pdf_processor_rejects_garbage() {
    let processor = PdfProcessor::new();
    assert!(processor.is_available());
    let result = processor.extract_text(b"definitely not a pdf").await;
    assert!(result.is_err());
}
