pub mod answerer;
pub mod ats_scorer;
pub mod llm_client;
pub mod pdf_processor;
pub mod resume_extractor;
pub mod storage;

pub use ats_scorer::{calculate_ats_score, score_breakdown, ScoreBreakdown};
pub use llm_client::{GeminiClient, LlmError, TextGenerator};
pub use pdf_processor::{ExtractionResult, PdfProcessor, TextExtractor};
pub use storage::FileStorage;
