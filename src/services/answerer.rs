use tracing::info;

use crate::services::llm_client::{LlmError, TextGenerator, DETERMINISTIC_TEMPERATURE};

pub const NO_PROMPT_SENTINEL: &str = "No custom prompt provided!";

pub fn build_question_prompt(resume_text: &str, question: &str) -> String {
    format!(
        "\nResume text: {resume_text}\n\nQuestion: {question}\n\nPlease provide a detailed response based on the resume.\n"
    )
}

/// Answers a free-form question about the résumé. The reply is returned verbatim.
pub async fn answer_question(
    generator: &dyn TextGenerator,
    resume_text: &str,
    question: &str,
) -> Result<String, LlmError> {
    let prompt = build_question_prompt(resume_text, question);
    let answer = generator.generate(&prompt, DETERMINISTIC_TEMPERATURE).await?;
    info!(question_chars = question.len(), answer_chars = answer.len(), "Custom question answered");
    Ok(answer)
}
