use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::resume::ResumeDetails;
use crate::services::llm_client::{LlmError, TextGenerator, DETERMINISTIC_TEMPERATURE};

/// Builds the structured-extraction prompt for a résumé.
pub fn build_extraction_prompt(resume_text: &str) -> String {
    format!(
        r#"
Extract the following information from the resume text below and return it as a clean JSON object with key-value pairs:

1. Full Name
2. Date of Birth (Optional)
3. Email
4. Phone Number
5. Skills
6. Work Experience
7. Education
8. Certifications
9. Project Name (Optional)
Resume text:

{resume_text}
"#
    )
}

/// Removes a leading ```` ```lang ```` fence and a trailing ```` ``` ```` fence,
/// then trims surrounding whitespace.
pub fn strip_code_fences(reply: &str) -> &str {
    let text = reply.trim();
    let text = match text.strip_prefix("```") {
        Some(rest) => match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            _ => rest,
        },
        None => text,
    };
    let text = text.trim_end();
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn is_language_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}

/// Parses an LLM reply into [`ResumeDetails`]. Never fails: an unparsable
/// reply becomes the unparsed form carrying the cleaned text.
pub fn parse_details(reply: &str) -> ResumeDetails {
    let cleaned = strip_code_fences(reply);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => ResumeDetails::Parsed(value),
        Err(e) => {
            warn!(error = %e, reply_chars = cleaned.len(), "LLM reply is not valid JSON");
            ResumeDetails::unparsed(cleaned)
        }
    }
}

/// Asks the LLM to structure the résumé text. Only generation failures are
/// returned as errors; malformed replies are folded into the result.
pub async fn extract_details(
    generator: &dyn TextGenerator,
    resume_text: &str,
) -> Result<ResumeDetails, LlmError> {
    let start = Instant::now();
    let prompt = build_extraction_prompt(resume_text);
    debug!(prompt_chars = prompt.len(), "Requesting resume detail extraction");

    let reply = generator.generate(&prompt, DETERMINISTIC_TEMPERATURE).await?;
    let details = parse_details(&reply);

    info!(
        parsed = details.is_parsed(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Resume detail extraction finished"
    );
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn strips_bare_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("not json"), "not json");
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn prompt_lists_every_field_and_embeds_text() {
        let prompt = build_extraction_prompt("Jane Doe\nRust developer");
        for field in [
            "Full Name",
            "Date of Birth",
            "Email",
            "Phone Number",
            "Skills",
            "Work Experience",
            "Education",
            "Certifications",
            "Project Name",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("JSON object"));
        assert!(prompt.ends_with("Jane Doe\nRust developer\n"));
    }
}
