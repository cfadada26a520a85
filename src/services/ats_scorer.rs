//! Keyword-overlap ATS score.
//!
//! Skills score 2 points when a lowercased skill equals one of the job
//! description tokens. Job titles, degrees and certifications are tokenised
//! on whitespace and score 1.5 points per matching token. The percentage is
//! `total / keyword_count * 100` and is not clamped, so it can exceed 100.
//! Matching is exact token equality: `"machine learning"` as a skill never
//! matches the separate tokens `machine` and `learning`.

use serde::Serialize;
use serde_json::Value;

use crate::models::resume::{
    ResumeDetails, CERTIFICATIONS, DEGREE, EDUCATION, JOB_TITLE, SKILLS, WORK_EXPERIENCE,
};

const SKILL_POINTS: f64 = 2.0;
const TOKEN_POINTS: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub certifications: f64,
    pub keyword_count: usize,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.education + self.certifications
    }

    pub fn percentage(&self) -> f64 {
        if self.keyword_count == 0 {
            return 0.0;
        }
        self.total() / self.keyword_count as f64 * 100.0
    }
}

/// Lowercased whitespace tokens of the job description, duplicates kept.
pub fn tokenize(job_description: &str) -> Vec<String> {
    job_description
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn score_breakdown(details: &ResumeDetails, job_description: &str) -> ScoreBreakdown {
    let keywords = tokenize(job_description);
    let is_keyword = |word: &str| keywords.iter().any(|k| k == word);

    let skills = string_items(details.field(SKILLS))
        .map(str::to_lowercase)
        .filter(|skill| is_keyword(skill))
        .count() as f64
        * SKILL_POINTS;

    let experience_text = join_lowercase(entry_values(details.field(WORK_EXPERIENCE), JOB_TITLE));
    let education_text = join_lowercase(entry_values(details.field(EDUCATION), DEGREE));
    let certifications_text = join_lowercase(string_items(details.field(CERTIFICATIONS)));

    let token_score = |text: &str| {
        text.split_whitespace().filter(|word| is_keyword(word)).count() as f64 * TOKEN_POINTS
    };

    ScoreBreakdown {
        skills,
        experience: token_score(&experience_text),
        education: token_score(&education_text),
        certifications: token_score(&certifications_text),
        keyword_count: keywords.len(),
    }
}

/// Match percentage of the résumé against the job description; 0 when the
/// description has no tokens.
pub fn calculate_ats_score(details: &ResumeDetails, job_description: &str) -> f64 {
    score_breakdown(details, job_description).percentage()
}

/// String elements of an array field. Anything else yields nothing.
fn string_items(field: Option<&Value>) -> impl Iterator<Item = &str> {
    field
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// `key` of every object entry in an array field. Entries without a string
/// value contribute an empty string.
fn entry_values<'a>(field: Option<&'a Value>, key: &'a str) -> impl Iterator<Item = &'a str> {
    field
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(move |entry| entry.get(key).and_then(Value::as_str).unwrap_or(""))
}

fn join_lowercase<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ").to_lowercase()
}
