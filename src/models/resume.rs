use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FULL_NAME: &str = "Full Name";
pub const DATE_OF_BIRTH: &str = "Date of Birth";
pub const EMAIL: &str = "Email";
pub const PHONE_NUMBER: &str = "Phone Number";
pub const SKILLS: &str = "Skills";
pub const WORK_EXPERIENCE: &str = "Work Experience";
pub const EDUCATION: &str = "Education";
pub const CERTIFICATIONS: &str = "Certifications";
pub const PROJECT_NAME: &str = "Project Name";

pub const JOB_TITLE: &str = "Job Title";
pub const DEGREE: &str = "Degree";

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response from LLM";

/// Structured résumé fields as returned by the LLM.
///
/// The parsed form is not schema-checked: any subset or superset of fields
/// may be present with any types. Consumers must read it defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeDetails {
    Unparsed { error: String, raw_response: String },
    Parsed(Value),
}

impl ResumeDetails {
    pub fn unparsed(raw_response: impl Into<String>) -> Self {
        ResumeDetails::Unparsed {
            error: INVALID_JSON_MESSAGE.to_string(),
            raw_response: raw_response.into(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ResumeDetails::Parsed(_))
    }

    /// Looks up a top-level field. Always `None` for the unparsed form.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            ResumeDetails::Parsed(value) => value.get(name),
            ResumeDetails::Unparsed { .. } => None,
        }
    }
}
