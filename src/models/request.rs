#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub name: String,
    pub size: usize,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

impl ProcessedFile {
    pub fn new(name: String, content: Vec<u8>) -> Self {
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Upload acceptance is decided by the file name alone, matching `.pdf` exactly.
    pub fn is_pdf(&self) -> bool {
        self.name.ends_with(".pdf")
    }
}

/// Fields of the `/upload-resume/` multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file: ProcessedFile,
    pub custom_prompt: String,
}

impl ResumeUpload {
    /// The question to forward to the LLM, if one was supplied.
    pub fn question(&self) -> Option<&str> {
        if self.custom_prompt.is_empty() {
            None
        } else {
            Some(&self.custom_prompt)
        }
    }
}
