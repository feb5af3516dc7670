// src/error.rs
//! Error taxonomy shared by the CLI and the web layer.
//!
//! Input-stage errors (format, extraction, size) and fetch-stage errors
//! (auth, quota, availability) are terminal for the request. A query that
//! yields zero postings is not an error; the pipeline reports it through
//! [`crate::pipeline::AnalysisOutcome::no_results`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported resume format: {0}. Use PDF, DOCX, or TXT")]
    UnsupportedFormat(String),

    #[error("Could not extract text from resume: {0}")]
    ExtractionFailed(String),

    #[error("Resume file is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Job search API rejected the credentials: {0}")]
    ApiAuthError(String),

    #[error("Job search API quota exhausted: {0}")]
    ApiQuotaExceeded(String),

    #[error("Job search API unavailable: {0}")]
    ApiUnavailable(String),
}

impl PipelineError {
    /// Stable machine-readable code surfaced by the web layer.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::ExtractionFailed(_) => "EXTRACTION_FAILED",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::ApiAuthError(_) => "API_AUTH_ERROR",
            Self::ApiQuotaExceeded(_) => "API_QUOTA_EXCEEDED",
            Self::ApiUnavailable(_) => "API_UNAVAILABLE",
        }
    }

    /// Actionable follow-ups shown next to the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedFormat(_) => vec![
                "Upload a PDF file (.pdf)".to_string(),
                "Upload a Word document (.docx)".to_string(),
                "Upload a plain text file (.txt)".to_string(),
            ],
            Self::ExtractionFailed(_) => vec![
                "Ensure the resume contains readable text, not scanned images".to_string(),
                "Try exporting the resume again from your editor".to_string(),
            ],
            Self::FileTooLarge { limit, .. } => vec![
                format!("Reduce the file below {} bytes", limit),
                "Remove embedded images from the document".to_string(),
            ],
            Self::ApiAuthError(_) => vec![
                "Set a valid key in the SERPAPI_API_KEY environment variable".to_string(),
                "Get a free API key from https://serpapi.com".to_string(),
            ],
            Self::ApiQuotaExceeded(_) => vec![
                "Wait for the monthly quota to reset".to_string(),
                "Upgrade the SerpApi plan or use a different key".to_string(),
            ],
            Self::ApiUnavailable(_) => vec![
                "Check the network connection".to_string(),
                "Try again in a few moments".to_string(),
            ],
        }
    }
}
