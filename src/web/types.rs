// src/web/types.rs
//! Request forms, response envelopes, and view models for the web API.

use crate::error::PipelineError;
use crate::parser::ContactInfo;
use crate::pipeline::AnalysisOutcome;
use crate::presenter::{pct, render_html};
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};
use tokio::sync::RwLock;

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub resume: TempFile<'f>,
    pub location: Option<String>,
    pub top: Option<usize>,
    pub source: Option<String>,
}

/// The last computed ranking, rendered as CSV and shared across requests.
pub struct CsvExport {
    pub data: Vec<u8>,
    pub filename: String,
}

impl CsvExport {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            filename: format!(
                "job_recommendations_{}.csv",
                chrono::Utc::now().format("%Y%m%d_%H%M%S")
            ),
        }
    }
}

#[derive(Default)]
pub struct CsvStore {
    pub export: RwLock<Option<CsvExport>>,
}

/// Streams a CSV attachment.
pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&PipelineError> for StandardErrorResponse {
    fn from(error: &PipelineError) -> Self {
        Self::new(
            error.to_string(),
            error.error_code().to_string(),
            error.suggestions(),
        )
    }
}

// View models returned by the analyze endpoint.

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DomainScoreView {
    pub domain: String,
    pub score_pct: f64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RankedJobView {
    pub title: String,
    pub company: String,
    pub location: String,
    pub source: String,
    pub base_pct: f64,
    pub boost_pct: f64,
    pub final_pct: f64,
    pub apply_link: String,
    pub description_preview: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalysisData {
    pub primary_domain: String,
    pub subdomain: String,
    pub confidence_pct: f64,
    pub top_domains: Vec<DomainScoreView>,
    pub matched_keywords: Vec<String>,
    pub query: String,
    pub location: String,
    pub contact: ContactInfo,
    pub detected_sections: Vec<String>,
    pub jobs_count: usize,
    pub no_results: bool,
    pub jobs: Vec<RankedJobView>,
    pub html_fragment: String,
}

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

impl AnalysisData {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let profile = &outcome.profile;
        Self {
            primary_domain: profile.primary.label().to_string(),
            subdomain: profile.subdomain.clone(),
            confidence_pct: pct(profile.confidence()),
            top_domains: profile
                .top_domains(3)
                .into_iter()
                .map(|(domain, score)| DomainScoreView {
                    domain: domain.label().to_string(),
                    score_pct: pct(score),
                })
                .collect(),
            matched_keywords: profile
                .matched_keywords
                .iter()
                .map(|hit| hit.term.clone())
                .collect(),
            query: outcome.query.to_query_string(),
            location: outcome.query.location.clone(),
            contact: outcome.summary.contact.clone(),
            detected_sections: outcome.summary.detected_sections.clone(),
            jobs_count: outcome.jobs.len(),
            no_results: outcome.no_results,
            jobs: outcome
                .jobs
                .iter()
                .map(|ranked| RankedJobView {
                    title: ranked.job.title.clone(),
                    company: ranked.job.company.clone(),
                    location: ranked.job.location.clone(),
                    source: ranked.job.source.clone(),
                    base_pct: pct(ranked.base_similarity),
                    boost_pct: pct(ranked.domain_boost),
                    final_pct: pct(ranked.display_score()),
                    apply_link: ranked.job.apply_link.clone(),
                    description_preview: preview(&ranked.job.description),
                })
                .collect(),
            html_fragment: render_html(outcome),
        }
    }
}

fn preview(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        description.to_string()
    } else {
        let cut: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}
