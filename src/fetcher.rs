// src/fetcher.rs
//! Job posting retrieval from the SerpApi Google Jobs endpoint.
//!
//! The search backend is an injected capability so the pipeline can run
//! against deterministic stand-ins in tests. Exactly one outbound call per
//! search; the pipeline decides whether to re-query.

use crate::error::{PipelineError, Result};
use crate::query::SearchQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SERPAPI_BASE_URL: &str = "https://serpapi.com/search";

/// One normalized job posting, fields verbatim from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub source: String,
}

/// Capability: run one search against the external job-search provider.
#[async_trait]
pub trait JobSearchClient: Send + Sync {
    /// Fetch up to `limit` postings. Zero postings is `Ok(empty)`, not an
    /// error; the caller tags that case.
    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<Vec<JobRecord>>;
}

/// Production client for the SerpApi Google Jobs engine.
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                PipelineError::ApiUnavailable(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: SERPAPI_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl JobSearchClient for SerpApiClient {
    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<Vec<JobRecord>> {
        let q = query.to_query_string();
        info!("Fetching jobs for query: {}", q);

        let mut params = vec![
            ("engine", "google_jobs".to_string()),
            ("q", q),
            ("api_key", self.api_key.clone()),
        ];
        if !query.location.is_empty() {
            params.push(("location", query.location.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::ApiUnavailable("request timed out".to_string())
                } else {
                    PipelineError::ApiUnavailable(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PipelineError::ApiUnavailable(format!("failed to read response body: {}", e))
        })?;

        match status.as_u16() {
            200 => {}
            401 | 403 => return Err(PipelineError::ApiAuthError(truncate(&body))),
            429 => return Err(PipelineError::ApiQuotaExceeded(truncate(&body))),
            code => {
                return Err(PipelineError::ApiUnavailable(format!(
                    "HTTP {}: {}",
                    code,
                    truncate(&body)
                )))
            }
        }

        let payload: SerpApiResponse = serde_json::from_str(&body).map_err(|e| {
            PipelineError::ApiUnavailable(format!("unexpected response format: {}", e))
        })?;

        // SerpApi reports some failures inside a 200 body.
        if let Some(message) = payload.error {
            return Err(classify_api_error(&message));
        }

        let jobs: Vec<JobRecord> = payload
            .jobs_results
            .into_iter()
            .take(limit)
            .map(JobRecord::from)
            .collect();

        info!("Fetched {} jobs", jobs.len());
        if jobs.is_empty() {
            warn!("Query returned no postings");
        }
        Ok(jobs)
    }
}

/// Keep only postings whose source names the wanted provider.
pub fn filter_by_source(jobs: Vec<JobRecord>, source: &str) -> Vec<JobRecord> {
    let needle = source.to_lowercase();
    jobs.into_iter()
        .filter(|job| job.source.to_lowercase().contains(&needle))
        .collect()
}

fn classify_api_error(message: &str) -> PipelineError {
    let lower = message.to_lowercase();
    if lower.contains("api key") || lower.contains("api_key") || lower.contains("unauthorized") {
        PipelineError::ApiAuthError(message.to_string())
    } else if lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("run out of searches")
    {
        PipelineError::ApiQuotaExceeded(message.to_string())
    } else {
        PipelineError::ApiUnavailable(message.to_string())
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    jobs_results: Vec<SerpApiJob>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SerpApiJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    via: String,
    #[serde(default)]
    share_link: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    apply_options: Vec<ApplyOption>,
}

#[derive(Debug, Default, Deserialize)]
struct ApplyOption {
    #[serde(default)]
    link: String,
}

impl From<SerpApiJob> for JobRecord {
    fn from(job: SerpApiJob) -> Self {
        let apply_link = job
            .share_link
            .filter(|l| !l.is_empty())
            .or(job.link.filter(|l| !l.is_empty()))
            .or_else(|| job.apply_options.into_iter().map(|o| o.link).next())
            .unwrap_or_default();

        Self {
            title: job.title,
            company: job.company_name,
            location: job.location,
            description: job.description,
            apply_link,
            source: job.via,
        }
    }
}
