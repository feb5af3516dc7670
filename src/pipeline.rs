// src/pipeline.rs
//! End-to-end orchestration of one resume analysis.
//!
//! Extract -> classify -> build query -> fetch -> rank. The pipeline is
//! immutable after construction and safe to share across requests; all
//! per-request data stays inside the single `analyze` call.

use crate::classifier::{Classifier, Dictionaries, DomainProfile};
use crate::config::AppConfig;
use crate::error::Result;
use crate::extractor::extract_resume_text;
use crate::fetcher::{filter_by_source, JobRecord, JobSearchClient};
use crate::parser::{summarize_resume, ResumeSummary};
use crate::query::{build_query, SearchQuery};
use crate::ranker::{RankedJob, Ranker};
use crate::similarity::SimilarityScorer;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Postings requested from the provider before ranking trims to top-K.
const FETCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Preferred job location; empty means the configured default.
    pub location: String,
    /// Ranked results to keep; `None` means the configured default.
    pub top: Option<usize>,
    /// Keep only postings whose source names this provider.
    pub source: Option<String>,
}

/// Everything one analysis produced, handed to the presenters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub profile: DomainProfile,
    pub query: SearchQuery,
    pub jobs: Vec<RankedJob>,
    /// True when the provider had zero postings even after the broadened
    /// retry (or after source filtering). Not an error.
    pub no_results: bool,
    pub fetched_count: usize,
    pub summary: ResumeSummary,
}

pub struct Pipeline {
    config: AppConfig,
    dictionaries: Dictionaries,
    fetcher: Arc<dyn JobSearchClient>,
    scorer: Option<Arc<dyn SimilarityScorer>>,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        dictionaries: Dictionaries,
        fetcher: Arc<dyn JobSearchClient>,
        scorer: Option<Arc<dyn SimilarityScorer>>,
    ) -> Self {
        Self {
            config,
            dictionaries,
            fetcher,
            scorer,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full pipeline on a resume file.
    pub async fn analyze_file(&self, path: &Path, options: &AnalyzeOptions) -> Result<AnalysisOutcome> {
        let resume_text = extract_resume_text(path, self.config.max_upload_bytes).await?;
        self.analyze_text(&resume_text, options).await
    }

    /// Run the pipeline on already-extracted resume text.
    pub async fn analyze_text(
        &self,
        resume_text: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisOutcome> {
        let summary = summarize_resume(resume_text);

        let profile = Classifier::new(&self.dictionaries).classify(resume_text);
        info!(
            "Classified resume as {} / {} ({:.1}% confidence)",
            profile.primary.label(),
            profile.subdomain,
            profile.confidence() * 100.0
        );

        let query = build_query(&profile, &options.location, &self.config.default_location);
        info!("Search query: {}", query.to_query_string());

        let mut jobs = self.fetcher.search(&query, FETCH_LIMIT).await?;

        // One broadened retry without the location when nothing came back.
        if jobs.is_empty() && !query.location.is_empty() {
            info!("No postings for the located query, retrying without location");
            jobs = self.fetcher.search(&query.broadened(), FETCH_LIMIT).await?;
        }

        if let Some(source) = options.source.as_deref().filter(|s| !s.trim().is_empty()) {
            let before = jobs.len();
            jobs = filter_by_source(jobs, source);
            info!("Source filter '{}' kept {} / {} jobs", source, jobs.len(), before);
        }

        let fetched_count = jobs.len();
        let top = options.top.unwrap_or(self.config.default_top);
        let ranked = self.rank(resume_text, jobs, &profile, top).await;
        let no_results = ranked.is_empty();

        Ok(AnalysisOutcome {
            profile,
            query,
            jobs: ranked,
            no_results,
            fetched_count,
            summary,
        })
    }

    async fn rank(
        &self,
        resume_text: &str,
        jobs: Vec<JobRecord>,
        profile: &DomainProfile,
        top: usize,
    ) -> Vec<RankedJob> {
        Ranker::new(&self.dictionaries)
            .rank(
                resume_text,
                jobs,
                profile,
                self.scorer.as_deref(),
                top,
            )
            .await
    }
}
