//! End-to-end pipeline tests with deterministic stand-ins for the job
//! search provider and the similarity scorer.

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use job_recommender::classifier::{Dictionaries, Domain};
use job_recommender::config::AppConfig;
use job_recommender::error::{PipelineError, Result};
use job_recommender::fetcher::{JobRecord, JobSearchClient};
use job_recommender::pipeline::{AnalyzeOptions, Pipeline};
use job_recommender::query::SearchQuery;
use job_recommender::similarity::SimilarityScorer;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn test_config() -> AppConfig {
    AppConfig {
        serpapi_key: Some("test-key".to_string()),
        default_location: "Remote".to_string(),
        default_top: 10,
        max_upload_bytes: 16 * 1024 * 1024,
        request_timeout_secs: 5,
        embedding_url: None,
        embedding_api_key: None,
        embedding_model: "all-minilm".to_string(),
        dictionaries_path: None,
    }
}

fn job(title: &str, description: &str, source: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Berlin".to_string(),
        description: description.to_string(),
        apply_link: format!("https://example.com/{}", title.replace(' ', "-")),
        source: source.to_string(),
    }
}

fn sample_jobs() -> Vec<JobRecord> {
    vec![
        job(
            "Security Analyst",
            "SOC monitoring, SIEM tuning and incident response",
            "via Indeed",
        ),
        job(
            "Backend Python Developer",
            "Django REST APIs, PostgreSQL and microservices",
            "via LinkedIn",
        ),
        job(
            "Accountant",
            "Bookkeeping and financial reporting",
            "via Indeed",
        ),
    ]
}

/// Search stub that records calls and optionally only answers the
/// broadened (location-free) query.
struct StubSearch {
    jobs: Vec<JobRecord>,
    calls: AtomicUsize,
    require_broadened: bool,
}

impl StubSearch {
    fn new(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs,
            calls: AtomicUsize::new(0),
            require_broadened: false,
        }
    }

    fn broadened_only(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs,
            calls: AtomicUsize::new(0),
            require_broadened: true,
        }
    }
}

#[async_trait]
impl JobSearchClient for StubSearch {
    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<Vec<JobRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.require_broadened && !query.location.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.jobs.iter().take(limit).cloned().collect())
    }
}

struct FailingSearch {
    error: fn() -> PipelineError,
}

#[async_trait]
impl JobSearchClient for FailingSearch {
    async fn search(&self, _: &SearchQuery, _: usize) -> Result<Vec<JobRecord>> {
        Err((self.error)())
    }
}

/// Word-overlap similarity, deterministic across runs.
struct OverlapScorer;

#[async_trait]
impl SimilarityScorer for OverlapScorer {
    async fn score(&self, resume_text: &str, job_text: &str) -> AnyResult<f64> {
        let words = |text: &str| -> std::collections::BTreeSet<String> {
            text.to_lowercase()
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                .filter(|w| !w.is_empty())
                .collect()
        };
        let resume = words(resume_text);
        let job = words(job_text);
        if resume.is_empty() || job.is_empty() {
            return Ok(0.0);
        }
        Ok(resume.intersection(&job).count() as f64 / job.len() as f64)
    }
}

const PYTHON_RESUME: &str = "Skilled in Python, Django, REST APIs";

fn pipeline_with(
    fetcher: Arc<dyn JobSearchClient>,
    scorer: Option<Arc<dyn SimilarityScorer>>,
) -> Pipeline {
    Pipeline::new(test_config(), Dictionaries::builtin(), fetcher, scorer)
}

#[tokio::test]
async fn python_resume_ranks_python_job_first() {
    let pipeline = pipeline_with(
        Arc::new(StubSearch::new(sample_jobs())),
        Some(Arc::new(OverlapScorer)),
    );
    let outcome = pipeline
        .analyze_text(PYTHON_RESUME, &AnalyzeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.profile.primary, Domain::SoftwareDevelopment);
    assert!(!outcome.no_results);
    assert_eq!(outcome.jobs[0].job.title, "Backend Python Developer");
    let security_rank = outcome
        .jobs
        .iter()
        .position(|r| r.job.title == "Security Analyst")
        .unwrap();
    assert!(security_rank > 0);
}

#[tokio::test]
async fn reruns_produce_identical_rankings() {
    let run = || async {
        let pipeline = pipeline_with(
            Arc::new(StubSearch::new(sample_jobs())),
            Some(Arc::new(OverlapScorer)),
        );
        pipeline
            .analyze_text(PYTHON_RESUME, &AnalyzeOptions::default())
            .await
            .unwrap()
    };
    let a = run().await;
    let b = run().await;

    let key = |outcome: &job_recommender::pipeline::AnalysisOutcome| -> Vec<(String, String)> {
        outcome
            .jobs
            .iter()
            .map(|r| (r.job.title.clone(), format!("{:.8}", r.final_score)))
            .collect()
    };
    assert_eq!(key(&a), key(&b));
    assert_eq!(a.query, b.query);
    assert_eq!(a.profile.scores, b.profile.scores);
}

#[tokio::test]
async fn empty_first_fetch_triggers_exactly_one_broadened_retry() {
    let stub = Arc::new(StubSearch::broadened_only(sample_jobs()));
    let pipeline = pipeline_with(stub.clone(), None);
    let outcome = pipeline
        .analyze_text(
            PYTHON_RESUME,
            &AnalyzeOptions {
                location: "Berlin".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    assert!(!outcome.no_results);
    assert_eq!(outcome.jobs.len(), 3);
}

#[tokio::test]
async fn zero_results_everywhere_is_not_an_error() {
    let stub = Arc::new(StubSearch::new(Vec::new()));
    let pipeline = pipeline_with(stub.clone(), None);
    let outcome = pipeline
        .analyze_text(
            PYTHON_RESUME,
            &AnalyzeOptions {
                location: "Atlantis".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Located query plus the single broadened retry.
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    assert!(outcome.no_results);
    assert!(outcome.jobs.is_empty());
}

#[tokio::test]
async fn source_filter_keeps_only_matching_postings() {
    let pipeline = pipeline_with(Arc::new(StubSearch::new(sample_jobs())), None);
    let outcome = pipeline
        .analyze_text(
            PYTHON_RESUME,
            &AnalyzeOptions {
                source: Some("linkedin".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.jobs.len(), 1);
    assert_eq!(outcome.jobs[0].job.source, "via LinkedIn");
}

#[tokio::test]
async fn top_limit_truncates_after_sorting() {
    let pipeline = pipeline_with(
        Arc::new(StubSearch::new(sample_jobs())),
        Some(Arc::new(OverlapScorer)),
    );
    let outcome = pipeline
        .analyze_text(
            PYTHON_RESUME,
            &AnalyzeOptions {
                top: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.jobs.len(), 1);
    assert_eq!(outcome.jobs[0].job.title, "Backend Python Developer");
}

#[tokio::test]
async fn auth_failure_aborts_without_ranking() {
    let pipeline = pipeline_with(
        Arc::new(FailingSearch {
            error: || PipelineError::ApiAuthError("invalid key".to_string()),
        }),
        None,
    );
    let err = pipeline
        .analyze_text(PYTHON_RESUME, &AnalyzeOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::ApiAuthError(_)));
}

#[tokio::test]
async fn unavailable_api_surfaces_as_unavailable() {
    let pipeline = pipeline_with(
        Arc::new(FailingSearch {
            error: || PipelineError::ApiUnavailable("timeout".to_string()),
        }),
        None,
    );
    let err = pipeline
        .analyze_text(PYTHON_RESUME, &AnalyzeOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::ApiUnavailable(_)));
}

#[tokio::test]
async fn analyze_file_rejects_exe_before_reading() {
    let pipeline = pipeline_with(Arc::new(StubSearch::new(sample_jobs())), None);
    let err = pipeline
        .analyze_file(
            std::path::Path::new("/no/such/resume.exe"),
            &AnalyzeOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn analyze_file_runs_full_pipeline_on_txt() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "{}", PYTHON_RESUME).unwrap();

    let pipeline = pipeline_with(
        Arc::new(StubSearch::new(sample_jobs())),
        Some(Arc::new(OverlapScorer)),
    );
    let outcome = pipeline
        .analyze_file(file.path(), &AnalyzeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.profile.primary, Domain::SoftwareDevelopment);
    assert_eq!(outcome.jobs[0].job.title, "Backend Python Developer");
    assert_eq!(outcome.summary.text_length, PYTHON_RESUME.len());
}

#[tokio::test]
async fn boost_and_base_stay_in_their_ranges() {
    let pipeline = pipeline_with(
        Arc::new(StubSearch::new(sample_jobs())),
        Some(Arc::new(OverlapScorer)),
    );
    let outcome = pipeline
        .analyze_text(PYTHON_RESUME, &AnalyzeOptions::default())
        .await
        .unwrap();

    for ranked in &outcome.jobs {
        assert!(ranked.base_similarity >= 0.0 && ranked.base_similarity <= 1.0);
        assert!(ranked.domain_boost >= 0.0);
        assert!(ranked.domain_boost <= job_recommender::ranker::DEFAULT_MAX_BOOST);
        assert!((ranked.final_score - ranked.base_similarity - ranked.domain_boost).abs() < 1e-9);
    }
    for pair in outcome.jobs.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
}
