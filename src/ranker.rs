// src/ranker.rs
//! Domain-aware ranking of fetched job postings.
//!
//! Each job gets a base semantic similarity from the injected scorer plus
//! an additive boost for domain-specific terms in its title and
//! description. The boost is capped so it can sharpen but never drown the
//! similarity signal.

use crate::classifier::{contains_term, Dictionaries, Domain, DomainProfile};
use crate::fetcher::JobRecord;
use crate::similarity::SimilarityScorer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Per-term bonus by dictionary weight tier.
const BONUS_HIGH: f64 = 0.08;
const BONUS_MEDIUM: f64 = 0.05;
const BONUS_LOW: f64 = 0.02;

/// Extra bonus when the job text names the detected subdomain.
const SUBDOMAIN_BONUS: f64 = 0.10;

/// Default ceiling for the total boost.
pub const DEFAULT_MAX_BOOST: f64 = 0.25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub job: JobRecord,
    pub base_similarity: f64,
    pub domain_boost: f64,
    pub final_score: f64,
}

impl RankedJob {
    /// Score clamped into [0, 1] for display; sorting uses the raw value.
    pub fn display_score(&self) -> f64 {
        self.final_score.clamp(0.0, 1.0)
    }
}

pub struct Ranker<'a> {
    dictionaries: &'a Dictionaries,
    max_boost: f64,
}

impl<'a> Ranker<'a> {
    pub fn new(dictionaries: &'a Dictionaries) -> Self {
        Self {
            dictionaries,
            max_boost: DEFAULT_MAX_BOOST,
        }
    }

    pub fn with_max_boost(mut self, max_boost: f64) -> Self {
        self.max_boost = max_boost;
        self
    }

    /// Score and sort jobs, keeping the best `top` entries.
    ///
    /// A missing or failing scorer degrades every base similarity to 0.0;
    /// ranking itself never fails. The sort is stable, so ties keep the
    /// provider's order.
    pub async fn rank(
        &self,
        resume_text: &str,
        jobs: Vec<JobRecord>,
        profile: &DomainProfile,
        scorer: Option<&dyn SimilarityScorer>,
        top: usize,
    ) -> Vec<RankedJob> {
        let mut scorer_down = scorer.is_none();
        let mut ranked = Vec::with_capacity(jobs.len());

        for job in jobs {
            let job_text = format!("{} {} {}", job.title, job.company, job.description);

            let base_similarity = if scorer_down {
                0.0
            } else if let Some(scorer) = scorer {
                match scorer.score(resume_text, &job_text).await {
                    Ok(score) => score.clamp(0.0, 1.0),
                    Err(e) => {
                        warn!("Similarity scorer unavailable, using zero base scores: {e:#}");
                        scorer_down = true;
                        0.0
                    }
                }
            } else {
                0.0
            };

            let domain_boost = self.domain_boost(&job_text, profile);
            let final_score = base_similarity + domain_boost;
            debug!(
                "Scored '{}': base {:.3} + boost {:.3}",
                job.title, base_similarity, domain_boost
            );

            ranked.push(RankedJob {
                job,
                base_similarity,
                domain_boost,
                final_score,
            });
        }

        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(top);
        ranked
    }

    /// Additive bonus for domain terms present in the job text, capped.
    fn domain_boost(&self, job_text: &str, profile: &DomainProfile) -> f64 {
        if profile.primary == Domain::Other {
            return 0.0;
        }
        let Some(lexicon) = self.dictionaries.lexicon(profile.primary) else {
            return 0.0;
        };

        let lower = job_text.to_lowercase();
        let mut boost = 0.0;

        for entry in &lexicon.terms {
            if contains_term(&lower, &entry.term.to_lowercase()) {
                boost += if entry.weight >= 3.0 {
                    BONUS_HIGH
                } else if entry.weight >= 2.0 {
                    BONUS_MEDIUM
                } else {
                    BONUS_LOW
                };
            }
        }

        if contains_term(&lower, &profile.subdomain.to_lowercase()) {
            boost += SUBDOMAIN_BONUS;
        }

        boost.min(self.max_boost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, Dictionaries};
    use anyhow::Result;
    use async_trait::async_trait;

    /// Deterministic stand-in: word-overlap ratio between the two texts.
    struct OverlapScorer;

    #[async_trait]
    impl SimilarityScorer for OverlapScorer {
        async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64> {
            let resume: std::collections::BTreeSet<String> = resume_text
                .to_lowercase()
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                .filter(|w| !w.is_empty())
                .collect();
            let job: std::collections::BTreeSet<String> = job_text
                .to_lowercase()
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                .filter(|w| !w.is_empty())
                .collect();
            if resume.is_empty() || job.is_empty() {
                return Ok(0.0);
            }
            let shared = resume.intersection(&job).count() as f64;
            Ok(shared / job.len() as f64)
        }
    }

    struct FailingScorer;

    #[async_trait]
    impl SimilarityScorer for FailingScorer {
        async fn score(&self, _: &str, _: &str) -> Result<f64> {
            anyhow::bail!("endpoint down")
        }
    }

    fn job(title: &str, description: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn sample_jobs() -> Vec<JobRecord> {
        vec![
            job("Security Analyst", "SOC monitoring with SIEM and firewalls"),
            job(
                "Backend Python Developer",
                "Django REST APIs and PostgreSQL microservices",
            ),
        ]
    }

    async fn rank_sample(scorer: Option<&dyn SimilarityScorer>) -> Vec<RankedJob> {
        let dictionaries = Dictionaries::builtin();
        let resume = "Skilled in Python, Django, REST APIs";
        let profile = Classifier::new(&dictionaries).classify(resume);
        Ranker::new(&dictionaries)
            .rank(resume, sample_jobs(), &profile, scorer, 10)
            .await
    }

    #[tokio::test]
    async fn python_job_outranks_security_job_for_python_resume() {
        let ranked = rank_sample(Some(&OverlapScorer)).await;
        assert_eq!(ranked[0].job.title, "Backend Python Developer");
        assert_eq!(ranked[1].job.title, "Security Analyst");
    }

    #[tokio::test]
    async fn output_is_sorted_descending() {
        let ranked = rank_sample(Some(&OverlapScorer)).await;
        for pair in ranked.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[tokio::test]
    async fn missing_scorer_zeroes_base_similarity() {
        let ranked = rank_sample(None).await;
        assert!(ranked.iter().all(|r| r.base_similarity == 0.0));
        // Boost alone still ranks the matching job first.
        assert_eq!(ranked[0].job.title, "Backend Python Developer");
    }

    #[tokio::test]
    async fn failing_scorer_degrades_instead_of_erroring() {
        let ranked = rank_sample(Some(&FailingScorer)).await;
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.base_similarity == 0.0));
    }

    #[tokio::test]
    async fn boost_stays_within_configured_cap() {
        let dictionaries = Dictionaries::builtin();
        let resume = "Python Django Flask FastAPI React Angular Vue backend frontend \
                      full stack JavaScript TypeScript Java microservices";
        let profile = Classifier::new(&dictionaries).classify(resume);
        // A job stuffed with every keyword maxes the uncapped sum.
        let loaded = job("Full Stack Developer", resume);
        let ranked = Ranker::new(&dictionaries)
            .rank(resume, vec![loaded], &profile, None, 10)
            .await;
        assert!(ranked[0].domain_boost <= DEFAULT_MAX_BOOST);
        assert!(ranked[0].domain_boost > 0.0);
    }

    #[tokio::test]
    async fn ties_preserve_provider_order() {
        let dictionaries = Dictionaries::builtin();
        let profile = Classifier::new(&dictionaries).classify("unclassifiable hobbies text");
        assert_eq!(profile.primary, Domain::Other);
        // Other has no lexicon: every job scores 0.0 and order must hold.
        let jobs = vec![job("First", "a"), job("Second", "b"), job("Third", "c")];
        let ranked = Ranker::new(&dictionaries)
            .rank("resume", jobs, &profile, None, 10)
            .await;
        let titles: Vec<&str> = ranked.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn truncates_to_requested_top_count() {
        let dictionaries = Dictionaries::builtin();
        let profile = Classifier::new(&dictionaries).classify("Python developer");
        let jobs: Vec<JobRecord> = (0..8).map(|i| job(&format!("Job {}", i), "x")).collect();
        let ranked = Ranker::new(&dictionaries)
            .rank("Python developer", jobs, &profile, None, 3)
            .await;
        assert_eq!(ranked.len(), 3);
    }

    #[tokio::test]
    async fn reruns_are_identical() {
        let a = rank_sample(Some(&OverlapScorer)).await;
        let b = rank_sample(Some(&OverlapScorer)).await;
        let scores_a: Vec<(String, String)> = a
            .iter()
            .map(|r| (r.job.title.clone(), format!("{:.6}", r.final_score)))
            .collect();
        let scores_b: Vec<(String, String)> = b
            .iter()
            .map(|r| (r.job.title.clone(), format!("{:.6}", r.final_score)))
            .collect();
        assert_eq!(scores_a, scores_b);
    }
}
