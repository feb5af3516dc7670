// src/classifier/mod.rs
//! Rule-based domain classification over extracted resume text.
//!
//! Each domain's weighted keyword table is scored against the text; the
//! highest normalized score wins, with ties resolved by the fixed domain
//! priority order. Classification is total: any input, including empty
//! text, produces a profile.

pub mod dictionaries;

pub use dictionaries::{Dictionaries, DomainLexicon, SubdomainRule, WeightedTerm};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-keyword contributions stop growing after this many occurrences.
pub const FREQUENCY_CAP: usize = 3;

/// Confidence below which a resume is considered out of every known domain.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.01;

const STRONG_FOCUS_CONFIDENCE: f64 = 0.10;
const SECONDARY_SKILL_CONFIDENCE: f64 = 0.05;
const SPECIALIZED_CONFIDENCE: f64 = 0.20;

/// Professional domains, in tie-break priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Domain {
    Cybersecurity,
    SoftwareDevelopment,
    DataScience,
    DevOps,
    CloudEngineering,
    Other,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cybersecurity => "Cybersecurity",
            Self::SoftwareDevelopment => "Software Development",
            Self::DataScience => "Data Science",
            Self::DevOps => "DevOps",
            Self::CloudEngineering => "Cloud Engineering",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "cybersecurity" => Ok(Self::Cybersecurity),
            "software_development" => Ok(Self::SoftwareDevelopment),
            "data_science" => Ok(Self::DataScience),
            "devops" => Ok(Self::DevOps),
            "cloud_engineering" => Ok(Self::CloudEngineering),
            "other" => Ok(Self::Other),
            other => Err(format!("Unknown domain: {}", other)),
        }
    }
}

/// A keyword that contributed to the winning domain's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub term: String,
    pub weight: f64,
}

/// Classification result for one resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainProfile {
    pub primary: Domain,
    pub subdomain: String,
    /// Normalized confidence per scored domain, all values in [0, 1].
    pub scores: BTreeMap<Domain, f64>,
    /// Hits for the winning domain, weight descending, ties alphabetical.
    pub matched_keywords: Vec<KeywordHit>,
}

impl DomainProfile {
    /// Confidence of the primary domain (0.0 for `Other`).
    pub fn confidence(&self) -> f64 {
        self.scores.get(&self.primary).copied().unwrap_or(0.0)
    }

    /// Highest-scoring domains, score descending with priority tie-break.
    pub fn top_domains(&self, n: usize) -> Vec<(Domain, f64)> {
        let mut entries: Vec<(Domain, f64)> = self.scores.iter().map(|(d, s)| (*d, *s)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        entries.truncate(n);
        entries
    }

    pub fn is_strong_focus(&self) -> bool {
        self.confidence() > STRONG_FOCUS_CONFIDENCE
    }

    pub fn has_multiple_skills(&self) -> bool {
        self.scores
            .values()
            .filter(|s| **s > SECONDARY_SKILL_CONFIDENCE)
            .count()
            > 1
    }

    pub fn is_specialized(&self) -> bool {
        self.confidence() > SPECIALIZED_CONFIDENCE
    }
}

/// Scores resume text against the configured keyword tables.
pub struct Classifier<'a> {
    dictionaries: &'a Dictionaries,
    min_confidence: f64,
}

impl<'a> Classifier<'a> {
    pub fn new(dictionaries: &'a Dictionaries) -> Self {
        Self {
            dictionaries,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn classify(&self, text: &str) -> DomainProfile {
        let lower = text.to_lowercase();

        let mut scores = BTreeMap::new();
        let mut best: Option<(Domain, f64)> = None;
        let mut best_hits: Vec<KeywordHit> = Vec::new();

        for (domain, lexicon) in self.dictionaries.iter() {
            let (confidence, hits) = score_terms(&lower, &lexicon.terms);
            scores.insert(domain, confidence);
            // Strictly greater, so earlier domains win ties.
            if best.map_or(true, |(_, b)| confidence > b) {
                best = Some((domain, confidence));
                best_hits = hits;
            }
        }

        match best {
            Some((domain, confidence)) if confidence >= self.min_confidence => {
                let subdomain = self.pick_subdomain(&lower, domain);
                DomainProfile {
                    primary: domain,
                    subdomain,
                    scores,
                    matched_keywords: best_hits,
                }
            }
            _ => DomainProfile {
                primary: Domain::Other,
                subdomain: "General".to_string(),
                scores,
                matched_keywords: Vec::new(),
            },
        }
    }

    fn pick_subdomain(&self, lower: &str, domain: Domain) -> String {
        let Some(lexicon) = self.dictionaries.lexicon(domain) else {
            return "General".to_string();
        };

        let mut best: Option<(&str, f64)> = None;
        for rule in &lexicon.subdomains {
            let (confidence, _) = score_terms(lower, &rule.terms);
            if confidence > 0.0 && best.map_or(true, |(_, b)| confidence > b) {
                best = Some((&rule.label, confidence));
            }
        }

        best.map(|(label, _)| label.to_string())
            .unwrap_or_else(|| lexicon.fallback_subdomain.clone())
    }
}

/// Score a term table against lowercase text.
///
/// Returns the normalized confidence in [0, 1] and the deduplicated hits,
/// sorted by weight descending, ties alphabetical.
fn score_terms(lower: &str, terms: &[WeightedTerm]) -> (f64, Vec<KeywordHit>) {
    let mut raw = 0.0;
    let mut max = 0.0;
    let mut hits = Vec::new();

    for entry in terms {
        max += entry.weight * FREQUENCY_CAP as f64;
        let count = count_occurrences(lower, &entry.term.to_lowercase());
        if count > 0 {
            raw += entry.weight * count.min(FREQUENCY_CAP) as f64;
            hits.push(KeywordHit {
                term: entry.term.clone(),
                weight: entry.weight,
            });
        }
    }

    hits.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    hits.dedup_by(|a, b| a.term == b.term);

    let confidence = if max > 0.0 { raw / max } else { 0.0 };
    (confidence, hits)
}

/// Count non-overlapping occurrences of `needle` in `haystack`, requiring
/// non-alphanumeric characters (or string edges) on both sides so that
/// short terms like "aws" do not match inside longer words.
pub(crate) fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .match_indices(needle)
        .filter(|(start, matched)| {
            let end = start + matched.len();
            let before_ok = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .count()
}

/// Boundary-checked presence test on lowercase text.
pub(crate) fn contains_term(haystack: &str, needle: &str) -> bool {
    count_occurrences(haystack, needle) > 0
}
