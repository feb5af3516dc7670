// src/query.rs
//! Deterministic construction of the job-search query from a domain profile.

use crate::classifier::{Domain, DomainProfile};
use serde::{Deserialize, Serialize};

/// Hard cap on query terms, keeping queries friendly to the search API.
pub const MAX_QUERY_TERMS: usize = 5;

/// Matched keywords carried into the query after the domain label.
pub const TOP_KEYWORD_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub location: String,
}

impl SearchQuery {
    /// Render the free-text query sent to the search engine.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<&str> = self.terms.iter().map(String::as_str).collect();
        if !self.location.is_empty() {
            parts.push(&self.location);
        }
        parts.push("jobs");
        parts.join(" ")
    }

    /// The same query with the location dropped, for a broadened retry.
    pub fn broadened(&self) -> Self {
        Self {
            terms: self.terms.clone(),
            location: String::new(),
        }
    }
}

/// Build the search query for a classified resume.
///
/// Terms are the domain label followed by the top matched keywords by
/// weight (ties alphabetical), deduplicated case-insensitively and capped
/// at [`MAX_QUERY_TERMS`]. An empty requested location falls back to the
/// configured default.
pub fn build_query(
    profile: &DomainProfile,
    requested_location: &str,
    default_location: &str,
) -> SearchQuery {
    let label = match profile.primary {
        // "Other" is useless as a search term; fall back to a generic role.
        Domain::Other => "Software Developer".to_string(),
        domain => domain.label().to_string(),
    };

    let mut terms = vec![label];
    let mut seen: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();

    // matched_keywords is already weight-descending with alphabetical ties.
    let mut added = 0;
    for hit in profile.matched_keywords.iter() {
        if added == TOP_KEYWORD_COUNT || terms.len() == MAX_QUERY_TERMS {
            break;
        }
        let lower = hit.term.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        terms.push(title_case(&hit.term));
        added += 1;
    }

    let location = if requested_location.trim().is_empty() {
        default_location.to_string()
    } else {
        requested_location.trim().to_string()
    };

    SearchQuery { terms, location }
}

/// Capitalize each word of a keyword for presentation in the query.
fn title_case(term: &str) -> String {
    term.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
