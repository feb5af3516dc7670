// src/presenter.rs
//! Rendering of analysis results for the console, CSV export, and the
//! web page fragment. Pure formatting over [`AnalysisOutcome`].

use crate::pipeline::AnalysisOutcome;
use anyhow::{Context, Result};
use std::fmt::Write as _;

pub const CSV_HEADERS: [&str; 10] = [
    "Title",
    "Company",
    "Location",
    "Source",
    "Primary Domain",
    "Subdomain",
    "Base Match %",
    "Domain Boost %",
    "Final Match %",
    "Apply Link",
];

/// Percentage for display: clamped into [0, 1], two decimals.
pub fn pct(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 10000.0).round() / 100.0
}

/// Numbered console report with the analysis header and ranked jobs.
pub fn render_console(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    let profile = &outcome.profile;

    writeln!(out, "Resume Analysis").ok();
    writeln!(out, "  Primary domain: {}", profile.primary.label()).ok();
    writeln!(out, "  Subdomain:      {}", profile.subdomain).ok();
    writeln!(out, "  Confidence:     {:.1}%", pct(profile.confidence())).ok();
    writeln!(out, "  Resume length:  {} characters", outcome.summary.text_length).ok();

    writeln!(out, "\nTop domains:").ok();
    for (i, (domain, score)) in profile.top_domains(3).iter().enumerate() {
        writeln!(out, "  {}. {}: {:.1}%", i + 1, domain.label(), pct(*score)).ok();
    }

    if !profile.matched_keywords.is_empty() {
        let keywords: Vec<&str> = profile
            .matched_keywords
            .iter()
            .take(5)
            .map(|hit| hit.term.as_str())
            .collect();
        writeln!(out, "  Keywords: {}", keywords.join(", ")).ok();
    }

    if profile.is_specialized() {
        writeln!(out, "  Highly specialized profile").ok();
    } else if profile.is_strong_focus() {
        writeln!(out, "  Strong focus in {}", profile.primary.label()).ok();
    }
    if profile.has_multiple_skills() {
        writeln!(out, "  Multiple skill areas detected").ok();
    }

    writeln!(out, "\nQuery: {}", outcome.query.to_query_string()).ok();

    if outcome.no_results {
        writeln!(
            out,
            "\nNo jobs found for this query. Try a different location or add \
             more domain-specific keywords to the resume."
        )
        .ok();
        return out;
    }

    writeln!(out, "\nTop {} job recommendations:\n", outcome.jobs.len()).ok();
    for (i, ranked) in outcome.jobs.iter().enumerate() {
        writeln!(out, "{}. {} - {}", i + 1, ranked.job.title, ranked.job.company).ok();
        writeln!(
            out,
            "   {} | Source: {}",
            ranked.job.location, ranked.job.source
        )
        .ok();
        writeln!(
            out,
            "   Match: {:.2}% (Base: {:.2}% + Boost: {:.2}%)",
            pct(ranked.display_score()),
            pct(ranked.base_similarity),
            pct(ranked.domain_boost)
        )
        .ok();
        if !ranked.job.apply_link.is_empty() {
            writeln!(out, "   Apply: {}", ranked.job.apply_link).ok();
        }
        writeln!(out).ok();
    }

    out
}

/// CSV export of the ranked jobs.
pub fn render_csv(outcome: &AnalysisOutcome) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for ranked in &outcome.jobs {
        writer
            .write_record([
                ranked.job.title.as_str(),
                ranked.job.company.as_str(),
                ranked.job.location.as_str(),
                ranked.job.source.as_str(),
                outcome.profile.primary.label(),
                outcome.profile.subdomain.as_str(),
                &format!("{:.2}", pct(ranked.base_similarity)),
                &format!("{:.2}", pct(ranked.domain_boost)),
                &format!("{:.2}", pct(ranked.display_score())),
                ranked.job.apply_link.as_str(),
            ])
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))
}

/// HTML table fragment for embedding into a results page.
pub fn render_html(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "<section class=\"analysis\"><h2>{} &mdash; {}</h2></section>",
        escape_html(outcome.profile.primary.label()),
        escape_html(&outcome.profile.subdomain)
    )
    .ok();

    if outcome.no_results {
        out.push_str("<p class=\"no-results\">No jobs found for this query.</p>\n");
        return out;
    }

    out.push_str("<table class=\"jobs\">\n<thead><tr>");
    for header in ["Title", "Company", "Location", "Source", "Match", "Apply"] {
        write!(out, "<th>{}</th>", header).ok();
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for ranked in &outcome.jobs {
        write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td>",
            escape_html(&ranked.job.title),
            escape_html(&ranked.job.company),
            escape_html(&ranked.job.location),
            escape_html(&ranked.job.source),
            pct(ranked.display_score()),
        )
        .ok();
        if ranked.job.apply_link.is_empty() {
            out.push_str("<td></td></tr>\n");
        } else {
            writeln!(
                out,
                "<td><a href=\"{}\">Apply</a></td></tr>",
                escape_html(&ranked.job.apply_link)
            )
            .ok();
        }
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, Dictionaries};
    use crate::fetcher::JobRecord;
    use crate::parser::summarize_resume;
    use crate::pipeline::AnalysisOutcome;
    use crate::query::build_query;
    use crate::ranker::RankedJob;

    fn sample_outcome() -> AnalysisOutcome {
        let dictionaries = Dictionaries::builtin();
        let resume = "Skilled in Python, Django, REST APIs";
        let profile = Classifier::new(&dictionaries).classify(resume);
        let query = build_query(&profile, "Berlin", "Remote");
        AnalysisOutcome {
            jobs: vec![RankedJob {
                job: JobRecord {
                    title: "Backend <Python> Developer".to_string(),
                    company: "Acme & Co".to_string(),
                    location: "Berlin".to_string(),
                    description: "Django".to_string(),
                    apply_link: "https://example.com/apply".to_string(),
                    source: "via LinkedIn".to_string(),
                },
                base_similarity: 0.4215,
                domain_boost: 0.25,
                final_score: 0.6715,
            }],
            no_results: false,
            fetched_count: 1,
            summary: summarize_resume(resume),
            profile,
            query,
        }
    }

    #[test]
    fn console_output_names_domain_and_scores() {
        let text = render_console(&sample_outcome());
        assert!(text.contains("Primary domain: Software Development"));
        assert!(text.contains("Backend <Python> Developer"));
        assert!(text.contains("Base: 42.15%"));
        assert!(text.contains("Apply: https://example.com/apply"));
    }

    #[test]
    fn console_output_explains_empty_results() {
        let mut outcome = sample_outcome();
        outcome.jobs.clear();
        outcome.no_results = true;
        let text = render_console(&outcome);
        assert!(text.contains("No jobs found"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_job() {
        let bytes = render_csv(&sample_outcome()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Title,Company,Location,Source"));
        assert!(lines[1].contains("Software Development"));
        assert!(lines[1].contains("67.15"));
    }

    #[test]
    fn csv_for_empty_ranking_is_header_only() {
        let mut outcome = sample_outcome();
        outcome.jobs.clear();
        let bytes = render_csv(&outcome).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn html_escapes_job_fields() {
        let html = render_html(&sample_outcome());
        assert!(html.contains("Backend &lt;Python&gt; Developer"));
        assert!(html.contains("Acme &amp; Co"));
        assert!(!html.contains("<Python>"));
    }

    #[test]
    fn displayed_percentages_are_clamped() {
        assert_eq!(pct(1.4), 100.0);
        assert_eq!(pct(-0.2), 0.0);
        assert_eq!(pct(0.4215), 42.15);
    }
}
