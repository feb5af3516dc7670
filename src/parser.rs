// src/parser.rs
//! Light structural parsing of resume text for display purposes.
//!
//! Pulls out contact details and section presence signals shown next to
//! the ranked results. Nothing here feeds the ranking itself.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub contact: ContactInfo,
    /// Canonical names of the sections detected in the text.
    pub detected_sections: Vec<String>,
    pub text_length: usize,
}

const SECTION_HEADERS: &[(&str, &str)] = &[
    ("summary", r"(?i)^\s*(summary|objective|profile|about)\b"),
    (
        "experience",
        r"(?i)^\s*(experience|work history|employment|career)\b",
    ),
    ("education", r"(?i)^\s*(education|academic|qualifications)\b"),
    (
        "skills",
        r"(?i)^\s*(skills|technologies|competencies|tools)\b",
    ),
    ("projects", r"(?i)^\s*(projects|portfolio)\b"),
    (
        "certifications",
        r"(?i)^\s*(certifications?|credentials|licenses)\b",
    ),
];

/// Extract contact details and section signals from resume text.
pub fn summarize_resume(text: &str) -> ResumeSummary {
    let email_re = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("valid email pattern");
    let phone_re = Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("valid phone pattern");
    let linkedin_re =
        Regex::new(r"linkedin\.com/in/[A-Za-z0-9_-]+").expect("valid linkedin pattern");
    let github_re = Regex::new(r"github\.com/[A-Za-z0-9_-]+").expect("valid github pattern");

    let contact = ContactInfo {
        email: email_re.find(text).map(|m| m.as_str().to_string()),
        phone: phone_re.find(text).map(|m| m.as_str().trim().to_string()),
        linkedin: linkedin_re.find(text).map(|m| m.as_str().to_string()),
        github: github_re.find(text).map(|m| m.as_str().to_string()),
    };

    let mut detected_sections = Vec::new();
    for (name, pattern) in SECTION_HEADERS {
        let re = Regex::new(pattern).expect("valid section pattern");
        if text.lines().any(|line| re.is_match(line)) {
            detected_sections.push((*name).to_string());
        }
    }

    ResumeSummary {
        contact,
        detected_sections,
        text_length: text.len(),
    }
}
