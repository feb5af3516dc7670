// src/classifier/dictionaries.rs
//! Weighted keyword tables used for domain and subdomain detection.
//!
//! The compiled-in tables cover the supported professional domains. Any
//! table can be replaced at startup from a `dictionaries.toml` file; the
//! numeric weights are tuning knobs, not part of the scoring contract.

use super::Domain;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const WEIGHT_HIGH: f64 = 3.0;
pub const WEIGHT_MEDIUM: f64 = 2.0;
pub const WEIGHT_LOW: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubdomainRule {
    pub label: String,
    pub terms: Vec<WeightedTerm>,
}

#[derive(Debug, Clone)]
pub struct DomainLexicon {
    pub terms: Vec<WeightedTerm>,
    pub subdomains: Vec<SubdomainRule>,
    pub fallback_subdomain: String,
}

/// Immutable keyword tables for every scored domain, in priority order.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    lexicons: BTreeMap<Domain, DomainLexicon>,
}

#[derive(Debug, Deserialize)]
struct DictionariesFile {
    #[serde(default)]
    domains: BTreeMap<String, DomainLexiconFile>,
}

#[derive(Debug, Deserialize)]
struct DomainLexiconFile {
    terms: Vec<WeightedTerm>,
    #[serde(default)]
    subdomains: Option<Vec<SubdomainRule>>,
    #[serde(default)]
    fallback_subdomain: Option<String>,
}

impl Dictionaries {
    /// The compiled-in keyword tables.
    pub fn builtin() -> Self {
        let mut lexicons = BTreeMap::new();

        lexicons.insert(
            Domain::Cybersecurity,
            lexicon(
                &[
                    ("cybersecurity", WEIGHT_HIGH),
                    ("cyber security", WEIGHT_HIGH),
                    ("penetration testing", WEIGHT_HIGH),
                    ("ethical hacker", WEIGHT_HIGH),
                    ("vulnerability", WEIGHT_HIGH),
                    ("information security", WEIGHT_HIGH),
                    ("security analyst", WEIGHT_HIGH),
                    ("incident response", WEIGHT_MEDIUM),
                    ("soc", WEIGHT_MEDIUM),
                    ("siem", WEIGHT_MEDIUM),
                    ("firewall", WEIGHT_MEDIUM),
                    ("threat intelligence", WEIGHT_MEDIUM),
                    ("malware", WEIGHT_MEDIUM),
                    ("intrusion detection", WEIGHT_MEDIUM),
                    ("security operations", WEIGHT_MEDIUM),
                    ("forensics", WEIGHT_LOW),
                    ("compliance", WEIGHT_LOW),
                    ("wireshark", WEIGHT_LOW),
                    ("nmap", WEIGHT_LOW),
                    ("metasploit", WEIGHT_LOW),
                    ("burp suite", WEIGHT_LOW),
                    ("nessus", WEIGHT_LOW),
                    ("owasp", WEIGHT_LOW),
                    ("kali linux", WEIGHT_LOW),
                    ("risk assessment", WEIGHT_LOW),
                ],
                &[
                    (
                        "Penetration Tester",
                        &[
                            ("penetration", WEIGHT_HIGH),
                            ("ethical hacker", WEIGHT_HIGH),
                            ("red team", WEIGHT_MEDIUM),
                            ("offensive security", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Incident Response Analyst",
                        &[
                            ("incident response", WEIGHT_HIGH),
                            ("digital forensics", WEIGHT_MEDIUM),
                            ("blue team", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "SOC Analyst",
                        &[
                            ("soc", WEIGHT_HIGH),
                            ("siem", WEIGHT_MEDIUM),
                            ("security operations", WEIGHT_MEDIUM),
                        ],
                    ),
                ],
                "Security Analyst",
            ),
        );

        lexicons.insert(
            Domain::SoftwareDevelopment,
            lexicon(
                &[
                    ("software engineer", WEIGHT_HIGH),
                    ("software developer", WEIGHT_HIGH),
                    ("javascript", WEIGHT_HIGH),
                    ("typescript", WEIGHT_HIGH),
                    ("python", WEIGHT_HIGH),
                    ("java", WEIGHT_HIGH),
                    ("full stack", WEIGHT_HIGH),
                    ("backend", WEIGHT_HIGH),
                    ("frontend", WEIGHT_HIGH),
                    ("rest api", WEIGHT_HIGH),
                    ("rest apis", WEIGHT_HIGH),
                    ("web development", WEIGHT_HIGH),
                    ("react", WEIGHT_MEDIUM),
                    ("angular", WEIGHT_MEDIUM),
                    ("vue", WEIGHT_MEDIUM),
                    ("node.js", WEIGHT_MEDIUM),
                    ("django", WEIGHT_MEDIUM),
                    ("flask", WEIGHT_MEDIUM),
                    ("fastapi", WEIGHT_MEDIUM),
                    ("spring boot", WEIGHT_MEDIUM),
                    ("express", WEIGHT_MEDIUM),
                    ("microservices", WEIGHT_MEDIUM),
                    ("graphql", WEIGHT_MEDIUM),
                    ("hibernate", WEIGHT_MEDIUM),
                    ("git", WEIGHT_LOW),
                    ("html", WEIGHT_LOW),
                    ("css", WEIGHT_LOW),
                    ("mysql", WEIGHT_LOW),
                    ("postgresql", WEIGHT_LOW),
                    ("mongodb", WEIGHT_LOW),
                    ("redis", WEIGHT_LOW),
                    ("agile", WEIGHT_LOW),
                    ("unit testing", WEIGHT_LOW),
                ],
                &[
                    (
                        "Full Stack Developer",
                        &[
                            ("full stack", WEIGHT_HIGH),
                            ("fullstack", WEIGHT_HIGH),
                            ("mern", WEIGHT_MEDIUM),
                            ("mean stack", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Frontend Developer",
                        &[
                            ("frontend", WEIGHT_HIGH),
                            ("front-end", WEIGHT_HIGH),
                            ("react", WEIGHT_MEDIUM),
                            ("angular", WEIGHT_MEDIUM),
                            ("vue", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Backend Developer",
                        &[
                            ("backend", WEIGHT_HIGH),
                            ("back-end", WEIGHT_HIGH),
                            ("microservices", WEIGHT_MEDIUM),
                            ("django", WEIGHT_MEDIUM),
                            ("spring boot", WEIGHT_MEDIUM),
                        ],
                    ),
                ],
                "Software Developer",
            ),
        );

        lexicons.insert(
            Domain::DataScience,
            lexicon(
                &[
                    ("data scientist", WEIGHT_HIGH),
                    ("machine learning", WEIGHT_HIGH),
                    ("deep learning", WEIGHT_HIGH),
                    ("data analyst", WEIGHT_HIGH),
                    ("artificial intelligence", WEIGHT_HIGH),
                    ("statistics", WEIGHT_MEDIUM),
                    ("predictive modeling", WEIGHT_MEDIUM),
                    ("data visualization", WEIGHT_MEDIUM),
                    ("natural language processing", WEIGHT_MEDIUM),
                    ("computer vision", WEIGHT_MEDIUM),
                    ("big data", WEIGHT_MEDIUM),
                    ("feature engineering", WEIGHT_MEDIUM),
                    ("pandas", WEIGHT_LOW),
                    ("numpy", WEIGHT_LOW),
                    ("scikit-learn", WEIGHT_LOW),
                    ("tensorflow", WEIGHT_LOW),
                    ("pytorch", WEIGHT_LOW),
                    ("python", WEIGHT_LOW),
                    ("sql", WEIGHT_LOW),
                    ("tableau", WEIGHT_LOW),
                    ("spark", WEIGHT_LOW),
                ],
                &[
                    (
                        "Machine Learning Engineer",
                        &[
                            ("machine learning", WEIGHT_HIGH),
                            ("mlops", WEIGHT_MEDIUM),
                            ("model training", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "NLP Engineer",
                        &[
                            ("natural language processing", WEIGHT_HIGH),
                            ("nlp", WEIGHT_HIGH),
                            ("text mining", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Computer Vision Engineer",
                        &[
                            ("computer vision", WEIGHT_HIGH),
                            ("image processing", WEIGHT_MEDIUM),
                            ("opencv", WEIGHT_MEDIUM),
                        ],
                    ),
                ],
                "Data Scientist",
            ),
        );

        lexicons.insert(
            Domain::DevOps,
            lexicon(
                &[
                    ("devops", WEIGHT_HIGH),
                    ("ci/cd", WEIGHT_HIGH),
                    ("continuous integration", WEIGHT_HIGH),
                    ("continuous deployment", WEIGHT_HIGH),
                    ("site reliability", WEIGHT_HIGH),
                    ("docker", WEIGHT_MEDIUM),
                    ("kubernetes", WEIGHT_MEDIUM),
                    ("jenkins", WEIGHT_MEDIUM),
                    ("gitlab", WEIGHT_MEDIUM),
                    ("terraform", WEIGHT_MEDIUM),
                    ("ansible", WEIGHT_MEDIUM),
                    ("github actions", WEIGHT_MEDIUM),
                    ("infrastructure as code", WEIGHT_MEDIUM),
                    ("monitoring", WEIGHT_LOW),
                    ("prometheus", WEIGHT_LOW),
                    ("grafana", WEIGHT_LOW),
                    ("linux", WEIGHT_LOW),
                    ("bash", WEIGHT_LOW),
                    ("helm", WEIGHT_LOW),
                    ("observability", WEIGHT_LOW),
                ],
                &[
                    (
                        "CI/CD Engineer",
                        &[
                            ("ci/cd", WEIGHT_HIGH),
                            ("jenkins", WEIGHT_MEDIUM),
                            ("github actions", WEIGHT_MEDIUM),
                            ("release pipeline", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Kubernetes Engineer",
                        &[
                            ("kubernetes", WEIGHT_HIGH),
                            ("helm", WEIGHT_MEDIUM),
                            ("container orchestration", WEIGHT_MEDIUM),
                        ],
                    ),
                    (
                        "Infrastructure Engineer",
                        &[
                            ("terraform", WEIGHT_HIGH),
                            ("infrastructure as code", WEIGHT_HIGH),
                            ("ansible", WEIGHT_MEDIUM),
                        ],
                    ),
                ],
                "DevOps Engineer",
            ),
        );

        lexicons.insert(
            Domain::CloudEngineering,
            lexicon(
                &[
                    ("cloud engineer", WEIGHT_HIGH),
                    ("cloud architect", WEIGHT_HIGH),
                    ("aws", WEIGHT_HIGH),
                    ("azure", WEIGHT_HIGH),
                    ("gcp", WEIGHT_HIGH),
                    ("google cloud", WEIGHT_HIGH),
                    ("ec2", WEIGHT_MEDIUM),
                    ("s3", WEIGHT_MEDIUM),
                    ("lambda", WEIGHT_MEDIUM),
                    ("cloudformation", WEIGHT_MEDIUM),
                    ("serverless", WEIGHT_MEDIUM),
                    ("iam", WEIGHT_MEDIUM),
                    ("vpc", WEIGHT_MEDIUM),
                    ("cloud migration", WEIGHT_MEDIUM),
                    ("rds", WEIGHT_LOW),
                    ("dynamodb", WEIGHT_LOW),
                    ("load balancing", WEIGHT_LOW),
                    ("auto scaling", WEIGHT_LOW),
                    ("cost optimization", WEIGHT_LOW),
                ],
                &[
                    (
                        "AWS Engineer",
                        &[
                            ("aws", WEIGHT_HIGH),
                            ("ec2", WEIGHT_MEDIUM),
                            ("s3", WEIGHT_MEDIUM),
                            ("lambda", WEIGHT_MEDIUM),
                        ],
                    ),
                    ("Azure Engineer", &[("azure", WEIGHT_HIGH)]),
                    (
                        "GCP Engineer",
                        &[
                            ("gcp", WEIGHT_HIGH),
                            ("google cloud", WEIGHT_HIGH),
                            ("bigquery", WEIGHT_MEDIUM),
                        ],
                    ),
                ],
                "Cloud Engineer",
            ),
        );

        Self { lexicons }
    }

    /// Builtin tables with any domain replaced from a TOML file.
    pub fn with_overrides(path: &Path) -> Result<Self> {
        let mut dictionaries = Self::builtin();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionaries file: {}", path.display()))?;
        let file: DictionariesFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse dictionaries file: {}", path.display()))?;

        for (key, overrides) in file.domains {
            let domain = key
                .parse::<Domain>()
                .map_err(|e| anyhow::anyhow!("{} in {}", e, path.display()))?;
            let builtin = dictionaries
                .lexicons
                .get(&domain)
                .cloned()
                .unwrap_or_else(|| DomainLexicon {
                    terms: Vec::new(),
                    subdomains: Vec::new(),
                    fallback_subdomain: domain.label().to_string(),
                });
            dictionaries.lexicons.insert(
                domain,
                DomainLexicon {
                    terms: overrides.terms,
                    subdomains: overrides.subdomains.unwrap_or(builtin.subdomains),
                    fallback_subdomain: overrides
                        .fallback_subdomain
                        .unwrap_or(builtin.fallback_subdomain),
                },
            );
        }

        Ok(dictionaries)
    }

    pub fn lexicon(&self, domain: Domain) -> Option<&DomainLexicon> {
        self.lexicons.get(&domain)
    }

    /// Scored domains in fixed priority order (the tie-break order).
    pub fn iter(&self) -> impl Iterator<Item = (Domain, &DomainLexicon)> {
        self.lexicons.iter().map(|(d, l)| (*d, l))
    }
}

fn lexicon(
    terms: &[(&str, f64)],
    subdomains: &[(&str, &[(&str, f64)])],
    fallback: &str,
) -> DomainLexicon {
    DomainLexicon {
        terms: terms
            .iter()
            .map(|(term, weight)| WeightedTerm {
                term: (*term).to_string(),
                weight: *weight,
            })
            .collect(),
        subdomains: subdomains
            .iter()
            .map(|(label, rule_terms)| SubdomainRule {
                label: (*label).to_string(),
                terms: rule_terms
                    .iter()
                    .map(|(term, weight)| WeightedTerm {
                        term: (*term).to_string(),
                        weight: *weight,
                    })
                    .collect(),
            })
            .collect(),
        fallback_subdomain: fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_covers_every_scored_domain() {
        let dictionaries = Dictionaries::builtin();
        for domain in [
            Domain::Cybersecurity,
            Domain::SoftwareDevelopment,
            Domain::DataScience,
            Domain::DevOps,
            Domain::CloudEngineering,
        ] {
            let lexicon = dictionaries.lexicon(domain).expect("missing lexicon");
            assert!(!lexicon.terms.is_empty());
            assert!(!lexicon.fallback_subdomain.is_empty());
            assert!(lexicon.terms.iter().all(|t| t.weight > 0.0));
        }
        assert!(dictionaries.lexicon(Domain::Other).is_none());
    }

    #[test]
    fn priority_order_is_declaration_order() {
        let dictionaries = Dictionaries::builtin();
        let order: Vec<Domain> = dictionaries.iter().map(|(d, _)| d).collect();
        assert_eq!(
            order,
            vec![
                Domain::Cybersecurity,
                Domain::SoftwareDevelopment,
                Domain::DataScience,
                Domain::DevOps,
                Domain::CloudEngineering,
            ]
        );
    }

    #[test]
    fn toml_override_replaces_terms_but_keeps_subdomains() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[domains.cybersecurity]
terms = [{{ term = "zero trust", weight = 2.0 }}]
"#
        )
        .unwrap();

        let dictionaries = Dictionaries::with_overrides(file.path()).unwrap();
        let lexicon = dictionaries.lexicon(Domain::Cybersecurity).unwrap();
        assert_eq!(lexicon.terms.len(), 1);
        assert_eq!(lexicon.terms[0].term, "zero trust");
        // Subdomain tables and fallback come from the builtin set.
        assert!(!lexicon.subdomains.is_empty());
        assert_eq!(lexicon.fallback_subdomain, "Security Analyst");
    }

    #[test]
    fn unknown_domain_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[domains.astrology]
terms = [{{ term = "stars", weight = 1.0 }}]
"#
        )
        .unwrap();
        assert!(Dictionaries::with_overrides(file.path()).is_err());
    }
}
