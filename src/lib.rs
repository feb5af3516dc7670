// src/lib.rs
//! Resume-driven job recommendation pipeline.
//!
//! One analysis runs extract -> classify -> query -> fetch -> rank and
//! hands the outcome to a presenter. The search backend and the
//! similarity scorer are injected capabilities; everything else is
//! deterministic.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod presenter;
pub mod query;
pub mod ranker;
pub mod similarity;
pub mod web;

pub use classifier::{Classifier, Dictionaries, Domain, DomainProfile};
pub use config::AppConfig;
pub use error::{PipelineError, Result};
pub use fetcher::{JobRecord, JobSearchClient, SerpApiClient};
pub use pipeline::{AnalysisOutcome, AnalyzeOptions, Pipeline};
pub use ranker::RankedJob;
pub use similarity::{EmbeddingClient, SimilarityScorer};
