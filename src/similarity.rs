// src/similarity.rs
//! Semantic similarity between resume text and job descriptions.
//!
//! The scorer is an injected capability. The production implementation
//! fetches embeddings from an external HTTP endpoint and computes cosine
//! similarity locally; when no endpoint is configured the pipeline runs
//! without base similarity entirely.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Capability: score how close two texts are, in [0, 1].
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Scorer backed by an Ollama-compatible `/api/embeddings` endpoint.
pub struct EmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Build the scorer from configuration, `None` when unconfigured.
    pub fn from_config(config: &AppConfig) -> Option<Result<Self>> {
        let base_url = config.embedding_url.clone()?;
        info!("Similarity scoring enabled via {}", base_url);
        Some(Self::new(
            base_url,
            config.embedding_api_key.clone(),
            config.embedding_model.clone(),
            config.request_timeout_secs,
        ))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            prompt: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to call embedding endpoint {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding endpoint returned {}: {}", status, body);
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        if payload.embedding.is_empty() {
            anyhow::bail!("Embedding endpoint returned an empty vector");
        }
        Ok(payload.embedding)
    }
}

#[async_trait]
impl SimilarityScorer for EmbeddingClient {
    async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64> {
        let resume_embedding = self.embed(resume_text).await?;
        let job_embedding = self.embed(job_text).await?;
        let similarity = cosine_similarity(&resume_embedding, &job_embedding)?;
        // Sentence embeddings can land slightly below zero; the contract
        // for base similarity is [0, 1].
        Ok(f64::from(similarity).clamp(0.0, 1.0))
    }
}

/// Cosine similarity between two vectors of equal dimension.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        anyhow::bail!("Dimension mismatch: {} vs {}", a.len(), b.len());
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
