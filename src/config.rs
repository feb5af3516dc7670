// src/config.rs
//! Process-wide configuration, loaded once at startup and never mutated.
//!
//! Values come from the environment first, then from an optional
//! `settings.yaml` in the working directory. Environment wins.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_TOP_RESULTS: usize = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub serpapi_key: Option<String>,
    pub default_location: String,
    pub default_top: usize,
    pub max_upload_bytes: u64,
    pub request_timeout_secs: u64,
    pub embedding_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub dictionaries_path: Option<PathBuf>,
}

/// Optional on-disk settings. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    serpapi_api_key: Option<String>,
    default_location: Option<String>,
    default_top_results: Option<usize>,
    max_upload_bytes: Option<u64>,
    request_timeout_secs: Option<u64>,
    embedding_api_url: Option<String>,
    embedding_api_key: Option<String>,
    embedding_model: Option<String>,
    dictionaries_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the environment and the optional settings file.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new("settings.yaml"))
    }

    fn load_from(settings_path: &Path) -> Result<Self> {
        let settings = if settings_path.exists() {
            let content = std::fs::read_to_string(settings_path).with_context(|| {
                format!("Failed to read settings file: {}", settings_path.display())
            })?;
            let parsed: SettingsFile = serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse settings file: {}", settings_path.display())
            })?;
            info!("Loaded settings from {}", settings_path.display());
            parsed
        } else {
            SettingsFile::default()
        };

        let serpapi_key = env_nonempty("SERPAPI_API_KEY").or(settings.serpapi_api_key);

        Ok(Self {
            serpapi_key,
            default_location: env_nonempty("DEFAULT_LOCATION")
                .or(settings.default_location)
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            default_top: env_nonempty("DEFAULT_TOP_RESULTS")
                .and_then(|v| v.parse().ok())
                .or(settings.default_top_results)
                .unwrap_or(DEFAULT_TOP_RESULTS),
            max_upload_bytes: env_nonempty("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .or(settings.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            request_timeout_secs: env_nonempty("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .or(settings.request_timeout_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            embedding_url: env_nonempty("EMBEDDING_API_URL").or(settings.embedding_api_url),
            embedding_api_key: env_nonempty("EMBEDDING_API_KEY").or(settings.embedding_api_key),
            embedding_model: env_nonempty("EMBEDDING_MODEL")
                .or(settings.embedding_model)
                .unwrap_or_else(|| "all-minilm".to_string()),
            dictionaries_path: env_nonempty("DICTIONARIES_PATH")
                .map(PathBuf::from)
                .or(settings.dictionaries_path),
        })
    }

    /// Resolve the job-search API key: CLI override first, then config.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Option<String> {
        override_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| self.serpapi_key.clone())
    }

    /// Warn about keys that are present but unlikely to be valid.
    pub fn check_api_key(key: &str) {
        if key.len() < 20 {
            warn!("API key looks too short; double-check it before fetching jobs");
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
