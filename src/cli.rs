// src/cli.rs
use crate::classifier::Dictionaries;
use crate::config::AppConfig;
use crate::fetcher::SerpApiClient;
use crate::pipeline::{AnalyzeOptions, Pipeline};
use crate::presenter;
use crate::similarity::EmbeddingClient;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "jobhound")]
#[command(about = "Resume-driven job recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a resume and print ranked job recommendations
    Analyze {
        /// Resume file (PDF, DOCX, or TXT)
        #[arg(long)]
        resume: PathBuf,

        /// Preferred job location (defaults to the configured location)
        #[arg(long)]
        location: Option<String>,

        /// SerpApi key override
        #[arg(long)]
        api_key: Option<String>,

        /// Number of ranked results to keep
        #[arg(long)]
        top: Option<usize>,

        /// Write the ranking to this CSV file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Keep only postings from this source (e.g. linkedin)
        #[arg(long)]
        source: Option<String>,
    },
    /// Start the web server
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let dictionaries = load_dictionaries(&config)?;

    match cli.command {
        Command::Analyze {
            resume,
            location,
            api_key,
            top,
            out,
            source,
        } => {
            let key = config
                .resolve_api_key(api_key.as_deref())
                .context(
                    "No SerpApi key configured. Set the SERPAPI_API_KEY environment \
                     variable, add serpapi_api_key to settings.yaml, or pass --api-key. \
                     Free keys: https://serpapi.com",
                )?;
            AppConfig::check_api_key(&key);

            let fetcher = Arc::new(SerpApiClient::new(key, config.request_timeout_secs)?);
            let scorer = build_scorer(&config);
            let pipeline = Pipeline::new(config, dictionaries, fetcher, scorer);

            let options = AnalyzeOptions {
                location: location.unwrap_or_default(),
                top,
                source,
            };

            info!("Analyzing resume: {}", resume.display());
            let outcome = pipeline.analyze_file(&resume, &options).await?;

            print!("{}", presenter::render_console(&outcome));

            if let Some(out_path) = out {
                let csv = presenter::render_csv(&outcome)?;
                tokio::fs::write(&out_path, csv)
                    .await
                    .with_context(|| format!("Failed to write CSV to {}", out_path.display()))?;
                println!("Saved {} recommendations to {}", outcome.jobs.len(), out_path.display());
            }

            // Zero results is a completed run, not a failure.
            Ok(())
        }

        Command::Serve { port } => {
            let scorer = build_scorer(&config);
            let fetcher = match config.resolve_api_key(None) {
                Some(key) => {
                    AppConfig::check_api_key(&key);
                    Arc::new(SerpApiClient::new(key, config.request_timeout_secs)?)
                }
                None => {
                    warn!(
                        "No SerpApi key configured; uploads will fail until \
                         SERPAPI_API_KEY is set"
                    );
                    Arc::new(SerpApiClient::new(String::new(), config.request_timeout_secs)?)
                }
            };
            let pipeline = Pipeline::new(config, dictionaries, fetcher, scorer);
            start_web_server(pipeline, port).await
        }
    }
}

fn load_dictionaries(config: &AppConfig) -> Result<Dictionaries> {
    match &config.dictionaries_path {
        Some(path) => {
            info!("Loading keyword dictionaries from {}", path.display());
            Dictionaries::with_overrides(path)
        }
        None => Ok(Dictionaries::builtin()),
    }
}

fn build_scorer(config: &AppConfig) -> Option<Arc<dyn crate::similarity::SimilarityScorer>> {
    match EmbeddingClient::from_config(config) {
        Some(Ok(client)) => Some(Arc::new(client)),
        Some(Err(e)) => {
            warn!("Similarity scoring disabled: {e:#}");
            None
        }
        None => {
            info!("No embedding endpoint configured; ranking by domain boost only");
            None
        }
    }
}
