use anyhow::Result;
use clap::Parser;
use job_recommender::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("job_recommender=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();
    handle_command(cli).await
}
