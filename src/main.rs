use anyhow::Context;
use collector_service::Orchestrator;
use leaderboard_core::{AppConfig, CoreError, ErrorReporter};
use socialdata_client::SocialDataClient;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "community_leaderboard=info,collector_service=info,socialdata_client=info,artifact_store=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("Starting community leaderboard update");

    if let Err(e) = run().await {
        ErrorReporter::new().report_error(&e);
        return Err(e).context("leaderboard update failed");
    }

    Ok(())
}

async fn run() -> Result<(), CoreError> {
    let config = AppConfig::load()?;
    tracing::debug!("Configuration: {:?}", config);

    let client = SocialDataClient::new(&config)?;
    let orchestrator = Orchestrator::from_app_config(client, &config);
    let summary = orchestrator.run().await?;

    let metrics = orchestrator.source().metrics().await;
    tracing::info!(
        "API usage: {} requests ({} failed, {:.0}% success), {} posts received, avg {:?}",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.success_rate() * 100.0,
        metrics.posts_received,
        metrics.average_response_time()
    );
    tracing::info!(
        "Leaderboard updated on {}: {} new posts from {} page(s), {} participants",
        summary.last_updated,
        summary.new_posts,
        summary.pages_fetched,
        summary.participants
    );

    Ok(())
}
