use crate::aggregator::aggregate;
use crate::collector::{Collector, CollectorConfig, StopReason};
use artifact_store::ArtifactStore;
use chrono::{DateTime, Utc};
use leaderboard_core::{AppConfig, CoreError};
use serde::Serialize;
use socialdata_client::PostSource;
use tracing::info;

/// Source of the "last updated" time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Human-readable date, e.g. "November 18, 2025".
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
    pub new_posts: usize,
    pub known_ids_before: usize,
    pub known_ids_after: usize,
    pub participants: usize,
    pub last_updated: String,
}

/// One full run: collect, persist the delta and known ids, then rebuild the
/// leaderboard from the delta and stamp it.
pub struct Orchestrator<S, C = SystemClock> {
    source: S,
    store: ArtifactStore,
    config: CollectorConfig,
    clock: C,
}

impl<S: PostSource> Orchestrator<S, SystemClock> {
    pub fn new(source: S, store: ArtifactStore, config: CollectorConfig) -> Self {
        Self::with_clock(source, store, config, SystemClock)
    }

    pub fn from_app_config(source: S, config: &AppConfig) -> Self {
        Self::new(
            source,
            ArtifactStore::new(config.artifact_paths.clone()),
            CollectorConfig::from(config),
        )
    }
}

impl<S: PostSource, C: Clock> Orchestrator<S, C> {
    pub fn with_clock(source: S, store: ArtifactStore, config: CollectorConfig, clock: C) -> Self {
        Self {
            source,
            store,
            config,
            clock,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub async fn run(&self) -> Result<RunSummary, CoreError> {
        let known_ids = self.store.load_known_ids().await?;
        info!("Starting collection with {} known ids", known_ids.len());

        let outcome = Collector::new(&self.source, self.config.clone())
            .collect(&known_ids)
            .await?;

        self.store.save_new_posts(&outcome.new_posts).await?;
        self.store.save_known_ids(&outcome.known_ids).await?;

        let leaderboard = aggregate(&outcome.new_posts);
        self.store.save_leaderboard(&leaderboard).await?;

        let last_updated = format_timestamp(self.clock.now());
        self.store.save_timestamp(&last_updated).await?;

        let summary = RunSummary {
            pages_fetched: outcome.pages_fetched,
            stop_reason: outcome.stop_reason,
            new_posts: outcome.new_posts.len(),
            known_ids_before: known_ids.len(),
            known_ids_after: outcome.known_ids.len(),
            participants: leaderboard.len(),
            last_updated,
        };
        info!(
            "Run complete: {} new posts, {} known ids, {} participants ({})",
            summary.new_posts, summary.known_ids_after, summary.participants, summary.stop_reason
        );
        Ok(summary)
    }
}
