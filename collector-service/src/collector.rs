use leaderboard_core::{AppConfig, CoreError, KnownIds, Post};
use serde::Serialize;
use socialdata_client::PostSource;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub page_limit: u32,
    pub new_post_cap: usize,
    pub inter_request_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_limit: leaderboard_core::DEFAULT_PAGE_LIMIT,
            new_post_cap: leaderboard_core::DEFAULT_NEW_POST_CAP,
            inter_request_delay: leaderboard_core::DEFAULT_INTER_REQUEST_DELAY,
        }
    }
}

impl From<&AppConfig> for CollectorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_limit: config.page_limit,
            new_post_cap: config.new_post_cap,
            inter_request_delay: config.inter_request_delay,
        }
    }
}

/// Why the fetch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A page came back with no posts at all.
    ApiExhausted,
    /// Every post on the page was already known.
    NoNovelPosts,
    /// The run collected `new_post_cap` posts.
    CapReached,
    /// The API returned no continuation cursor.
    EndOfPagination,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::ApiExhausted => "API exhausted",
            StopReason::NoNovelPosts => "no novel posts remain",
            StopReason::CapReached => "safety cap reached",
            StopReason::EndOfPagination => "end of pagination",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone)]
pub struct CollectOutcome {
    /// Posts first seen in this run, in the order the API returned them.
    pub new_posts: Vec<Post>,
    /// The starting known ids plus the ids of `new_posts`.
    pub known_ids: KnownIds,
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
}

/// Walks the timeline newest-first until it runs into posts it has already
/// seen, keeping only the ones it has not.
pub struct Collector<'a, S> {
    source: &'a S,
    config: CollectorConfig,
}

impl<'a, S: PostSource> Collector<'a, S> {
    pub fn new(source: &'a S, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    pub async fn collect(&self, known_ids: &KnownIds) -> Result<CollectOutcome, CoreError> {
        let cap = self.config.new_post_cap;
        let mut new_posts: Vec<Post> = Vec::new();
        let mut seen_this_run: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0;

        let stop_reason = loop {
            let page = self
                .source
                .fetch_page(cursor.as_deref(), self.config.page_limit)
                .await?;
            pages_fetched += 1;

            if page.posts.is_empty() {
                break StopReason::ApiExhausted;
            }

            let fetched = page.posts.len();
            let mut novel: Vec<Post> = page
                .posts
                .into_iter()
                .filter(|post| {
                    !known_ids.contains(&post.id_str) && seen_this_run.insert(post.id_str.clone())
                })
                .collect();

            if novel.is_empty() {
                debug!("Page {}: all {} posts already known", pages_fetched, fetched);
                break StopReason::NoNovelPosts;
            }

            // never hold more than `cap` posts, even mid-page
            novel.truncate(cap - new_posts.len());
            let novel_count = novel.len();
            new_posts.extend(novel);

            info!(
                "Page {}: fetched {}, novel {}, accumulated {}",
                pages_fetched,
                fetched,
                novel_count,
                new_posts.len()
            );

            if new_posts.len() >= cap {
                break StopReason::CapReached;
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break StopReason::EndOfPagination;
            }

            if !self.config.inter_request_delay.is_zero() {
                tokio::time::sleep(self.config.inter_request_delay).await;
            }
        };

        info!(
            "Collection stopped after {} page(s): {} ({} new posts)",
            pages_fetched,
            stop_reason,
            new_posts.len()
        );

        let mut merged = known_ids.clone();
        merged.extend(new_posts.iter().map(|post| post.id_str.clone()));

        Ok(CollectOutcome {
            new_posts,
            known_ids: merged,
            pages_fetched,
            stop_reason,
        })
    }
}
