use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use crate::PostSource;
use leaderboard_core::{AppConfig, CoreError, Post, PostPage, SocialDataApiError};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const USER_AGENT: &str = concat!("community-leaderboard/", env!("CARGO_PKG_VERSION"));

/// Body of `GET /twitter/community/<id>/tweets`.
///
/// Tweets are kept as raw JSON here so that a tweet without an id can be
/// reported by position instead of failing the whole body.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub tweets: Option<Vec<Value>>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl TimelineResponse {
    pub fn into_page(self) -> Result<PostPage, CoreError> {
        let posts = self
            .tweets
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| parse_post(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PostPage::new(posts, self.next_cursor))
    }
}

fn parse_post(index: usize, raw: Value) -> Result<Post, CoreError> {
    match raw.get("id_str") {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(_) => {
            return Err(CoreError::MalformedRecord {
                index,
                reason: "id_str is not a non-empty string".to_string(),
            })
        }
        None => {
            return Err(CoreError::MalformedRecord {
                index,
                reason: "missing id_str".to_string(),
            })
        }
    }

    serde_json::from_value(raw).map_err(|e| {
        CoreError::SocialDataApi(SocialDataApiError::InvalidResponse {
            details: format!("tweet at index {}: {}", index, e),
        })
    })
}

/// Client for the SocialData community timeline.
pub struct SocialDataClient {
    http_client: Client,
    timeline_url: String,
    credential: String,
    metrics: Arc<MetricsCollector>,
}

impl SocialDataClient {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            timeline_url: config.timeline_url(),
            credential: config.credential.clone(),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    pub fn timeline_url(&self) -> &str {
        &self.timeline_url
    }

    /// Issues one GET for a page of the timeline. There is no retry: any
    /// failure is returned to the caller as is.
    pub async fn fetch(&self, cursor: Option<&str>, limit: u32) -> Result<PostPage, CoreError> {
        let start_time = Instant::now();
        let limit_str = limit.to_string();
        let mut params = vec![("type", "Latest"), ("limit", limit_str.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        debug!(
            "GET {} (limit={}, cursor={})",
            self.timeline_url,
            limit,
            cursor.unwrap_or("<none>")
        );

        let mut status_code = None;
        let page = match self.send(&params).await {
            Ok(response) => {
                status_code = Some(response.status().as_u16());
                self.read_page(response).await
            }
            Err(e) => Err(e),
        };

        self.metrics
            .record_request(RequestMetrics {
                status_code,
                response_time: start_time.elapsed(),
                success: page.is_ok(),
                posts_received: page.as_ref().map(|p| p.posts.len()).unwrap_or(0),
            })
            .await;

        let page = page?;
        info!(
            "Retrieved {} posts from community timeline (next cursor: {})",
            page.posts.len(),
            if page.next_cursor.is_some() { "yes" } else { "no" }
        );
        Ok(page)
    }

    async fn send(&self, params: &[(&str, &str)]) -> Result<Response, CoreError> {
        self.http_client
            .get(&self.timeline_url)
            .bearer_auth(&self.credential)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for GET {}: {}", self.timeline_url, e);
                transport_error(e)
            })
    }

    async fn read_page(&self, response: Response) -> Result<PostPage, CoreError> {
        let status = response.status();
        if !status.is_success() {
            error!(
                "Request failed with status: {} for {}",
                status, self.timeline_url
            );
            return Err(self.status_error(response).await.into());
        }

        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str::<TimelineResponse>(&body)
            .map_err(|e| {
                error!("Failed to parse timeline response: {}", e);
                CoreError::SocialDataApi(SocialDataApiError::InvalidResponse {
                    details: e.to_string(),
                })
            })?
            .into_page()
    }

    async fn status_error(&self, response: Response) -> SocialDataApiError {
        let status = response.status();
        match status.as_u16() {
            401 => SocialDataApiError::Unauthorized,
            403 => SocialDataApiError::Forbidden {
                resource: self.timeline_url.clone(),
            },
            404 => SocialDataApiError::NotFound {
                resource: self.timeline_url.clone(),
            },
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse::<u64>().ok());
                warn!("Rate limited (retry-after: {:?})", retry_after);
                SocialDataApiError::RateLimitExceeded { retry_after }
            }
            code if status.is_server_error() => SocialDataApiError::ServerError { status_code: code },
            code => SocialDataApiError::RequestFailed {
                status_code: code,
                body: response.text().await.unwrap_or_default(),
            },
        }
    }

    pub async fn metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }

}

fn transport_error(e: reqwest::Error) -> CoreError {
    if e.is_timeout() {
        CoreError::SocialDataApi(SocialDataApiError::RequestTimeout)
    } else {
        CoreError::Network(e)
    }
}

impl fmt::Debug for SocialDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocialDataClient")
            .field("timeline_url", &self.timeline_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl PostSource for SocialDataClient {
    async fn fetch_page(&self, cursor: Option<&str>, limit: u32) -> Result<PostPage, CoreError> {
        self.fetch(cursor, limit).await
    }
}
