pub mod api;
pub mod metrics;


pub use api::{SocialDataClient, TimelineResponse};
pub use metrics::{ApiMetrics, MetricsCollector, RequestMetrics};

use leaderboard_core::{CoreError, PostPage};

/// A paginated, newest-first source of community posts.
pub trait PostSource {
    /// Fetches one page. `cursor` is the continuation token from the
    /// previous page, absent for the first request.
    async fn fetch_page(&self, cursor: Option<&str>, limit: u32) -> Result<PostPage, CoreError>;
}
