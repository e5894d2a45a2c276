use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Request counters for one client, i.e. one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub posts_received: u64,
    pub total_response_time: Duration,
    pub min_response_time: Option<Duration>,
    pub max_response_time: Option<Duration>,
    pub last_status_code: Option<u16>,
    pub last_request_time: Option<SystemTime>,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
    pub posts_received: usize,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            posts_received: 0,
            total_response_time: Duration::from_millis(0),
            min_response_time: None,
            max_response_time: None,
            last_status_code: None,
            last_request_time: None,
        }
    }
}

impl ApiMetrics {
    pub fn average_response_time(&self) -> Duration {
        if self.total_requests == 0 {
            Duration::from_millis(0)
        } else {
            self.total_response_time / self.total_requests as u32
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<ApiMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(ApiMetrics::default())),
        }
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.last_request_time = Some(SystemTime::now());
        metrics.last_status_code = request_metrics.status_code;

        if request_metrics.success {
            metrics.successful_requests += 1;
            metrics.posts_received += request_metrics.posts_received as u64;
        } else {
            metrics.failed_requests += 1;
        }

        let elapsed = request_metrics.response_time;
        metrics.total_response_time += elapsed;
        metrics.min_response_time = Some(match metrics.min_response_time {
            Some(min) => min.min(elapsed),
            None => elapsed,
        });
        metrics.max_response_time = Some(match metrics.max_response_time {
            Some(max) => max.max(elapsed),
            None => elapsed,
        });
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
