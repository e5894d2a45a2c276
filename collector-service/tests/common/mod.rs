#![allow(dead_code)]

use artifact_store::ArtifactStore;
use leaderboard_core::{ArtifactPaths, CoreError, Post, PostPage};
use socialdata_client::PostSource;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use collector_service::CollectorConfig;

/// Replays a fixed list of pages, then reports an empty timeline.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<PostPage, CoreError>>>,
    requests: Mutex<Vec<(Option<String>, u32)>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<PostPage>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<PostPage, CoreError>>) -> Self {
        Self {
            pages: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(cursor, limit)` of every request made so far.
    pub fn requests(&self) -> Vec<(Option<String>, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PostSource for ScriptedSource {
    async fn fetch_page(&self, cursor: Option<&str>, limit: u32) -> Result<PostPage, CoreError> {
        self.requests
            .lock()
            .unwrap()
            .push((cursor.map(str::to_string), limit));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PostPage::default()))
    }
}

/// A timeline that never ends and never repeats itself.
pub struct UnlimitedSource {
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl UnlimitedSource {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PostSource for UnlimitedSource {
    async fn fetch_page(&self, _cursor: Option<&str>, limit: u32) -> Result<PostPage, CoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let start = self.next_id.fetch_add(limit as usize, Ordering::SeqCst);
        let posts = (start..start + limit as usize)
            .map(|id| Post::new(format!("u{id:06}")).with_author("firehose"))
            .collect();
        Ok(PostPage::new(posts, Some(format!("cursor-{}", call + 1))))
    }
}

pub fn post(id: &str) -> Post {
    Post::new(id).with_author("alice")
}

pub fn page(ids: &[&str], cursor: Option<&str>) -> PostPage {
    PostPage::new(ids.iter().map(|id| post(id)).collect(), cursor.map(str::to_string))
}

pub fn ids_of(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.id_str.as_str()).collect()
}

pub fn fast_config() -> CollectorConfig {
    CollectorConfig {
        inter_request_delay: Duration::ZERO,
        ..CollectorConfig::default()
    }
}

pub fn temp_store() -> (ArtifactStore, PathBuf) {
    let dir = std::env::temp_dir().join(format!("test_collector_{}", uuid::Uuid::new_v4()));
    (ArtifactStore::new(ArtifactPaths::in_dir(&dir)), dir)
}
