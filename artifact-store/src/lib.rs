//! Durable storage for run artifacts: the known-id list, this run's new
//! posts, the leaderboard and the last-updated marker.
//!
//! Every write replaces the whole file. A write interrupted part way through
//! can leave a truncated file behind; nothing here guards against that.

use leaderboard_core::{ArtifactPaths, CoreError, KnownIds, Leaderboard, Post, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

mod tests;

pub struct ArtifactStore {
    paths: ArtifactPaths,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Reads the known-id list. A missing file is an empty set.
    pub async fn load_known_ids(&self) -> Result<KnownIds, CoreError> {
        let path = &self.paths.known_ids;
        let Some(contents) = read_optional(path).await? else {
            return Ok(KnownIds::new());
        };

        let ids: KnownIds = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!("Loaded {} known ids from {}", ids.len(), path.display());
        Ok(ids)
    }

    /// Writes one id per line, sorted ascending.
    pub async fn save_known_ids(&self, ids: &KnownIds) -> Result<(), CoreError> {
        let mut contents = String::with_capacity(ids.len() * 20);
        for id in ids {
            contents.push_str(id);
            contents.push('\n');
        }
        write_whole(&self.paths.known_ids, contents.as_bytes()).await?;
        info!(
            "Saved {} known ids to {}",
            ids.len(),
            self.paths.known_ids.display()
        );
        Ok(())
    }

    /// Reads a post collection. A missing file is an empty collection.
    pub async fn load_posts(&self, path: &Path) -> Result<Vec<Post>, CoreError> {
        Ok(read_json(path).await?.unwrap_or_default())
    }

    pub async fn save_posts(&self, path: &Path, posts: &[Post]) -> Result<(), CoreError> {
        write_json(path, posts).await?;
        info!("Saved {} posts to {}", posts.len(), path.display());
        Ok(())
    }

    /// This run's delta, at the configured new-posts path.
    pub async fn load_new_posts(&self) -> Result<Vec<Post>, CoreError> {
        self.load_posts(&self.paths.new_posts).await
    }

    pub async fn save_new_posts(&self, posts: &[Post]) -> Result<(), CoreError> {
        self.save_posts(&self.paths.new_posts, posts).await
    }

    pub async fn load_leaderboard(&self) -> Result<Leaderboard, CoreError> {
        Ok(read_json(&self.paths.leaderboard)
            .await?
            .unwrap_or_default())
    }

    /// Writes the leaderboard as an array of `[name, totals]` pairs.
    pub async fn save_leaderboard(&self, leaderboard: &Leaderboard) -> Result<(), CoreError> {
        write_json(&self.paths.leaderboard, leaderboard).await?;
        info!(
            "Saved leaderboard ({} participants) to {}",
            leaderboard.len(),
            self.paths.leaderboard.display()
        );
        Ok(())
    }

    pub async fn load_timestamp(&self) -> Result<Option<String>, CoreError> {
        Ok(read_optional(&self.paths.timestamp)
            .await?
            .map(|contents| contents.trim_end().to_string()))
    }

    pub async fn save_timestamp(&self, timestamp: &str) -> Result<(), CoreError> {
        write_whole(&self.paths.timestamp, timestamp.as_bytes()).await?;
        debug!("Wrote timestamp '{}'", timestamp);
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, treating it as empty", path.display());
            Ok(None)
        }
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let Some(contents) = read_optional(path).await? else {
        return Ok(None);
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut encoded = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    encoded.push('\n');
    write_whole(path, encoded.as_bytes()).await
}

async fn write_whole(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let to_store_error = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(to_store_error)?;
    }
    fs::write(path, contents).await.map_err(to_store_error)
}
