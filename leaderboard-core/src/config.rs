use crate::error::{ConfigError, CoreError};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const API_KEY_ENV: &str = "API_KEY";
pub const CONFIG_PATH_ENV: &str = "LEADERBOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "leaderboard.toml";

pub const DEFAULT_COMMUNITY_ID: &str = "1896991026272723220";
pub const DEFAULT_API_BASE_URL: &str = "https://api.socialdata.tools";
pub const DEFAULT_NEW_POST_CAP: usize = 1000;
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where each run artifact lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactPaths {
    pub known_ids: PathBuf,
    pub new_posts: PathBuf,
    pub leaderboard: PathBuf,
    pub timestamp: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            known_ids: PathBuf::from("known_ids.txt"),
            new_posts: PathBuf::from("new_tweets.json"),
            leaderboard: PathBuf::from("leaderboard.json"),
            timestamp: PathBuf::from("last_updated.txt"),
        }
    }
}

impl ArtifactPaths {
    /// All four artifacts under `dir`, using the default file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let defaults = Self::default();
        Self {
            known_ids: dir.join(defaults.known_ids),
            new_posts: dir.join(defaults.new_posts),
            leaderboard: dir.join(defaults.leaderboard),
            timestamp: dir.join(defaults.timestamp),
        }
    }
}

/// Everything a run needs. The credential only ever comes from the
/// environment; the rest can be overridden by an optional TOML file.
#[derive(Clone)]
pub struct AppConfig {
    pub community_id: String,
    pub api_base_url: String,
    pub credential: String,
    pub new_post_cap: usize,
    pub page_limit: u32,
    pub inter_request_delay: Duration,
    pub request_timeout: Duration,
    pub artifact_paths: ArtifactPaths,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    community_id: Option<String>,
    api_base_url: Option<String>,
    new_post_cap: Option<usize>,
    page_limit: Option<u32>,
    inter_request_delay_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    artifacts: Option<ArtifactPaths>,
}

impl AppConfig {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            community_id: DEFAULT_COMMUNITY_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            credential: credential.into(),
            new_post_cap: DEFAULT_NEW_POST_CAP,
            page_limit: DEFAULT_PAGE_LIMIT,
            inter_request_delay: DEFAULT_INTER_REQUEST_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            artifact_paths: ArtifactPaths::default(),
        }
    }

    /// Loads configuration from the process environment: `API_KEY` for the
    /// credential and `LEADERBOARD_CONFIG` (or `./leaderboard.toml`) for
    /// optional overrides.
    pub fn load() -> Result<Self, CoreError> {
        let explicit_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let api_key = std::env::var(API_KEY_ENV).ok();
        Self::load_with(explicit_path, api_key)
    }

    /// Same as [`AppConfig::load`] with the environment passed in.
    ///
    /// An explicitly named config file must exist; the default
    /// `leaderboard.toml` is optional.
    pub fn load_with(
        explicit_path: Option<PathBuf>,
        api_key: Option<String>,
    ) -> Result<Self, CoreError> {
        let credential = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: API_KEY_ENV.to_string(),
            })?;

        let (path, required) = match explicit_path {
            Some(path) => (path, true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                info!("Loading configuration from {}", path.display());
                Self::from_toml_str(&contents, credential)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!("No {} found, using defaults", path.display());
                Self::new(credential)
            }
            Err(source) => return Err(ConfigError::Read { path, source }.into()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Applies the overrides in `contents` on top of the defaults.
    pub fn from_toml_str(contents: &str, credential: String) -> Result<Self, CoreError> {
        let file: FileConfig = toml::from_str(contents).map_err(ConfigError::from)?;
        let mut config = Self::new(credential);

        if let Some(community_id) = file.community_id {
            config.community_id = community_id;
        }
        if let Some(api_base_url) = file.api_base_url {
            config.api_base_url = api_base_url;
        }
        if let Some(cap) = file.new_post_cap {
            config.new_post_cap = cap;
        }
        if let Some(limit) = file.page_limit {
            config.page_limit = limit;
        }
        if let Some(secs) = file.inter_request_delay_secs {
            config.inter_request_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(paths) = file.artifacts {
            config.artifact_paths = paths;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential.trim().is_empty() {
            return Err(ConfigError::MissingEnvironmentVariable {
                var_name: API_KEY_ENV.to_string(),
            });
        }
        if self.community_id.trim().is_empty() {
            return Err(invalid("community_id", &self.community_id));
        }
        if self.page_limit == 0 {
            return Err(invalid("page_limit", self.page_limit));
        }
        if self.new_post_cap == 0 {
            return Err(invalid("new_post_cap", self.new_post_cap));
        }
        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout_secs", self.request_timeout.as_secs()));
        }

        let base = Url::parse(&self.api_base_url)
            .map_err(|_| invalid("api_base_url", &self.api_base_url))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(invalid("api_base_url", &self.api_base_url));
        }

        Ok(())
    }

    /// `<base>/twitter/community/<id>/tweets`
    pub fn timeline_url(&self) -> String {
        format!(
            "{}/twitter/community/{}/tweets",
            self.api_base_url.trim_end_matches('/'),
            self.community_id
        )
    }
}

fn invalid(field: &str, value: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("community_id", &self.community_id)
            .field("api_base_url", &self.api_base_url)
            .field("credential", &"<redacted>")
            .field("new_post_cap", &self.new_post_cap)
            .field("page_limit", &self.page_limit)
            .field("inter_request_delay", &self.inter_request_delay)
            .field("request_timeout", &self.request_timeout)
            .field("artifact_paths", &self.artifact_paths)
            .finish()
    }
}
