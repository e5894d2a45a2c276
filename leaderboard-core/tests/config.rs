use leaderboard_core::{AppConfig, ArtifactPaths, ConfigError, CoreError};
use std::path::PathBuf;
use std::time::Duration;

fn temp_config_file(contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("leaderboard_config_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let path = dir.join("leaderboard.toml");
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_defaults() {
    let config = AppConfig::new("secret");
    assert_eq!(config.community_id, "1896991026272723220");
    assert_eq!(config.api_base_url, "https://api.socialdata.tools");
    assert_eq!(config.new_post_cap, 1000);
    assert_eq!(config.page_limit, 50);
    assert_eq!(config.inter_request_delay, Duration::from_secs(3));
    assert_eq!(config.artifact_paths, ArtifactPaths::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_timeline_url() {
    let mut config = AppConfig::new("secret");
    config.api_base_url = "http://localhost:8080/".to_string();
    config.community_id = "123".to_string();
    assert_eq!(
        config.timeline_url(),
        "http://localhost:8080/twitter/community/123/tweets"
    );
}

#[test]
fn test_missing_api_key() {
    let result = AppConfig::load_with(None, None);
    match result {
        Err(CoreError::Config(ConfigError::MissingEnvironmentVariable { var_name })) => {
            assert_eq!(var_name, "API_KEY");
        }
        other => panic!("Expected MissingEnvironmentVariable, got {:?}", other),
    }

    let blank = AppConfig::load_with(None, Some("   ".to_string()));
    assert!(blank.is_err());
}

#[test]
fn test_file_overrides() {
    let path = temp_config_file(
        r#"
community_id = "42"
page_limit = 20
new_post_cap = 200
inter_request_delay_secs = 0

[artifacts]
known_ids = "data/ids.txt"
"#,
    );

    let config = AppConfig::load_with(Some(path), Some("secret".to_string())).unwrap();
    assert_eq!(config.community_id, "42");
    assert_eq!(config.page_limit, 20);
    assert_eq!(config.new_post_cap, 200);
    assert_eq!(config.inter_request_delay, Duration::ZERO);
    assert_eq!(config.artifact_paths.known_ids, PathBuf::from("data/ids.txt"));
    // unspecified artifact paths keep their defaults
    assert_eq!(
        config.artifact_paths.leaderboard,
        PathBuf::from("leaderboard.json")
    );
    assert_eq!(config.credential, "secret");
}

#[test]
fn test_explicit_config_file_must_exist() {
    let missing = std::env::temp_dir().join(format!("missing_{}.toml", uuid::Uuid::new_v4()));
    let result = AppConfig::load_with(Some(missing), Some("secret".to_string()));
    assert!(matches!(
        result,
        Err(CoreError::Config(ConfigError::Read { .. }))
    ));
}

#[test]
fn test_unknown_keys_rejected() {
    let result = AppConfig::from_toml_str("pagelimit = 5", "secret".to_string());
    assert!(matches!(result, Err(CoreError::Config(ConfigError::Parse(_)))));
}

#[test]
fn test_validation() {
    let mut config = AppConfig::new("secret");
    config.page_limit = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { ref field, .. }) if field == "page_limit"
    ));

    let mut config = AppConfig::new("secret");
    config.new_post_cap = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::new("secret");
    config.api_base_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_request_timeout_rejected() {
    let config = AppConfig::from_toml_str("request_timeout_secs = 0", "secret".to_string()).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { ref field, .. }) if field == "request_timeout_secs"
    ));

    let config = AppConfig::from_toml_str("request_timeout_secs = 1", "secret".to_string()).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_base_urls() {
    let mut config = AppConfig::new("secret");
    config.api_base_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::new("secret");
    config.api_base_url = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_debug_redacts_credential() {
    let config = AppConfig::new("super-secret-key");
    let debug = format!("{:?}", config);
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_artifact_paths_in_dir() {
    let paths = ArtifactPaths::in_dir("/srv/board");
    assert_eq!(paths.known_ids, PathBuf::from("/srv/board/known_ids.txt"));
    assert_eq!(paths.timestamp, PathBuf::from("/srv/board/last_updated.txt"));
}
