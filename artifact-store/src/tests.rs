#[cfg(test)]
mod tests {
    use crate::ArtifactStore;
    use leaderboard_core::{ArtifactPaths, CoreError, KnownIds, Leaderboard, Post, StoreError};
    use serde_json::json;
    use std::env;
    use std::path::PathBuf;

    fn setup_test_store() -> (ArtifactStore, PathBuf) {
        let dir = env::temp_dir().join(format!("test_leaderboard_{}", uuid::Uuid::new_v4()));
        (ArtifactStore::new(ArtifactPaths::in_dir(&dir)), dir)
    }

    fn ids(values: &[&str]) -> KnownIds {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_artifacts_are_empty() {
        let (store, _dir) = setup_test_store();

        assert!(store.load_known_ids().await.unwrap().is_empty());
        assert!(store.load_new_posts().await.unwrap().is_empty());
        assert!(store.load_leaderboard().await.unwrap().is_empty());
        assert_eq!(store.load_timestamp().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_known_ids_written_sorted() {
        let (store, _dir) = setup_test_store();

        store
            .save_known_ids(&ids(&["300", "100", "200"]))
            .await
            .expect("Failed to save known ids");

        let raw = std::fs::read_to_string(&store.paths().known_ids).unwrap();
        assert_eq!(raw, "100\n200\n300\n");

        let loaded = store.load_known_ids().await.unwrap();
        assert_eq!(loaded, ids(&["100", "200", "300"]));
    }

    #[tokio::test]
    async fn test_known_ids_tolerates_blank_lines() {
        let (store, dir) = setup_test_store();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&store.paths().known_ids, "1\n\n  2  \r\n").unwrap();

        let loaded = store.load_known_ids().await.unwrap();
        assert_eq!(loaded, ids(&["1", "2"]));
    }

    #[tokio::test]
    async fn test_empty_known_ids_file() {
        let (store, _dir) = setup_test_store();
        store.save_known_ids(&KnownIds::new()).await.unwrap();

        let raw = std::fs::read_to_string(&store.paths().known_ids).unwrap();
        assert_eq!(raw, "");
        assert!(store.load_known_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_posts_preserve_unknown_fields_and_unicode() {
        let (store, _dir) = setup_test_store();

        let post: Post = serde_json::from_value(json!({
            "id_str": "7",
            "full_text": "привет 👋",
            "user": {"screen_name": "alice", "name": "Алиса"},
            "favorite_count": 2,
            "entities": {"hashtags": []}
        }))
        .unwrap();

        store.save_new_posts(&[post.clone()]).await.unwrap();

        let raw = std::fs::read_to_string(&store.paths().new_posts).unwrap();
        // pretty-printed and not ASCII-escaped
        assert!(raw.starts_with("[\n  {"));
        assert!(raw.contains("привет 👋"));
        assert!(!raw.contains("\\u"));

        let loaded = store.load_new_posts().await.unwrap();
        assert_eq!(loaded, vec![post]);
        assert_eq!(loaded[0].extra["entities"], json!({"hashtags": []}));
    }

    #[tokio::test]
    async fn test_posts_at_custom_path() {
        let (store, dir) = setup_test_store();
        let path = dir.join("archive").join("2025-11.json");

        store
            .save_posts(&path, &[Post::new("1"), Post::new("2")])
            .await
            .unwrap();
        let loaded = store.load_posts(&path).await.unwrap();
        let loaded_ids: Vec<&str> = loaded.iter().map(|p| p.id_str.as_str()).collect();
        assert_eq!(loaded_ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_corrupt_posts_file() {
        let (store, dir) = setup_test_store();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&store.paths().new_posts, "[{\"id_str\": \"1\"").unwrap();

        let result = store.load_new_posts().await;
        assert!(matches!(
            result,
            Err(CoreError::Store(StoreError::Decode { .. }))
        ));
    }

    #[tokio::test]
    async fn test_leaderboard_is_array_of_pairs() {
        let (store, _dir) = setup_test_store();

        let mut leaderboard = Leaderboard::new();
        leaderboard.entry_mut("bob").posts = 1;
        let alice = leaderboard.entry_mut("alice");
        alice.posts = 2;
        alice.likes = 5;

        store.save_leaderboard(&leaderboard).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&store.paths().leaderboard).unwrap())
                .unwrap();
        assert_eq!(raw[0][0], json!("bob"));
        assert_eq!(raw[1][0], json!("alice"));
        assert_eq!(raw[1][1]["likes"], json!(5));

        let loaded = store.load_leaderboard().await.unwrap();
        assert_eq!(loaded.names(), vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_timestamp_overwrites() {
        let (store, _dir) = setup_test_store();

        store.save_timestamp("November 17, 2025").await.unwrap();
        store.save_timestamp("November 18, 2025").await.unwrap();

        let raw = std::fs::read_to_string(&store.paths().timestamp).unwrap();
        assert_eq!(raw, "November 18, 2025");
        assert_eq!(
            store.load_timestamp().await.unwrap().as_deref(),
            Some("November 18, 2025")
        );
    }

    #[tokio::test]
    async fn test_unwritable_path() {
        let (store, dir) = setup_test_store();
        std::fs::create_dir_all(&dir).unwrap();
        // a regular file where a directory is expected
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let result = store
            .save_posts(&blocker.join("posts.json"), &[Post::new("1")])
            .await;
        match result {
            Err(error @ CoreError::Store(StoreError::Write { .. })) => {
                assert!(error.is_io_error());
            }
            other => panic!("Expected Write error, got {:?}", other),
        }
    }
}
