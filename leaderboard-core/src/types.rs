use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Every post id ingested across all runs. Ordered so that it persists
/// sorted without an extra pass.
pub type KnownIds = BTreeSet<String>;

/// A post from the community timeline.
///
/// Only the fields the leaderboard needs are typed; everything else the API
/// sends is kept in `extra` so that stored posts round-trip unchanged.
/// Counters the API omitted (or sent as `null`) stay absent when the post is
/// written back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id_str: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PostAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id_str: id.into(),
            user: None,
            favorite_count: None,
            retweet_count: None,
            reply_count: None,
            quote_count: None,
            views_count: None,
            extra: Map::new(),
        }
    }

    pub fn with_author(mut self, screen_name: impl Into<String>) -> Self {
        self.user = Some(PostAuthor {
            screen_name: Some(screen_name.into()),
            extra: Map::new(),
        });
        self
    }

    /// The screen name this post is attributed to, if it has one.
    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref()?.screen_name.as_deref()
    }

    pub fn likes(&self) -> u64 {
        self.favorite_count.unwrap_or(0)
    }

    pub fn retweets(&self) -> u64 {
        self.retweet_count.unwrap_or(0)
    }

    pub fn comments(&self) -> u64 {
        self.reply_count.unwrap_or(0)
    }

    pub fn quotes(&self) -> u64 {
        self.quote_count.unwrap_or(0)
    }

    pub fn views(&self) -> u64 {
        self.views_count.unwrap_or(0)
    }

    /// Names of engagement counters the API did not report for this post.
    pub fn missing_counters(&self) -> Vec<&'static str> {
        [
            ("favorite_count", self.favorite_count),
            ("retweet_count", self.retweet_count),
            ("reply_count", self.reply_count),
            ("quote_count", self.quote_count),
            ("views_count", self.views_count),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// One page of the community timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub next_cursor: Option<String>,
}

impl PostPage {
    pub fn new(posts: Vec<Post>, next_cursor: Option<String>) -> Self {
        Self {
            posts,
            next_cursor: next_cursor.filter(|cursor| !cursor.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub posts: u64,
    pub likes: u64,
    pub retweets: u64,
    pub comments: u64,
    pub quotes: u64,
    pub views: u64,
}

impl LeaderboardEntry {
    /// Adds one post to the totals. Sums saturate at `u64::MAX`.
    pub fn record(&mut self, post: &Post) {
        self.posts = self.posts.saturating_add(1);
        self.likes = self.likes.saturating_add(post.likes());
        self.retweets = self.retweets.saturating_add(post.retweets());
        self.comments = self.comments.saturating_add(post.comments());
        self.quotes = self.quotes.saturating_add(post.quotes());
        self.views = self.views.saturating_add(post.views());
    }
}

/// Per-author totals in the order each author was first seen.
///
/// Serializes as an array of `[name, entry]` pairs rather than a JSON object
/// so that consumers get a stable iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<(String, LeaderboardEntry)>,
    index: HashMap<String, usize>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaderboard from pairs. A repeated name replaces the earlier
    /// entry but keeps its original position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, LeaderboardEntry)>) -> Self {
        let mut leaderboard = Self::new();
        for (name, entry) in pairs {
            *leaderboard.entry_mut(&name) = entry;
        }
        leaderboard
    }

    /// Returns the entry for `name`, appending a zeroed one on first sight.
    pub fn entry_mut(&mut self, name: &str) -> &mut LeaderboardEntry {
        let position = match self.index.get(name).copied() {
            Some(position) => position,
            None => {
                self.entries
                    .push((name.to_string(), LeaderboardEntry::default()));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    pub fn get(&self, name: &str) -> Option<&LeaderboardEntry> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LeaderboardEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn into_pairs(self) -> Vec<(String, LeaderboardEntry)> {
        self.entries
    }
}

impl Serialize for Leaderboard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl<'de> Deserialize<'de> for Leaderboard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, LeaderboardEntry)>::deserialize(deserializer)?;
        Ok(Self::from_pairs(pairs))
    }
}
