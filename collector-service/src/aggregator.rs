use leaderboard_core::{Leaderboard, Post};
use tracing::{debug, info};

/// Folds posts into per-author totals, authors ordered by first appearance.
///
/// Posts with no user or no screen name are not attributable and are skipped.
/// Missing counters count as zero.
pub fn aggregate(posts: &[Post]) -> Leaderboard {
    let mut leaderboard = Leaderboard::new();
    let mut skipped = 0;

    for post in posts {
        let Some(name) = post.author_name() else {
            skipped += 1;
            continue;
        };

        let missing = post.missing_counters();
        if !missing.is_empty() {
            debug!("Post {} has no {}; counting as 0", post.id_str, missing.join(", "));
        }

        leaderboard.entry_mut(name).record(post);
    }

    if skipped > 0 {
        debug!("Skipped {} posts without an author screen name", skipped);
    }
    info!("Leaderboard updated ({} participants)", leaderboard.len());
    leaderboard
}
