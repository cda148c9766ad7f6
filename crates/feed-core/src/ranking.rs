//! Post ranking and feed summary.

use crate::types::Post;
use crate::weights::Preset;
use serde::Serialize;
use std::collections::HashSet;

/// Sort posts by `combined_score` descending.
///
/// The sort is stable, so ties keep their incoming order. Posts that were never
/// scored rank as 0.0.
pub fn rank_posts(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| {
        let a = a.combined_score.unwrap_or(0.0);
        let b = b.combined_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    posts
}

/// Stats row shown above the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSummary {
    pub posts: usize,
    /// Distinct persona ids among the ranked posts. Posts without a persona
    /// count together as one value.
    pub personas: usize,
    pub preset: Preset,
}

impl FeedSummary {
    pub fn of(posts: &[Post], preset: Preset) -> Self {
        let personas: HashSet<Option<&str>> =
            posts.iter().map(|p| p.persona_id.as_deref()).collect();
        Self {
            posts: posts.len(),
            personas: personas.len(),
            preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(persona: &str, score: Option<f64>) -> Post {
        Post {
            persona_id: Some(persona.to_string()),
            combined_score: score,
            ..Default::default()
        }
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().filter_map(|p| p.persona_id.as_deref()).collect()
    }

    #[test]
    fn sorts_descending() {
        let ranked = rank_posts(vec![
            scored("low", Some(0.1)),
            scored("high", Some(0.9)),
            scored("mid", Some(0.5)),
        ]);
        assert_eq!(ids(&ranked), vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_keep_feed_order() {
        let ranked = rank_posts(vec![
            scored("first", Some(0.5)),
            scored("top", Some(0.7)),
            scored("second", Some(0.5)),
            scored("third", Some(0.5)),
        ]);
        assert_eq!(ids(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn unscored_posts_rank_as_zero() {
        let ranked = rank_posts(vec![
            scored("none", None),
            scored("negative", Some(-0.2)),
            scored("positive", Some(0.2)),
        ]);
        assert_eq!(ids(&ranked), vec!["positive", "none", "negative"]);
    }

    #[test]
    fn summary_counts_distinct_personas() {
        let mut posts = vec![
            scored("a", Some(1.0)),
            scored("a", Some(0.5)),
            scored("b", Some(0.2)),
        ];
        posts.push(Post::default());
        posts.push(Post::default());

        let summary = FeedSummary::of(&posts, Preset::Scholar);
        assert_eq!(summary.posts, 5);
        assert_eq!(summary.personas, 3);
        assert_eq!(summary.preset, Preset::Scholar);
    }
}
