//! Filter → score → rank.

use crate::filter::{filter_posts, FilterCriteria};
use crate::ranking::rank_posts;
use crate::scoring::{score_posts, RandomSource};
use crate::types::Post;
use crate::weights::WeightProfile;

/// Build the ranked feed for one render.
///
/// Scores are recomputed on every call, so with a nonzero serendipity weight
/// two calls over the same posts may order them differently.
pub fn build_feed(
    posts: &[Post],
    criteria: &FilterCriteria,
    weights: &WeightProfile,
    rng: &mut dyn RandomSource,
) -> Vec<Post> {
    let mut filtered = filter_posts(posts, criteria);
    score_posts(&mut filtered, weights, rng);
    let ranked = rank_posts(filtered);
    tracing::debug!(
        total = posts.len(),
        shown = ranked.len(),
        "built feed"
    );
    ranked
}
