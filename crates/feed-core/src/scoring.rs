//! Weighted post scoring with a random serendipity term.

use crate::types::Post;
use crate::weights::WeightProfile;

/// Source of uniform samples in `[0, 1)` for the serendipity term.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Samples from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Always returns the same sample. Values outside `[0, 1)` are clamped into it.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Deterministic part of the score: the weighted sum of the four signals.
pub fn base_score(post: &Post, weights: &WeightProfile) -> f64 {
    let s = &post.scores;
    s.learning() * weights.learning
        + s.engagement() * weights.engagement
        + s.breakthrough() * weights.breakthrough
        + s.mood() * weights.mood
}

/// Combined score = base + uniform[0,1) * serendipity. Not normalized or clamped.
pub fn score(post: &Post, weights: &WeightProfile, rng: &mut dyn RandomSource) -> f64 {
    base_score(post, weights) + rng.next_unit() * weights.serendipity
}

/// Score every post and attach the result as its `combined_score`.
/// The serendipity term is resampled on each call.
pub fn score_posts(posts: &mut [Post], weights: &WeightProfile, rng: &mut dyn RandomSource) {
    for post in posts.iter_mut() {
        post.combined_score = Some(score(post, weights, rng));
    }
}
