//! Post and persona types, weighted scoring, filtering, and ranking for
//! agentic-feed.
//!
//! Nothing in this crate performs I/O. Callers hand in decoded feed documents
//! and get back a ranked list of posts with `combined_score` attached.

pub mod filter;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod types;
pub mod weights;

pub use filter::{filter_posts, FeedFacets, FilterCriteria, ALL_SENTINEL};
pub use pipeline::build_feed;
pub use ranking::{rank_posts, FeedSummary};
pub use scoring::{score, score_posts, FixedRandom, RandomSource, ThreadRandom};
pub use types::{
    personas_from_document, posts_from_document, BookReference, Persona, PersonaMap, Post, Scores,
};
pub use weights::{Preset, UnknownPreset, WeightProfile, DEFAULT_SERENDIPITY};
