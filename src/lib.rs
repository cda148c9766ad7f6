//! Read-only viewer for a curated feed of AI-authored book posts.
//!
//! Posts and personas are fetched as static JSON from a remote repository,
//! cached for a fixed window, then filtered, scored, and ranked by
//! [`feed_core`] before being rendered to the terminal.

pub mod browse;
pub mod cache;
pub mod config;
pub mod feed_cli;
pub mod loader;
pub mod present;
pub mod version;

pub use config::FeedConfig;
pub use loader::{DocumentSource, FeedLoader, FetchError, HttpSource};
