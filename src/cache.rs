//! Path-keyed cache of fetched feed documents.
//!
//! Entries carry their fetch time; freshness is checked by the caller against
//! its own TTL before reuse. Writes replace the whole entry.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedDocument {
    pub document: Value,
    pub fetched_at: DateTime<Utc>,
}

impl CachedDocument {
    /// Whether the entry is still inside the `ttl` window at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
        let Ok(ttl) = Duration::from_std(ttl) else {
            return true;
        };
        match self.fetched_at.checked_add_signed(ttl) {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: Mutex<HashMap<String, CachedDocument>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<CachedDocument> {
        self.entries.lock().get(path).cloned()
    }

    pub fn put(&self, path: &str, document: Value, fetched_at: DateTime<Utc>) {
        self.entries.lock().insert(
            path.to_string(),
            CachedDocument {
                document,
                fetched_at,
            },
        );
    }

    /// Drop one entry. Returns whether anything was cached for `path`.
    pub fn invalidate(&self, path: &str) -> bool {
        self.entries.lock().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration as StdDuration;

    #[test]
    fn put_then_get() {
        let cache = DocumentCache::new();
        let now = Utc::now();
        cache.put("data/posts.json", json!({ "posts": [] }), now);

        let entry = cache.get("data/posts.json").unwrap();
        assert_eq!(entry.document, json!({ "posts": [] }));
        assert_eq!(entry.fetched_at, now);
        assert!(cache.get("data/personas.json").is_none());
    }

    #[test]
    fn put_replaces_whole_entry() {
        let cache = DocumentCache::new();
        let now = Utc::now();
        cache.put("p", json!({ "a": 1 }), now);
        cache.put("p", json!({ "b": 2 }), now);
        assert_eq!(cache.get("p").unwrap().document, json!({ "b": 2 }));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn freshness_window() {
        let fetched_at = Utc::now();
        let entry = CachedDocument {
            document: json!({}),
            fetched_at,
        };
        let ttl = StdDuration::from_secs(3600);

        assert!(entry.is_fresh(fetched_at, ttl));
        assert!(entry.is_fresh(fetched_at + Duration::minutes(59), ttl));
        assert!(!entry.is_fresh(fetched_at + Duration::hours(1), ttl));
        assert!(!entry.is_fresh(fetched_at, StdDuration::ZERO));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = DocumentCache::new();
        let now = Utc::now();
        cache.put("a", json!({}), now);
        cache.put("b", json!({}), now);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
