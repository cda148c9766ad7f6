//! Post filtering by tag, imprint, and persona, plus facet collection for
//! populating the filter selectors.

use crate::types::{PersonaMap, Post};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selector value meaning "no constraint" at the presentation boundary.
pub const ALL_SENTINEL: &str = "All";

/// Up to three independent predicates, combined with logical AND.
/// `None` or an empty string imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn selector_value(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() && v != ALL_SENTINEL => Some(v.to_string()),
        _ => None,
    }
}

impl FilterCriteria {
    /// Build criteria from selector values, treating `"All"` and empty strings
    /// as "no constraint".
    pub fn from_selectors(tag: Option<&str>, imprint: Option<&str>, persona: Option<&str>) -> Self {
        Self {
            tag: selector_value(tag),
            imprint: selector_value(imprint),
            persona: selector_value(persona),
        }
    }

    pub fn is_empty(&self) -> bool {
        active(&self.tag).is_none()
            && active(&self.imprint).is_none()
            && active(&self.persona).is_none()
    }

    /// True iff every active predicate holds for `post`.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(tag) = active(&self.tag) {
            if !post.has_tag(tag) {
                return false;
            }
        }
        if let Some(imprint) = active(&self.imprint) {
            if post.imprint.as_deref() != Some(imprint) {
                return false;
            }
        }
        if let Some(persona) = active(&self.persona) {
            if post.persona_id.as_deref() != Some(persona) {
                return false;
            }
        }
        true
    }
}

/// Return the posts that satisfy `criteria`, preserving feed order.
/// The input slice is left untouched.
pub fn filter_posts(posts: &[Post], criteria: &FilterCriteria) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

/// Distinct values observed in the feed, sorted, for the filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFacets {
    pub tags: Vec<String>,
    pub imprints: Vec<String>,
    pub personas: Vec<String>,
}

impl FeedFacets {
    pub fn collect(posts: &[Post], personas: &PersonaMap) -> Self {
        let mut tags = BTreeSet::new();
        let mut imprints = BTreeSet::new();
        for post in posts {
            tags.extend(post.tags.iter().cloned());
            if let Some(imprint) = post.imprint.as_ref().filter(|i| !i.is_empty()) {
                imprints.insert(imprint.clone());
            }
        }

        Self {
            tags: tags.into_iter().collect(),
            imprints: imprints.into_iter().collect(),
            personas: personas.keys().cloned().collect(),
        }
    }
}
