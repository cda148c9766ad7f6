//! Core types for curated posts and personas.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decode a field, falling back to its default when the value has the wrong
/// shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list, keeping the elements that decode and dropping the rest.
/// A non-list value reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A curated post from the remote feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Key into the persona mapping. May be absent or dangling.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    /// Topic tags used for filtering.
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    /// Publisher or series label.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub imprint: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scores: Scores,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub hashtags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub book_references: Vec<BookReference>,
    /// ISO-8601 timestamp, passed through verbatim.
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
    /// Ranking score attached by the scorer. Never read from the feed.
    #[serde(
        rename = "_combined_score",
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub combined_score: Option<f64>,
}

/// The four per-post signals the feed is weighted on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Scores {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub learning: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub breakthrough: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
}

impl Scores {
    pub fn learning(&self) -> f64 {
        self.learning.unwrap_or(0.0)
    }

    pub fn engagement(&self) -> f64 {
        self.engagement.unwrap_or(0.0)
    }

    pub fn breakthrough(&self) -> f64 {
        self.breakthrough.unwrap_or(0.0)
    }

    pub fn mood(&self) -> f64 {
        self.mood.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookReference {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub author: String,
}

/// Display identity of the synthetic author of a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

/// Personas keyed by `persona_id`, in sorted key order.
pub type PersonaMap = BTreeMap<String, Persona>;

impl Post {
    /// Whether the post carries `tag` in its tag set.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Decode the `posts` array of a `posts.json` document.
///
/// A missing or mistyped `posts` key yields an empty list. A field with the
/// wrong type reads as its default; an entry that is not an object at all is
/// skipped on its own so one bad post does not hide the rest.
pub fn posts_from_document(document: &Value) -> Vec<Post> {
    let Some(entries) = document.get("posts").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match Post::deserialize(entry) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Skipping malformed post at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Decode the `personas` mapping of a `personas.json` document.
pub fn personas_from_document(document: &Value) -> PersonaMap {
    let Some(entries) = document.get("personas").and_then(Value::as_object) else {
        return PersonaMap::new();
    };

    entries
        .iter()
        .filter_map(|(id, entry)| match Persona::deserialize(entry) {
            Ok(persona) => Some((id.clone(), persona)),
            Err(e) => {
                tracing::warn!("Skipping malformed persona {}: {}", id, e);
                None
            }
        })
        .collect()
}
