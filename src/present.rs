//! Terminal rendering of the ranked feed.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use console::style;
use feed_core::{FeedSummary, PersonaMap, Post};
use serde::Serialize;
use std::io::Write;

const DEFAULT_GLYPH: &str = "•";
const UNKNOWN_PERSONA: &str = "Unknown";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Display record for one post, with persona defaults already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub glyph: String,
    pub name: String,
    pub handle: String,
    pub specialty: String,
    pub content: String,
    pub hashtags: Vec<String>,
    /// (title, author)
    pub books: Vec<(String, String)>,
    pub learning: String,
    pub engagement: String,
    pub breakthrough: String,
    pub mood: String,
    pub timestamp: Option<String>,
}

impl PostView {
    pub fn build(post: &Post, personas: &PersonaMap) -> Self {
        let persona_id = post.persona_id.as_deref().unwrap_or("");
        let persona = personas.get(persona_id).cloned().unwrap_or_default();

        let name = persona.name.unwrap_or_else(|| match post.persona_id {
            Some(ref id) => id.clone(),
            None => UNKNOWN_PERSONA.to_string(),
        });

        Self {
            glyph: persona.glyph.unwrap_or_else(|| DEFAULT_GLYPH.to_string()),
            name,
            handle: persona.handle.unwrap_or_default(),
            specialty: persona.specialty.unwrap_or_default(),
            content: post.content.clone(),
            hashtags: post.hashtags.iter().map(|t| format!("#{t}")).collect(),
            books: post
                .book_references
                .iter()
                .map(|b| (b.title.clone(), b.author.clone()))
                .collect(),
            learning: format!("{:.2}", post.scores.learning()),
            engagement: format!("{:.2}", post.scores.engagement()),
            breakthrough: format!("{:.2}", post.scores.breakthrough()),
            mood: format!("{:.2}", post.scores.mood()),
            timestamp: format_timestamp(&post.timestamp),
        }
    }
}

/// Format an ISO-8601 timestamp as `YYYY-MM-DD HH:MM`.
///
/// A trailing `Z` is read as `+00:00`. Input that does not parse is returned
/// unchanged; empty input yields `None`.
pub fn format_timestamp(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let normalized = match raw.strip_suffix('Z') {
        Some(prefix) => format!("{prefix}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.format(TIMESTAMP_FORMAT).to_string());
    }
    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.format(TIMESTAMP_FORMAT).to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.format(TIMESTAMP_FORMAT).to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return Some(format!("{} 00:00", date.format("%Y-%m-%d")));
    }

    Some(raw.to_string())
}

fn write_post(out: &mut dyn Write, view: &PostView) -> Result<()> {
    let header = format!("{} {} {}", view.glyph, view.name, view.handle);
    writeln!(out, "{}", style(header.trim_end()).bold())?;
    if !view.specialty.is_empty() {
        writeln!(out, "{}", style(&view.specialty).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", view.content)?;

    if !view.hashtags.is_empty() {
        writeln!(out, "{}", style(view.hashtags.join(" ")).cyan())?;
    }

    for (title, author) in &view.books {
        writeln!(out, "{}", style(format!("📖 {title} by {author}")).dim())?;
    }

    writeln!(
        out,
        "📊 Learn {}  💬 Engage {}  ⚡ Break {}  😊 Mood {}",
        view.learning, view.engagement, view.breakthrough, view.mood
    )?;

    if let Some(ref ts) = view.timestamp {
        writeln!(out, "{}", style(format!("🕐 {ts}")).dim())?;
    }

    writeln!(out, "{}", style("─".repeat(60)).dim())?;
    Ok(())
}

/// Render the full page: header, stats row, posts, footer.
pub fn render_feed(
    out: &mut dyn Write,
    posts: &[Post],
    personas: &PersonaMap,
    summary: &FeedSummary,
    source_label: &str,
) -> Result<()> {
    writeln!(out, "{}", style("📚 Agentic Social Feed").bold().underlined())?;
    writeln!(
        out,
        "{}",
        style("AI-powered book content with neurochemical optimization").dim()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Posts: {}   Personas: {}   Preset: {}",
        style(summary.posts).bold(),
        style(summary.personas).bold(),
        style(summary.preset.title()).bold()
    )?;
    writeln!(out, "{}", style("═".repeat(60)).dim())?;

    for post in posts {
        write_post(out, &PostView::build(post, personas))?;
    }

    writeln!(out, "{}", style(format!("📡 Source: {source_label}")).dim())?;
    Ok(())
}

/// Ranked posts as pretty JSON, `_combined_score` included.
pub fn render_json(out: &mut dyn Write, posts: &[Post]) -> Result<()> {
    let json = serde_json::to_string_pretty(posts)?;
    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_core::{BookReference, Persona, Preset, Scores};

    fn personas() -> PersonaMap {
        let mut map = PersonaMap::new();
        map.insert(
            "sage".to_string(),
            Persona {
                glyph: Some("🦉".to_string()),
                name: Some("The Sage".to_string()),
                handle: Some("@sage".to_string()),
                specialty: Some("Philosophy".to_string()),
            },
        );
        map.insert(
            "bare".to_string(),
            Persona {
                name: Some("Bare".to_string()),
                ..Default::default()
            },
        );
        map
    }

    #[test]
    fn z_suffix_reads_as_utc() {
        assert_eq!(
            format_timestamp("2024-01-01T12:00:00Z").as_deref(),
            Some("2024-01-01 12:00")
        );
        assert_eq!(
            format_timestamp("2024-01-01T12:00:00+00:00"),
            format_timestamp("2024-01-01T12:00:00Z")
        );
    }

    #[test]
    fn other_iso_shapes_parse() {
        assert_eq!(
            format_timestamp("2024-03-05T08:15:30.123456").as_deref(),
            Some("2024-03-05 08:15")
        );
        assert_eq!(
            format_timestamp("2024-03-05T08:15:30-05:00").as_deref(),
            Some("2024-03-05 08:15")
        );
        assert_eq!(format_timestamp("2024-03-05").as_deref(), Some("2024-03-05 00:00"));
    }

    #[test]
    fn malformed_timestamp_falls_back_to_raw() {
        assert_eq!(format_timestamp("not-a-date").as_deref(), Some("not-a-date"));
        assert_eq!(format_timestamp(""), None);
    }

    #[test]
    fn view_uses_persona_fields() {
        let post = Post {
            persona_id: Some("sage".to_string()),
            content: "Know thyself".to_string(),
            hashtags: vec!["wisdom".to_string(), "greek".to_string()],
            book_references: vec![BookReference {
                title: "Apology".to_string(),
                author: "Plato".to_string(),
            }],
            scores: Scores {
                learning: Some(0.876),
                ..Default::default()
            },
            ..Default::default()
        };

        let view = PostView::build(&post, &personas());
        assert_eq!(view.glyph, "🦉");
        assert_eq!(view.name, "The Sage");
        assert_eq!(view.handle, "@sage");
        assert_eq!(view.specialty, "Philosophy");
        assert_eq!(view.hashtags, vec!["#wisdom", "#greek"]);
        assert_eq!(view.books, vec![("Apology".to_string(), "Plato".to_string())]);
        assert_eq!(view.learning, "0.88");
        assert_eq!(view.mood, "0.00");
        assert_eq!(view.timestamp, None);
    }

    #[test]
    fn view_defaults_for_partial_persona() {
        let post = Post {
            persona_id: Some("bare".to_string()),
            ..Default::default()
        };
        let view = PostView::build(&post, &personas());
        assert_eq!(view.glyph, DEFAULT_GLYPH);
        assert_eq!(view.name, "Bare");
        assert_eq!(view.handle, "");
        assert_eq!(view.specialty, "");
    }

    #[test]
    fn dangling_persona_falls_back_to_id() {
        let post = Post {
            persona_id: Some("ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(PostView::build(&post, &personas()).name, "ghost");

        let anonymous = Post::default();
        assert_eq!(PostView::build(&anonymous, &personas()).name, "Unknown");
    }

    #[test]
    fn render_includes_stats_and_posts() {
        console::set_colors_enabled(false);
        let posts = vec![Post {
            persona_id: Some("sage".to_string()),
            content: "Know thyself".to_string(),
            timestamp: "2024-01-01T12:00:00Z".to_string(),
            ..Default::default()
        }];
        let summary = FeedSummary::of(&posts, Preset::Creative);

        let mut out = Vec::new();
        render_feed(&mut out, &posts, &personas(), &summary, "github.com/o/r").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Posts: 1   Personas: 1   Preset: Creative"));
        assert!(text.contains("🦉 The Sage @sage"));
        assert!(text.contains("Know thyself"));
        assert!(text.contains("🕐 2024-01-01 12:00"));
        assert!(text.contains("📡 Source: github.com/o/r"));
    }

    #[test]
    fn json_output_carries_combined_score() {
        let posts = vec![Post {
            combined_score: Some(0.42),
            ..Default::default()
        }];
        let mut out = Vec::new();
        render_json(&mut out, &posts).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["_combined_score"], serde_json::json!(0.42));
    }
}
