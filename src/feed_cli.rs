//! CLI command handlers.

use crate::browse::{self, BrowseState};
use crate::config::FeedConfig;
use crate::loader::{DocumentSource, FeedLoader};
use crate::present;
use anyhow::Result;
use clap::Args;
use console::style;
use feed_core::{
    build_feed, FeedFacets, FeedSummary, FilterCriteria, Preset, RandomSource, ThreadRandom,
};
use serde::Serialize;
use std::io::Write;

const EMPTY_FEED: &str = "No posts available. Check your connection.";

#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Weight preset: balanced, scholar, social, creative, uplifting
    #[arg(short, long, default_value_t = Preset::Balanced)]
    pub preset: Preset,
    /// Only posts carrying this topic tag ("All" for no constraint)
    #[arg(short, long)]
    pub tag: Option<String>,
    /// Only posts from this imprint
    #[arg(short, long)]
    pub imprint: Option<String>,
    /// Only posts by this persona id
    #[arg(short = 'a', long)]
    pub persona: Option<String>,
    /// Show at most this many posts
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// Print ranked posts as JSON
    #[arg(long)]
    pub json: bool,
    /// Drop the random serendipity term for a reproducible order
    #[arg(long)]
    pub no_serendipity: bool,
}

impl ShowArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selectors(
            self.tag.as_deref(),
            self.imprint.as_deref(),
            self.persona.as_deref(),
        )
    }
}

fn print_notices(notices: &[String]) {
    for notice in notices {
        eprintln!("{} {}", style("warning:").yellow().bold(), notice);
    }
}

/// Handle the `show` subcommand against the configured remote feed.
pub fn handle_show(config: &FeedConfig, args: &ShowArgs) -> Result<()> {
    let loader = FeedLoader::from_config(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    show_feed(
        &loader,
        args,
        &config.source.display_name(),
        &mut out,
        &mut ThreadRandom,
    )?;
    print_notices(&loader.take_notices());
    Ok(())
}

/// Fetch, rank, and render one page of the feed.
pub fn show_feed<S: DocumentSource>(
    loader: &FeedLoader<S>,
    args: &ShowArgs,
    source_label: &str,
    out: &mut dyn Write,
    rng: &mut dyn RandomSource,
) -> Result<()> {
    let posts = loader.fetch_posts();
    let personas = loader.fetch_personas();

    if posts.is_empty() {
        if args.json {
            present::render_json(out, &[])?;
        } else {
            writeln!(out, "{}", style(EMPTY_FEED).yellow())?;
        }
        return Ok(());
    }

    let mut weights = args.preset.weights();
    if args.no_serendipity {
        weights = weights.without_serendipity();
    }

    let mut ranked = build_feed(&posts, &args.criteria(), &weights, rng);
    let summary = FeedSummary::of(&ranked, args.preset);
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    tracing::info!(
        preset = args.preset.as_str(),
        shown = ranked.len(),
        "rendering feed"
    );

    if args.json {
        present::render_json(out, &ranked)
    } else {
        present::render_feed(out, &ranked, &personas, &summary, source_label)
    }
}

#[derive(Serialize)]
struct FacetListing<'a> {
    presets: Vec<&'static str>,
    #[serde(flatten)]
    facets: &'a FeedFacets,
}

/// Handle the `facets` subcommand: list the values each selector offers.
pub fn handle_facets(config: &FeedConfig, json: bool) -> Result<()> {
    let loader = FeedLoader::from_config(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    list_facets(&loader, json, &mut out)?;
    print_notices(&loader.take_notices());
    Ok(())
}

pub fn list_facets<S: DocumentSource>(
    loader: &FeedLoader<S>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let posts = loader.fetch_posts();
    let personas = loader.fetch_personas();
    let facets = FeedFacets::collect(&posts, &personas);
    let presets: Vec<&'static str> = Preset::ALL.iter().map(|p| p.as_str()).collect();

    if json {
        let listing = FacetListing {
            presets,
            facets: &facets,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    for (label, values) in [
        ("Presets", presets.iter().map(|s| s.to_string()).collect::<Vec<String>>()),
        ("Tags", facets.tags.clone()),
        ("Imprints", facets.imprints.clone()),
        ("Personas", facets.personas.clone()),
    ] {
        writeln!(out, "{} ({})", style(label).bold(), values.len())?;
        for value in &values {
            writeln!(out, "  {value}")?;
        }
    }
    Ok(())
}

/// Handle the `browse` subcommand: the live dashboard.
pub fn handle_browse(config: &FeedConfig, preset: Preset, no_serendipity: bool) -> Result<()> {
    let loader = FeedLoader::from_config(config)?;
    let state = BrowseState::new(preset, !no_serendipity);
    browse::tui::run(&loader, state, &config.source.display_name())
}
