//! Interactive feed browser: selector state and the live dashboard.

pub mod tui;

use crate::loader::{DocumentSource, FeedLoader};
use feed_core::{
    build_feed, FeedFacets, FeedSummary, FilterCriteria, PersonaMap, Post, Preset, RandomSource,
    ALL_SENTINEL,
};

/// A selector whose first option is always "All".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    options: Vec<String>,
    index: usize,
}

impl Selector {
    fn with_values(values: &[String]) -> Self {
        let mut options = Vec::with_capacity(values.len() + 1);
        options.push(ALL_SENTINEL.to_string());
        options.extend(values.iter().cloned());
        Self { options, index: 0 }
    }

    /// Swap in fresh values, keeping the current choice if it still exists.
    fn replace_values(&mut self, values: &[String]) {
        let current = self.selected().to_string();
        *self = Self::with_values(values);
        if let Some(index) = self.options.iter().position(|o| *o == current) {
            self.index = index;
        }
    }

    pub fn selected(&self) -> &str {
        self.options
            .get(self.index)
            .map(String::as_str)
            .unwrap_or(ALL_SENTINEL)
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + self.options.len() - 1) % self.options.len();
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Everything the dashboard shows for one render.
pub struct BrowseState {
    pub preset: Preset,
    pub tag: Selector,
    pub imprint: Selector,
    pub persona: Selector,
    pub posts: Vec<Post>,
    pub personas: PersonaMap,
    pub ranked: Vec<Post>,
    pub notices: Vec<String>,
    pub scroll: u16,
    serendipity: bool,
}

impl BrowseState {
    pub fn new(preset: Preset, serendipity: bool) -> Self {
        Self {
            preset,
            tag: Selector::with_values(&[]),
            imprint: Selector::with_values(&[]),
            persona: Selector::with_values(&[]),
            posts: Vec::new(),
            personas: PersonaMap::new(),
            ranked: Vec::new(),
            notices: Vec::new(),
            scroll: 0,
            serendipity,
        }
    }

    /// Pull posts and personas through the loader and repopulate selectors.
    pub fn load<S: DocumentSource>(&mut self, loader: &FeedLoader<S>) {
        self.posts = loader.fetch_posts();
        self.personas = loader.fetch_personas();
        self.notices.extend(loader.take_notices());

        let facets = FeedFacets::collect(&self.posts, &self.personas);
        self.tag.replace_values(&facets.tags);
        self.imprint.replace_values(&facets.imprints);
        self.persona.replace_values(&facets.personas);
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selectors(
            Some(self.tag.selected()),
            Some(self.imprint.selected()),
            Some(self.persona.selected()),
        )
    }

    /// Re-run filter, scoring, and ranking. Called after every control change,
    /// so the serendipity term is resampled each time.
    pub fn rebuild(&mut self, rng: &mut dyn RandomSource) {
        let mut weights = self.preset.weights();
        if !self.serendipity {
            weights = weights.without_serendipity();
        }
        self.ranked = build_feed(&self.posts, &self.criteria(), &weights, rng);
        self.scroll = 0;
    }

    pub fn summary(&self) -> FeedSummary {
        FeedSummary::of(&self.ranked, self.preset)
    }

    pub fn next_preset(&mut self) {
        let index = Preset::ALL
            .iter()
            .position(|p| *p == self.preset)
            .unwrap_or(0);
        self.preset = Preset::ALL[(index + 1) % Preset::ALL.len()];
    }

    pub fn clear_filters(&mut self) {
        self.tag.reset();
        self.imprint.reset();
        self.persona.reset();
    }
}
