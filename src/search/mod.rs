//! Project search engine
//!
//! Text search is a weighted fuzzy match over the catalog (see [`fuzzy`]),
//! followed by attribute filters (stack, difficulty, duration, category,
//! library membership) and a final sort (see [`rank`]).
//!
//! The engine is an explicit service object: the fuzzy index is built once by
//! [`SearchEngine::initialize`]. Until then a text query is inert and every
//! project passes the text stage with a perfect score.

use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::catalog::{Catalog, Category, Difficulty, DurationBucket, Project};
use crate::library::LibrarySnapshot;

pub mod classify;
pub mod fuzzy;
pub mod rank;

pub use classify::{Classification, classify};
pub use fuzzy::{FuzzyIndex, FuzzyOptions, PROJECT_KEYS};
pub use rank::{SortBy, sort_results};

/// One search request. Empty axes do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub query: String,
    /// Case-insensitive substrings matched against stack entries.
    pub stack: Vec<String>,
    pub difficulty: Vec<String>,
    pub duration: Vec<String>,
    pub categories: Vec<String>,
    pub sort_by: SortBy,
    pub only_completed: bool,
    pub only_bookmarked: bool,
}

impl SearchFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_stack<I, S>(mut self, stack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack = stack.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_difficulty<I, S>(mut self, difficulty: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.difficulty = difficulty.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_duration<I, S>(mut self, duration: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duration = duration.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[must_use]
    pub const fn only_completed(mut self, value: bool) -> Self {
        self.only_completed = value;
        self
    }

    #[must_use]
    pub const fn only_bookmarked(mut self, value: bool) -> Self {
        self.only_bookmarked = value;
        self
    }
}

/// A project that passed every filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    pub project: &'a Project,
    /// 0..=1, 1 when no text query was applied.
    pub relevance_score: f64,
    /// Fields that matched the text query, for highlighting.
    pub matched_fields: Vec<&'static str>,
}

/// Selectable values for each filter axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub all_stacks: Vec<String>,
    pub difficulties: Vec<Difficulty>,
    pub durations: Vec<DurationBucket>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub fuzzy: FuzzyOptions,
    pub suggestion_limit: usize,
    /// Queries shorter than this (in characters) yield no suggestions.
    pub suggestion_min_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: FuzzyOptions::default(),
            suggestion_limit: 8,
            suggestion_min_len: 2,
        }
    }
}

pub struct SearchEngine {
    catalog: Arc<Catalog>,
    options: SearchOptions,
    index: OnceCell<FuzzyIndex>,
}

impl SearchEngine {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, options: SearchOptions) -> Self {
        Self {
            catalog,
            options,
            index: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn options(&self) -> SearchOptions {
        self.options
    }

    /// Build the fuzzy index. Safe to call any number of times, concurrently
    /// or not; the index is built exactly once.
    pub async fn initialize(&self) -> &FuzzyIndex {
        self.index
            .get_or_init(|| async {
                let started = Instant::now();
                let index = FuzzyIndex::build(&self.catalog, &PROJECT_KEYS, self.options.fuzzy);
                info!(
                    target: "search",
                    records = index.len(),
                    elapsed_us = started.elapsed().as_micros(),
                    "search index ready"
                );
                index
            })
            .await
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    /// Search without library constraints. `only_completed` and
    /// `only_bookmarked` match nothing here.
    #[must_use]
    pub fn search(&self, filters: &SearchFilters) -> Vec<SearchResult<'_>> {
        self.search_with_library(filters, None)
    }

    #[must_use]
    pub fn search_with_library(
        &self,
        filters: &SearchFilters,
        library: Option<&LibrarySnapshot>,
    ) -> Vec<SearchResult<'_>> {
        let started = Instant::now();
        let mut results = self.text_stage(&filters.query);
        let matched = results.len();

        results.retain(|result| passes_filters(result.project, filters, library));
        sort_results(&mut results, filters.sort_by);

        debug!(
            target: "search",
            query = %filters.query,
            text_matches = matched,
            results = results.len(),
            sort = %filters.sort_by,
            elapsed_us = started.elapsed().as_micros(),
            "search complete"
        );
        results
    }

    fn text_stage(&self, query: &str) -> Vec<SearchResult<'_>> {
        let projects = self.catalog.projects();
        if !query.is_empty() {
            if let Some(index) = self.index.get() {
                return index
                    .search(query)
                    .into_iter()
                    .map(|m| SearchResult {
                        project: &projects[m.index],
                        relevance_score: 1.0 - m.score,
                        matched_fields: m.matched_fields,
                    })
                    .collect();
            }
            debug!(target: "search", query, "index not ready, text query ignored");
        }

        projects
            .iter()
            .map(|project| SearchResult {
                project,
                relevance_score: 1.0,
                matched_fields: Vec::new(),
            })
            .collect()
    }

    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let all_stacks = self
            .catalog
            .iter()
            .flat_map(|p| p.stack.iter().cloned())
            .unique()
            .sorted()
            .collect();
        let categories = self
            .catalog
            .iter()
            .map(classify::derive_category)
            .unique()
            .sorted_by_key(|c| c.label())
            .collect();

        FilterOptions {
            all_stacks,
            difficulties: Difficulty::ALL.to_vec(),
            durations: DurationBucket::ALL.to_vec(),
            categories,
        }
    }

    /// Titles and stack entries containing `query`, case-insensitively, in
    /// catalog order without duplicates.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        if query.chars().count() < self.options.suggestion_min_len {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.catalog
            .iter()
            .flat_map(|p| std::iter::once(&p.title).chain(p.stack.iter()))
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .unique()
            .take(self.options.suggestion_limit)
            .cloned()
            .collect()
    }
}

fn passes_filters(project: &Project, filters: &SearchFilters, library: Option<&LibrarySnapshot>) -> bool {
    if !filters.stack.is_empty() {
        let wanted: Vec<String> = filters.stack.iter().map(|t| t.to_lowercase()).collect();
        let hit = project.stack.iter().any(|tech| {
            let tech = tech.to_lowercase();
            wanted.iter().any(|w| tech.contains(w.as_str()))
        });
        if !hit {
            return false;
        }
    }

    if !filters.difficulty.is_empty() {
        let bucket = classify::effective_difficulty(project).as_str();
        if !filters.difficulty.iter().any(|d| d == bucket) {
            return false;
        }
    }

    if !filters.duration.is_empty() {
        let bucket = classify::derive_duration(project).as_str();
        if !filters.duration.iter().any(|d| d == bucket) {
            return false;
        }
    }

    if !filters.categories.is_empty() {
        let category = classify::derive_category(project).label();
        if !filters.categories.iter().any(|c| c == category) {
            return false;
        }
    }

    if filters.only_completed && !library.is_some_and(|lib| lib.is_completed(&project.slug)) {
        return false;
    }
    if filters.only_bookmarked && !library.is_some_and(|lib| lib.is_bookmarked(&project.slug)) {
        return false;
    }

    true
}
