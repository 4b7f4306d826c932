//! tracereverse search - Search and filter projects

use std::time::Instant;

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::SearchReport;
use crate::error::Result;
use crate::search::{SearchFilters, SortBy};

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free-text query (fuzzy matched against title, description, stack...)
    pub query: Option<String>,

    /// Keep projects whose stack contains this technology (repeatable)
    #[arg(long, short)]
    pub stack: Vec<String>,

    /// beginner, intermediate or advanced (repeatable)
    #[arg(long, short)]
    pub difficulty: Vec<String>,

    /// short, medium or long (repeatable)
    #[arg(long)]
    pub duration: Vec<String>,

    /// Derived category label, e.g. "Frontend Framework" (repeatable)
    #[arg(long, short)]
    pub category: Vec<String>,

    /// Sort order (defaults to search.default_sort)
    #[arg(long, value_enum)]
    pub sort: Option<SortBy>,

    /// Only projects in your completed list
    #[arg(long)]
    pub completed: bool,

    /// Only projects you bookmarked
    #[arg(long)]
    pub bookmarked: bool,

    /// Maximum number of results (defaults to search.result_limit)
    #[arg(long, short)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    #[must_use]
    pub fn to_filters(&self, default_sort: SortBy) -> SearchFilters {
        SearchFilters::new()
            .with_query(self.query.clone().unwrap_or_default())
            .with_stack(self.stack.iter().cloned())
            .with_difficulty(self.difficulty.iter().cloned())
            .with_duration(self.duration.iter().cloned())
            .with_categories(self.category.iter().cloned())
            .sorted_by(self.sort.unwrap_or(default_sort))
            .only_completed(self.completed)
            .only_bookmarked(self.bookmarked)
    }
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let started = Instant::now();
    let filters = args.to_filters(ctx.config.search.default_sort);
    let snapshot = ctx.library().snapshot()?;

    let results = ctx.engine.search_with_library(&filters, Some(&snapshot));
    let limit = args.limit.or_else(|| ctx.config.result_limit());
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let report =
        SearchReport::new(filters.query.clone(), filters.sort_by, &results, limit).with_duration(elapsed_ms);

    if ctx.robot_mode() {
        super::emit(ctx, &report)
    } else {
        print!("{}", report.format_human());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_filters() {
        let args = SearchArgs {
            query: Some("react".to_string()),
            stack: vec!["Node".to_string()],
            difficulty: vec!["advanced".to_string()],
            bookmarked: true,
            ..SearchArgs::default()
        };
        let filters = args.to_filters(SortBy::Popularity);
        assert_eq!(filters.query, "react");
        assert_eq!(filters.stack, vec!["Node"]);
        assert_eq!(filters.difficulty, vec!["advanced"]);
        assert_eq!(filters.sort_by, SortBy::Popularity);
        assert!(filters.only_bookmarked);
        assert!(!filters.only_completed);
    }

    #[test]
    fn explicit_sort_overrides_default() {
        let args = SearchArgs {
            sort: Some(SortBy::Newest),
            ..SearchArgs::default()
        };
        assert_eq!(args.to_filters(SortBy::Relevance).sort_by, SortBy::Newest);
    }
}
