use std::sync::Arc;

use tracereverse::search::{SearchEngine, SearchFilters, SearchOptions, SortBy};
use tracereverse::test_utils::{TestCase, run_table_tests, sample_catalog};

fn search_slugs(filters: SearchFilters) -> Vec<String> {
    let engine = SearchEngine::new(Arc::new(sample_catalog()), SearchOptions::default());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(engine.initialize());
    engine
        .search(&filters)
        .iter()
        .map(|r| r.project.slug.clone())
        .collect()
}

fn case(
    name: &'static str,
    input: SearchFilters,
    expected: &[&str],
) -> TestCase<SearchFilters, Vec<String>> {
    TestCase {
        name,
        input,
        expected: expected.iter().map(ToString::to_string).collect(),
        should_panic: false,
    }
}

#[test]
fn filter_axes() -> Result<(), String> {
    let cases = vec![
        case(
            "no filters",
            SearchFilters::new(),
            &["portfolio", "react-todo", "rest-api", "fullstack-shop", "python-cli"],
        ),
        case(
            "stack substring",
            SearchFilters::new().with_stack(["node"]),
            &["rest-api", "fullstack-shop"],
        ),
        case(
            "any of several stack tokens",
            SearchFilters::new().with_stack(["python", "express"]),
            &["rest-api", "python-cli"],
        ),
        case(
            "ground truth and derived difficulty",
            SearchFilters::new().with_difficulty(["beginner"]),
            &["portfolio", "python-cli"],
        ),
        case(
            "derived category",
            SearchFilters::new().with_categories(["Backend/API"]),
            &["rest-api"],
        ),
        case(
            "axes are AND-combined",
            SearchFilters::new()
                .with_stack(["react"])
                .with_difficulty(["advanced"]),
            &["fullstack-shop"],
        ),
        case(
            "duration bucket",
            SearchFilters::new().with_duration(["long"]),
            &[],
        ),
        case(
            "case-sensitive difficulty token",
            SearchFilters::new().with_difficulty(["Beginner"]),
            &[],
        ),
    ];
    run_table_tests(cases, search_slugs)
}

#[test]
fn sort_orders() -> Result<(), String> {
    let cases = vec![
        case(
            "difficulty ascending, stable",
            SearchFilters::new().sorted_by(SortBy::Difficulty),
            &["portfolio", "python-cli", "react-todo", "rest-api", "fullstack-shop"],
        ),
        case(
            "popularity descending, stable",
            SearchFilters::new().sorted_by(SortBy::Popularity),
            &["react-todo", "portfolio", "fullstack-shop", "rest-api", "python-cli"],
        ),
        case(
            "newest reverses",
            SearchFilters::new().sorted_by(SortBy::Newest),
            &["python-cli", "fullstack-shop", "rest-api", "react-todo", "portfolio"],
        ),
        case(
            "duration ties keep catalog order",
            SearchFilters::new().sorted_by(SortBy::Duration),
            &["portfolio", "react-todo", "rest-api", "fullstack-shop", "python-cli"],
        ),
    ];
    run_table_tests(cases, search_slugs)
}

#[tokio::test]
async fn text_query_scores_are_non_increasing() {
    let engine = SearchEngine::new(Arc::new(sample_catalog()), SearchOptions::default());
    engine.initialize().await;
    let results = engine.search(&SearchFilters::new().with_query("react"));
    assert!(!results.is_empty());
    assert!(
        results
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score)
    );
    assert!(results.iter().all(|r| !r.matched_fields.is_empty()));
}

#[tokio::test]
async fn title_match_ranks_first() {
    let engine = SearchEngine::new(Arc::new(sample_catalog()), SearchOptions::default());
    engine.initialize().await;
    let results = engine.search(&SearchFilters::new().with_query("Python CLI"));
    assert_eq!(results[0].project.slug, "python-cli");
}
