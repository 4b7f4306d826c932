use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use tracereverse::catalog::Catalog;
use tracereverse::search::{SearchEngine, SearchFilters, SearchOptions, SortBy};

fn ready_engine() -> SearchEngine {
    let engine = SearchEngine::new(
        Arc::new(Catalog::embedded().unwrap()),
        SearchOptions::default(),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(engine.initialize());
    engine
}

fn sort_strategy() -> impl Strategy<Value = SortBy> {
    prop_oneof![
        Just(SortBy::Relevance),
        Just(SortBy::Difficulty),
        Just(SortBy::Duration),
        Just(SortBy::Popularity),
        Just(SortBy::Newest),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_search_is_deterministic(query in "[a-zA-Z ]{0,12}", sort in sort_strategy()) {
        let engine = ready_engine();
        let filters = SearchFilters::new().with_query(query).sorted_by(sort);
        let first: Vec<_> = engine.search(&filters).iter().map(|r| r.project.slug.clone()).collect();
        let second: Vec<_> = engine.search(&filters).iter().map(|r| r.project.slug.clone()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_scores_stay_in_unit_range(query in "[a-zA-Z]{1,40}") {
        let engine = ready_engine();
        for result in engine.search(&SearchFilters::new().with_query(query)) {
            prop_assert!((0.0..=1.0).contains(&result.relevance_score));
        }
    }

    #[test]
    fn test_relevance_order_non_increasing(query in "[a-z]{2,10}") {
        let engine = ready_engine();
        let results = engine.search(&SearchFilters::new().with_query(query));
        for pair in results.windows(2) {
            prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[test]
    fn test_filters_only_narrow(query in "[a-z]{0,6}", stack in "[a-z]{1,4}") {
        let engine = ready_engine();
        let broad = SearchFilters::new().with_query(query);
        let narrow = broad.clone().with_stack([stack]);
        let broad: HashSet<_> = engine.search(&broad).iter().map(|r| r.project.slug.clone()).collect();
        let narrow: HashSet<_> = engine.search(&narrow).iter().map(|r| r.project.slug.clone()).collect();
        prop_assert!(narrow.is_subset(&broad));
    }

    #[test]
    fn test_suggestions_bounded_and_unique(query in "[a-zA-Z.]{0,6}") {
        let engine = ready_engine();
        let suggestions = engine.suggestions(&query);
        prop_assert!(suggestions.len() <= 8);
        let unique: HashSet<_> = suggestions.iter().collect();
        prop_assert_eq!(unique.len(), suggestions.len());
    }
}
