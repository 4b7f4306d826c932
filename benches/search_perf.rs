//! Criterion benchmarks for catalog search.
//!
//! Targets:
//! - Index build: < 1ms
//! - Fuzzy query over the embedded catalog: < 500us
//! - Filter-only search: < 50us

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use tracereverse::catalog::Catalog;
use tracereverse::search::{FuzzyIndex, PROJECT_KEYS, SearchEngine, SearchFilters, SearchOptions, SortBy, classify};

fn engine() -> SearchEngine {
    let catalog = Arc::new(Catalog::embedded().expect("embedded catalog"));
    let engine = SearchEngine::new(catalog, SearchOptions::default());
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(engine.initialize());
    engine
}

fn index_benchmarks(c: &mut Criterion) {
    let catalog = Catalog::embedded().expect("embedded catalog");
    let options = SearchOptions::default().fuzzy;

    c.bench_function("index_build", |b| {
        b.iter(|| FuzzyIndex::build(black_box(&catalog), &PROJECT_KEYS, options));
    });

    c.bench_function("classify_catalog", |b| {
        b.iter(|| catalog.iter().map(classify).count());
    });
}

fn search_benchmarks(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("search");

    for query in ["portfolio", "react", "chat app", "xyzzyqw"] {
        let filters = SearchFilters::new().with_query(query);
        group.bench_function(format!("fuzzy_{}", query.replace(' ', "_")), |b| {
            b.iter(|| engine.search(black_box(&filters)).len());
        });
    }

    let filters = SearchFilters::new()
        .with_stack(["react"])
        .with_difficulty(["intermediate", "advanced"])
        .sorted_by(SortBy::Popularity);
    group.bench_function("filters_only", |b| {
        b.iter(|| engine.search(black_box(&filters)).len());
    });

    group.bench_function("suggestions", |b| {
        b.iter(|| engine.suggestions(black_box("re")));
    });

    group.finish();
}

criterion_group!(benches, index_benchmarks, search_benchmarks);
criterion_main!(benches);
