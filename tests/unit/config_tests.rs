use std::fs;
use std::path::PathBuf;

use tracereverse::config::{Config, StorageBackend};
use tracereverse::search::SortBy;
use tracereverse::test_utils::{TestCase, UnitTestFixture, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_search_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (0.4f64, 100u32, 8u32, SortBy::Relevance, None),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: (0.25f64, 100u32, 5u32, SortBy::Popularity, Some(10usize)),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let path = fixture_path(relative_path);
        let content = fs::read_to_string(&path).expect("read fixture");
        let config = Config::from_toml(&content).expect("parse config");
        (
            config.search.threshold,
            config.search.distance,
            config.search.suggestion_limit,
            config.search.default_sort,
            config.result_limit(),
        )
    })?;
    Ok(())
}

#[test]
fn config_storage_and_robot_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (StorageBackend::Sqlite, "tracereverse.db".to_string(), true),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: (StorageBackend::Memory, "tracereverse.db".to_string(), false),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let content = fs::read_to_string(fixture_path(relative_path)).expect("read fixture");
        let config = Config::from_toml(&content).expect("parse config");
        (
            config.storage.backend,
            config.storage.db_file,
            config.robot.include_metadata,
        )
    })?;
    Ok(())
}

#[test]
fn explicit_config_file_replaces_project_file() {
    let fixture = UnitTestFixture::new();
    let _project = fixture.create_config("[search]\nsuggestion_limit = 3\n");
    let explicit = fixture.create_file("other.toml", "[search]\nsuggestion_limit = 6\n");

    let config = Config::load(Some(&explicit), &fixture.data_path).unwrap();
    assert_eq!(config.search.suggestion_limit, 6);
}

#[test]
fn missing_explicit_file_yields_defaults() {
    let fixture = UnitTestFixture::new();
    let config = Config::load(Some(&fixture.data_path.join("absent.toml")), &fixture.data_path)
        .unwrap();
    assert_eq!(config.search.suggestion_limit, 8);
    assert_eq!(config.storage.db_file, "tracereverse.db");
}

#[test]
fn malformed_toml_is_a_config_error() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file("broken.toml", "[search\nthreshold = ");
    let err = Config::load(Some(&path), &fixture.data_path).unwrap_err();
    assert_eq!(err.code(), "config_error");
}

#[test]
fn search_options_follow_config() {
    let config = Config::from_toml("[search]\nthreshold = 0.1\nsuggestion_min_len = 3\n").unwrap();
    let options = config.to_search_options();
    assert!((options.fuzzy.threshold - 0.1).abs() < f64::EPSILON);
    assert_eq!(options.fuzzy.distance, 100);
    assert_eq!(options.suggestion_min_len, 3);
}
