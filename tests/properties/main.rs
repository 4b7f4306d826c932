mod determinism_tests;
mod search_properties;
