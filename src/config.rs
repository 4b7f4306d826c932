use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{Result, TrError};
use crate::search::{FuzzyOptions, SearchOptions, SortBy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("TRACEREVERSE_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a single TOML document over the defaults, without env overrides.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| TrError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("tracereverse/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        let path = root.join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| TrError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| TrError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if env_bool("TRACEREVERSE_ROBOT").unwrap_or(false) {
            self.robot.format = OutputFormat::Json;
        }

        if let Some(value) = env_f64("TRACEREVERSE_SEARCH_THRESHOLD")? {
            self.search.threshold = value;
        }
        if let Some(value) = env_u32("TRACEREVERSE_SEARCH_DISTANCE")? {
            self.search.distance = value;
        }
        if let Some(value) = env_u32("TRACEREVERSE_SUGGESTION_LIMIT")? {
            self.search.suggestion_limit = value;
        }
        if let Some(value) = env_string("TRACEREVERSE_DEFAULT_SORT") {
            self.search.default_sort = value
                .parse()
                .map_err(|_| TrError::Config(format!("invalid TRACEREVERSE_DEFAULT_SORT value {value}")))?;
        }
        if let Some(value) = env_string("TRACEREVERSE_STORAGE_BACKEND") {
            self.storage.backend = parse_backend(&value)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(TrError::Config(format!(
                "search.threshold {} out of range (0.0-1.0)",
                self.search.threshold
            )));
        }
        if self.search.distance == 0 {
            return Err(TrError::Config("search.distance must be positive".to_string()));
        }
        if self.storage.db_file.trim().is_empty() {
            return Err(TrError::Config("storage.db_file is empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_search_options(&self) -> SearchOptions {
        SearchOptions {
            fuzzy: FuzzyOptions {
                threshold: self.search.threshold,
                distance: self.search.distance as usize,
                ..FuzzyOptions::default()
            },
            suggestion_limit: self.search.suggestion_limit as usize,
            suggestion_min_len: self.search.suggestion_min_len as usize,
        }
    }

    /// `None` when results are unlimited.
    #[must_use]
    pub const fn result_limit(&self) -> Option<usize> {
        match self.search.result_limit {
            0 => None,
            n => Some(n as usize),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub threshold: f64,
    pub distance: u32,
    pub suggestion_limit: u32,
    pub suggestion_min_len: u32,
    pub default_sort: SortBy,
    /// 0 = unlimited.
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            distance: 100,
            suggestion_limit: 8,
            suggestion_min_len: 2,
            default_sort: SortBy::Relevance,
            result_limit: 0,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.threshold {
            self.threshold = value;
        }
        if let Some(value) = patch.distance {
            self.distance = value;
        }
        if let Some(value) = patch.suggestion_limit {
            self.suggestion_limit = value;
        }
        if let Some(value) = patch.suggestion_min_len {
            self.suggestion_min_len = value;
        }
        if let Some(value) = patch.default_sort {
            self.default_sort = value;
        }
        if let Some(value) = patch.result_limit {
            self.result_limit = value;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Relative to the data root.
    pub db_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            db_file: "tracereverse.db".to_string(),
        }
    }
}

impl StorageConfig {
    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.db_file {
            self.db_file = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Output format when neither `--robot` nor `--format` is given.
    pub format: OutputFormat,
    pub include_metadata: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            include_metadata: true,
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
        if let Some(value) = patch.include_metadata {
            self.include_metadata = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub storage: Option<StoragePatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub threshold: Option<f64>,
    pub distance: Option<u32>,
    pub suggestion_limit: Option<u32>,
    pub suggestion_min_len: Option<u32>,
    pub default_sort: Option<SortBy>,
    pub result_limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    pub backend: Option<StorageBackend>,
    pub db_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<OutputFormat>,
    pub include_metadata: Option<bool>,
}

fn parse_backend(value: &str) -> Result<StorageBackend> {
    match value.to_lowercase().as_str() {
        "sqlite" => Ok(StorageBackend::Sqlite),
        "memory" => Ok(StorageBackend::Memory),
        _ => Err(TrError::Config(format!(
            "invalid storage backend {value} (expected sqlite|memory)"
        ))),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u32>().map(Some).map_err(|err| {
            TrError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<f64>().map(Some).map_err(|err| {
            TrError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_search_defaults() {
        let config = Config::default();
        assert_eq!(config.to_search_options(), SearchOptions::default());
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.result_limit(), None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [search]
            threshold = 0.2
            default_sort = "popularity"

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();
        assert!((config.search.threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.search.distance, 100);
        assert_eq!(config.search.default_sort, SortBy::Popularity);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.db_file, "tracereverse.db");
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = Config::from_toml("[search]\nthreshold = 1.5\n").unwrap_err();
        assert!(matches!(err, TrError::Config(_)));
    }

    #[test]
    fn zero_distance_is_rejected() {
        assert!(Config::from_toml("[search]\ndistance = 0\n").is_err());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Config::from_toml("[storage]\nbackend = \"redis\"\n").is_err());
        assert!(parse_backend("redis").is_err());
        assert_eq!(parse_backend("SQLite").unwrap(), StorageBackend::Sqlite);
    }

    #[test]
    fn robot_format_defaults_to_human() {
        assert_eq!(Config::default().robot.format, OutputFormat::Human);
        let config = Config::from_toml("[robot]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.robot.format, OutputFormat::Json);
        assert!(Config::from_toml("[robot]\nformat = \"yaml\"\n").is_err());
    }

    #[test]
    fn result_limit_zero_means_unlimited() {
        let config = Config::from_toml("[search]\nresult_limit = 5\n").unwrap();
        assert_eq!(config.result_limit(), Some(5));
    }
}
