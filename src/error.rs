//! Error types for tracereverse

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrError>;

#[derive(Error, Debug)]
pub enum TrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Learning path not found: {0}")]
    PathNotFound(String),

    #[error("Progress entry not found: {0}")]
    EntryNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for TrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl TrError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::Sqlite(_) => "database_error",
            Self::Config(_) | Self::MissingConfig(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
            Self::Catalog(_) => "catalog_error",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::PathNotFound(_) => "path_not_found",
            Self::EntryNotFound(_) => "entry_not_found",
            Self::Validation(_) => "validation_failed",
        }
    }
}
