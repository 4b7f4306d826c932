//! Project catalog
//!
//! The catalog is an ordered, read-only collection of project records. It is
//! loaded once (normally from the JSON embedded in the binary) and shared via
//! `Arc` by the search engine and the progress managers.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TrError};

pub mod types;

pub use types::{Category, Difficulty, DurationBucket, Project};

const EMBEDDED_PROJECTS: &str = include_str!("../../data/projects.json");

/// Ordered collection of projects with unique slugs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or empty slugs.
    pub fn from_projects(projects: Vec<Project>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(projects.len());
        for project in &projects {
            if project.slug.trim().is_empty() {
                return Err(TrError::Catalog(format!(
                    "project {:?} has an empty slug",
                    project.title
                )));
            }
            if !seen.insert(project.slug.as_str()) {
                return Err(TrError::Catalog(format!(
                    "duplicate slug {}",
                    project.slug
                )));
            }
        }
        Ok(Self { projects })
    }

    /// Parse a JSON array of project records.
    pub fn from_json(raw: &str) -> Result<Self> {
        let projects: Vec<Project> = serde_json::from_str(raw)
            .map_err(|err| TrError::Catalog(format!("parse catalog: {err}")))?;
        Self::from_projects(projects)
    }

    /// The catalog shipped with the binary.
    pub fn embedded() -> Result<Self> {
        let catalog = Self::from_json(EMBEDDED_PROJECTS)?;
        debug!(target: "catalog", projects = catalog.len(), "loaded embedded catalog");
        Ok(catalog)
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Project> {
        self.projects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Like [`Catalog::get`] but reports a missing slug as an error.
    pub fn require(&self, slug: &str) -> Result<&Project> {
        self.get(slug)
            .ok_or_else(|| TrError::ProjectNotFound(slug.to_string()))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Project;
    type IntoIter = std::slice::Iter<'a, Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
