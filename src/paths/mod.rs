//! Learning paths: a static catalog of curated project sequences plus each
//! user's progress through them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Difficulty;
use crate::error::{Result, TrError};
use crate::library::LibrarySnapshot;
use crate::storage::{KeyValueStore, load_json, save_json};

pub const STORAGE_KEY: &str = "tracereverse_learning_paths";

const EMBEDDED_PATHS: &str = include_str!("../../data/learning_paths.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    /// Project slugs, in the order they should be built.
    pub projects: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<Certification>,
}

#[derive(Debug, Clone, Default)]
pub struct LearningPathCatalog {
    paths: Vec<LearningPath>,
}

impl LearningPathCatalog {
    pub fn from_json(raw: &str) -> Result<Self> {
        let paths: Vec<LearningPath> = serde_json::from_str(raw)
            .map_err(|err| TrError::Catalog(format!("learning paths: {err}")))?;
        Ok(Self { paths })
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_PATHS)
    }

    #[must_use]
    pub fn paths(&self) -> &[LearningPath] {
        &self.paths
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LearningPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&LearningPath> {
        self.get(id)
            .ok_or_else(|| TrError::PathNotFound(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub path_id: String,
    pub user_id: String,
    pub current_project_index: usize,
    #[serde(default)]
    pub completed_projects: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skills_acquired: Vec<String>,
    /// Minutes.
    #[serde(default)]
    pub time_spent: u64,
}

/// Partial update applied by [`LearningPathManager::update_progress`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LearningProgressUpdate {
    pub current_project_index: Option<usize>,
    pub completed_projects: Option<Vec<String>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub skills_acquired: Option<Vec<String>>,
    pub time_spent: Option<u64>,
}

impl LearningProgressUpdate {
    fn apply(self, progress: &mut LearningProgress) {
        if let Some(v) = self.current_project_index {
            progress.current_project_index = v;
        }
        if let Some(v) = self.completed_projects {
            progress.completed_projects = v;
        }
        if let Some(v) = self.estimated_completion {
            progress.estimated_completion = Some(v);
        }
        if let Some(v) = self.skills_acquired {
            progress.skills_acquired = v;
        }
        if let Some(v) = self.time_spent {
            progress.time_spent = v;
        }
    }
}

pub struct LearningPathManager {
    store: Arc<dyn KeyValueStore>,
    paths: Arc<LearningPathCatalog>,
}

impl LearningPathManager {
    pub fn new(store: Arc<dyn KeyValueStore>, paths: Arc<LearningPathCatalog>) -> Self {
        Self { store, paths }
    }

    #[must_use]
    pub fn catalog(&self) -> &LearningPathCatalog {
        &self.paths
    }

    fn all_progress(&self) -> Result<Vec<LearningProgress>> {
        load_json(self.store.as_ref(), STORAGE_KEY)
    }

    fn save(&self, progress: &[LearningProgress]) -> Result<()> {
        save_json(self.store.as_ref(), STORAGE_KEY, &progress)
    }

    pub fn path_progress(&self, user_id: &str) -> Result<Vec<LearningProgress>> {
        let mut all = self.all_progress()?;
        all.retain(|p| p.user_id == user_id);
        Ok(all)
    }

    /// Starting a path the user already follows returns the existing record.
    pub fn start_path(&self, path_id: &str, user_id: &str) -> Result<LearningProgress> {
        self.paths.require(path_id)?;

        let mut all = self.all_progress()?;
        if let Some(existing) = all
            .iter()
            .find(|p| p.user_id == user_id && p.path_id == path_id)
        {
            debug!(target: "paths", path_id, user_id, "path already started");
            return Ok(existing.clone());
        }

        let progress = LearningProgress {
            path_id: path_id.to_string(),
            user_id: user_id.to_string(),
            current_project_index: 0,
            completed_projects: Vec::new(),
            started_at: Utc::now(),
            estimated_completion: None,
            skills_acquired: Vec::new(),
            time_spent: 0,
        };
        all.push(progress.clone());
        self.save(&all)?;

        info!(target: "paths", path_id, user_id, "learning path started");
        Ok(progress)
    }

    /// Returns false when the user does not follow the path.
    pub fn update_progress(
        &self,
        user_id: &str,
        path_id: &str,
        update: LearningProgressUpdate,
    ) -> Result<bool> {
        let mut all = self.all_progress()?;
        let Some(progress) = all
            .iter_mut()
            .find(|p| p.user_id == user_id && p.path_id == path_id)
        else {
            return Ok(false);
        };
        update.apply(progress);
        self.save(&all)?;
        Ok(true)
    }

    /// Record a finished project. The project index advances by one, capped
    /// at the path length. Returns false when nothing changed.
    pub fn complete_project(&self, user_id: &str, path_id: &str, slug: &str) -> Result<bool> {
        let path_len = self.paths.get(path_id).map_or(0, |p| p.projects.len());

        let mut all = self.all_progress()?;
        let Some(progress) = all
            .iter_mut()
            .find(|p| p.user_id == user_id && p.path_id == path_id)
        else {
            return Ok(false);
        };
        if progress.completed_projects.iter().any(|s| s == slug) {
            return Ok(false);
        }
        progress.completed_projects.push(slug.to_string());
        progress.current_project_index = (progress.current_project_index + 1).min(path_len);
        let index = progress.current_project_index;
        self.save(&all)?;

        info!(target: "paths", path_id, slug, index, "path project completed");
        Ok(true)
    }

    /// Paths the user has not started, easiest first. Paths with
    /// prerequisites are offered only once the user has completed at least
    /// one project.
    pub fn recommendations(
        &self,
        user_id: &str,
        library: &LibrarySnapshot,
    ) -> Result<Vec<&LearningPath>> {
        let active = self.path_progress(user_id)?;
        let has_completed = !library.completed.is_empty();
        let mut paths: Vec<&LearningPath> = self
            .paths
            .paths()
            .iter()
            .filter(|path| !active.iter().any(|p| p.path_id == path.id))
            .filter(|path| has_completed || path.prerequisites.is_empty())
            .collect();
        paths.sort_by_key(|p| p.difficulty.ordinal());
        Ok(paths)
    }

    /// Percent of the path's projects completed, 0 when the path is unknown
    /// or not started. Slugs recorded off the path still count, capped at 100.
    pub fn completion_percent(&self, user_id: &str, path_id: &str) -> Result<f64> {
        let Some(path) = self.paths.get(path_id) else {
            return Ok(0.0);
        };
        if path.projects.is_empty() {
            return Ok(0.0);
        }
        let Some(progress) = self
            .path_progress(user_id)?
            .into_iter()
            .find(|p| p.path_id == path_id)
        else {
            return Ok(0.0);
        };
        #[allow(clippy::cast_precision_loss)]
        let percent = progress.completed_projects.len() as f64 / path.projects.len() as f64 * 100.0;
        Ok(percent.min(100.0))
    }
}
