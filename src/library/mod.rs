//! Per-user library: completed and bookmarked projects, progress counters,
//! study time and achievements.
//!
//! Each user's state is a single JSON document in the key-value store under
//! `tracereverse_library:{user}`. Every mutation is load, modify, save.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::{KeyValueStore, load_json, save_json};

pub const STORAGE_PREFIX: &str = "tracereverse_library";

pub const FIRST_PROJECT: &str = "first-project";
pub const WEEK_STREAK: &str = "week-streak";
pub const TEN_PROJECTS: &str = "ten-projects";

const XP_PER_LEVEL: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u32,
    pub max_progress: u32,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_xp: u64,
}

impl Achievement {
    fn new(id: &str, title: &str, description: &str, max_progress: u32, reward_xp: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            progress: 0,
            max_progress,
            completed: false,
            completed_at: None,
            reward_xp,
        }
    }
}

fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(FIRST_PROJECT, "First Steps", "Complete your first project", 1, 100),
        Achievement::new(WEEK_STREAK, "Week Warrior", "Maintain a 7-day learning streak", 7, 500),
        Achievement::new(TEN_PROJECTS, "Project Master", "Complete 10 projects", 10, 1000),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryState {
    pub current_project: Option<String>,
    /// Completion order is preserved.
    pub completed_projects: Vec<String>,
    pub bookmarked_projects: Vec<String>,
    /// Percent complete, 0..=100.
    pub project_progress: BTreeMap<String, u8>,
    /// Minutes studied per project.
    pub study_time: BTreeMap<String, u64>,
    pub achievements: Vec<Achievement>,
    pub xp: u64,
    pub level: u64,
    pub streak: u32,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self {
            current_project: None,
            completed_projects: Vec::new(),
            bookmarked_projects: Vec::new(),
            project_progress: BTreeMap::new(),
            study_time: BTreeMap::new(),
            achievements: default_achievements(),
            xp: 0,
            level: 1,
            streak: 0,
        }
    }
}

impl LibraryState {
    #[must_use]
    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            completed: self.completed_projects.iter().cloned().collect(),
            bookmarked: self.bookmarked_projects.iter().cloned().collect(),
        }
    }

    fn add_xp(&mut self, xp: u64) {
        self.xp = self.xp.saturating_add(xp);
        self.level = self.xp / XP_PER_LEVEL + 1;
    }

    fn set_achievement_progress(&mut self, id: &str, progress: u32, now: DateTime<Utc>) {
        let Some(achievement) = self.achievements.iter_mut().find(|a| a.id == id) else {
            return;
        };
        achievement.progress = progress.min(achievement.max_progress);
        if achievement.progress >= achievement.max_progress {
            self.complete_achievement(id, now);
        }
    }

    /// One-shot: returns the xp granted, 0 when already completed or unknown.
    fn complete_achievement(&mut self, id: &str, now: DateTime<Utc>) -> u64 {
        let Some(achievement) = self.achievements.iter_mut().find(|a| a.id == id) else {
            return 0;
        };
        if achievement.completed {
            return 0;
        }
        achievement.completed = true;
        achievement.completed_at = Some(now);
        achievement.progress = achievement.max_progress;
        let reward = achievement.reward_xp;
        self.add_xp(reward);
        reward
    }
}

/// Read-only view of the sets the search engine filters on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibrarySnapshot {
    pub completed: BTreeSet<String>,
    pub bookmarked: BTreeSet<String>,
}

impl LibrarySnapshot {
    #[must_use]
    pub fn is_completed(&self, slug: &str) -> bool {
        self.completed.contains(slug)
    }

    #[must_use]
    pub fn is_bookmarked(&self, slug: &str) -> bool {
        self.bookmarked.contains(slug)
    }
}

pub struct UserLibrary {
    store: Arc<dyn KeyValueStore>,
    user_id: String,
    key: String,
}

impl UserLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let key = format!("{STORAGE_PREFIX}:{user_id}");
        Self {
            store,
            user_id,
            key,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> Result<LibraryState> {
        load_json(self.store.as_ref(), &self.key)
    }

    pub fn snapshot(&self) -> Result<LibrarySnapshot> {
        Ok(self.state()?.snapshot())
    }

    fn update<T>(&self, f: impl FnOnce(&mut LibraryState) -> T) -> Result<T> {
        let mut state = self.state()?;
        let out = f(&mut state);
        save_json(self.store.as_ref(), &self.key, &state)?;
        Ok(out)
    }

    /// Returns false when the project was already completed.
    pub fn mark_completed(&self, slug: &str) -> Result<bool> {
        let now = Utc::now();
        let added = self.update(|state| {
            if state.completed_projects.iter().any(|s| s == slug) {
                return false;
            }
            state.completed_projects.push(slug.to_string());
            state.project_progress.insert(slug.to_string(), 100);

            let count = u32::try_from(state.completed_projects.len()).unwrap_or(u32::MAX);
            state.set_achievement_progress(FIRST_PROJECT, count, now);
            state.set_achievement_progress(TEN_PROJECTS, count, now);
            true
        })?;
        if added {
            info!(target: "library", user = %self.user_id, slug, "project completed");
        }
        Ok(added)
    }

    /// Returns whether the project is bookmarked afterwards.
    pub fn toggle_bookmark(&self, slug: &str) -> Result<bool> {
        let bookmarked = self.update(|state| {
            if let Some(pos) = state.bookmarked_projects.iter().position(|s| s == slug) {
                state.bookmarked_projects.remove(pos);
                false
            } else {
                state.bookmarked_projects.push(slug.to_string());
                true
            }
        })?;
        debug!(target: "library", user = %self.user_id, slug, bookmarked, "bookmark toggled");
        Ok(bookmarked)
    }

    pub fn set_current_project(&self, slug: Option<&str>) -> Result<()> {
        self.update(|state| state.current_project = slug.map(str::to_string))
    }

    /// Percent is clamped to 100. Returns the stored value.
    pub fn update_project_progress(&self, slug: &str, percent: u8) -> Result<u8> {
        let percent = percent.min(100);
        self.update(|state| {
            state.project_progress.insert(slug.to_string(), percent);
            percent
        })
    }

    /// Returns the accumulated minutes for the project.
    pub fn add_study_time(&self, slug: &str, minutes: u64) -> Result<u64> {
        self.update(|state| {
            let total = state.study_time.entry(slug.to_string()).or_insert(0);
            *total = total.saturating_add(minutes);
            *total
        })
    }

    /// Returns the new level.
    pub fn add_xp(&self, xp: u64) -> Result<u64> {
        self.update(|state| {
            state.add_xp(xp);
            state.level
        })
    }

    /// Returns the new streak.
    pub fn increment_streak(&self) -> Result<u32> {
        let now = Utc::now();
        self.update(|state| {
            state.streak = state.streak.saturating_add(1);
            let streak = state.streak;
            state.set_achievement_progress(WEEK_STREAK, streak, now);
            streak
        })
    }

    /// Returns the xp granted, 0 when already completed or unknown.
    pub fn complete_achievement(&self, id: &str) -> Result<u64> {
        let now = Utc::now();
        self.update(|state| state.complete_achievement(id, now))
    }
}
