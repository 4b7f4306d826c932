//! Project progress tracking and learning statistics.
//!
//! All entries for all users live in one JSON array under
//! [`STORAGE_KEY`]. Statistics are computed on demand from that array and
//! the project catalog.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, Difficulty};
use crate::error::{Result, TrError};
use crate::search::classify::effective_difficulty;
use crate::storage::{KeyValueStore, load_json, save_json};

pub const STORAGE_KEY: &str = "tracereverse_progress";

/// Marker step for a completed entry.
pub const COMPLETED_STEP: i32 = -1;

const WEEKS: i64 = 8;
const FAVORITE_STACK_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: String,
    pub project_slug: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes.
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub current_step: i32,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl ProgressEntry {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Partial update applied by [`ProgressTracker::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressUpdate {
    pub time_spent: Option<u64>,
    pub current_step: Option<i32>,
    pub total_steps: Option<u32>,
    pub challenges: Option<Vec<String>>,
}

impl ProgressUpdate {
    fn apply(self, entry: &mut ProgressEntry) {
        if let Some(v) = self.time_spent {
            entry.time_spent = v;
        }
        if let Some(v) = self.current_step {
            entry.current_step = v;
        }
        if let Some(v) = self.total_steps {
            entry.total_steps = v;
        }
        if let Some(v) = self.challenges {
            entry.challenges = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyProgress {
    /// `M/D` of the first day of the week.
    pub week: String,
    pub projects_completed: usize,
    pub time_spent: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkillProgression {
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

impl SkillProgression {
    fn record(&mut self, difficulty: Difficulty) {
        match difficulty {
            Difficulty::Beginner => self.beginner += 1,
            Difficulty::Intermediate => self.intermediate += 1,
            Difficulty::Advanced => self.advanced += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStats {
    pub total_projects: usize,
    pub completed_projects: usize,
    pub in_progress_projects: usize,
    pub total_time_spent: u64,
    pub average_time_per_project: f64,
    pub favorite_stack: Vec<String>,
    pub weekly_progress: Vec<WeeklyProgress>,
    pub skill_progression: SkillProgression,
}

pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    pub fn entries(&self) -> Result<Vec<ProgressEntry>> {
        load_json(self.store.as_ref(), STORAGE_KEY)
    }

    pub fn entries_for(&self, user_id: &str) -> Result<Vec<ProgressEntry>> {
        let mut entries = self.entries()?;
        entries.retain(|e| e.user_id == user_id);
        Ok(entries)
    }

    fn save(&self, entries: &[ProgressEntry]) -> Result<()> {
        save_json(self.store.as_ref(), STORAGE_KEY, &entries)
    }

    pub fn start_project(
        &self,
        project_slug: &str,
        user_id: &str,
        total_steps: u32,
    ) -> Result<ProgressEntry> {
        self.start_project_at(project_slug, user_id, total_steps, Utc::now())
    }

    /// Ids are `{user}-{slug}-{millis}`; the millisecond part is bumped
    /// until the id is unused.
    pub fn start_project_at(
        &self,
        project_slug: &str,
        user_id: &str,
        total_steps: u32,
        now: DateTime<Utc>,
    ) -> Result<ProgressEntry> {
        let mut entries = self.entries()?;

        let mut millis = now.timestamp_millis();
        let mut id = format!("{user_id}-{project_slug}-{millis}");
        while entries.iter().any(|e| e.id == id) {
            millis += 1;
            id = format!("{user_id}-{project_slug}-{millis}");
        }

        let entry = ProgressEntry {
            id,
            project_slug: project_slug.to_string(),
            user_id: user_id.to_string(),
            started_at: now,
            completed_at: None,
            time_spent: 0,
            current_step: 0,
            total_steps,
            notes: Vec::new(),
            challenges: Vec::new(),
            rating: None,
        };
        entries.push(entry.clone());
        self.save(&entries)?;

        info!(target: "progress", id = %entry.id, slug = project_slug, "project started");
        Ok(entry)
    }

    /// Returns false, and stores nothing, for an unknown id.
    pub fn update(&self, entry_id: &str, update: ProgressUpdate) -> Result<bool> {
        let mut entries = self.entries()?;
        let Some(entry) = entries.iter_mut().find(|e| e.id == entry_id) else {
            debug!(target: "progress", entry_id, "update for unknown entry ignored");
            return Ok(false);
        };
        update.apply(entry);
        self.save(&entries)?;
        Ok(true)
    }

    pub fn complete_project(&self, entry_id: &str, rating: u8) -> Result<ProgressEntry> {
        self.complete_project_at(entry_id, rating, Utc::now())
    }

    pub fn complete_project_at(
        &self,
        entry_id: &str,
        rating: u8,
        now: DateTime<Utc>,
    ) -> Result<ProgressEntry> {
        if !(1..=5).contains(&rating) {
            return Err(TrError::Validation(format!(
                "rating {rating} out of range (1-5)"
            )));
        }
        let mut entries = self.entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| TrError::EntryNotFound(entry_id.to_string()))?;
        entry.completed_at = Some(now);
        entry.current_step = COMPLETED_STEP;
        entry.rating = Some(rating);
        let completed = entry.clone();
        self.save(&entries)?;

        info!(target: "progress", id = entry_id, rating, "project completed");
        Ok(completed)
    }

    pub fn add_note(&self, entry_id: &str, note: &str) -> Result<()> {
        let mut entries = self.entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| TrError::EntryNotFound(entry_id.to_string()))?;
        entry.notes.push(note.to_string());
        self.save(&entries)
    }

    pub fn user_stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<LearningStats> {
        let entries = self.entries_for(user_id)?;
        let completed: Vec<&ProgressEntry> = entries.iter().filter(|e| e.is_completed()).collect();

        let total_time_spent: u64 = entries.iter().map(|e| e.time_spent).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_time_per_project = if completed.is_empty() {
            0.0
        } else {
            total_time_spent as f64 / completed.len() as f64
        };

        let mut skill_progression = SkillProgression::default();
        for entry in &completed {
            let difficulty = self
                .catalog
                .get(&entry.project_slug)
                .map_or(Difficulty::Intermediate, effective_difficulty);
            skill_progression.record(difficulty);
        }

        Ok(LearningStats {
            total_projects: entries.len(),
            completed_projects: completed.len(),
            in_progress_projects: entries.len() - completed.len(),
            total_time_spent,
            average_time_per_project,
            favorite_stack: self.favorite_stack(&completed),
            weekly_progress: weekly_progress(&completed, now),
            skill_progression,
        })
    }

    fn favorite_stack(&self, completed: &[&ProgressEntry]) -> Vec<String> {
        completed
            .iter()
            .filter_map(|e| self.catalog.get(&e.project_slug))
            .flat_map(|p| p.stack.iter())
            .counts()
            .into_iter()
            .sorted_by_key(|(tech, count)| (Reverse(*count), *tech))
            .take(FAVORITE_STACK_LEN)
            .map(|(tech, _)| tech.clone())
            .collect()
    }
}

/// Eight weeks, oldest first. Week `i` spans `[now - 7i days, now - 7i + 6 days]`.
fn weekly_progress(completed: &[&ProgressEntry], now: DateTime<Utc>) -> Vec<WeeklyProgress> {
    (0..WEEKS)
        .rev()
        .map(|i| {
            let start = now - Duration::days(i * 7);
            let end = start + Duration::days(6);
            let in_week: Vec<_> = completed
                .iter()
                .filter(|e| e.completed_at.is_some_and(|at| at >= start && at <= end))
                .collect();
            WeeklyProgress {
                week: format!("{}/{}", start.month(), start.day()),
                projects_completed: in_week.len(),
                time_spent: in_week.iter().map(|e| e.time_spent).sum(),
            }
        })
        .collect()
}
