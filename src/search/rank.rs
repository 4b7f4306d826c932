//! Result ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrError;

use super::SearchResult;
use super::classify::{derive_duration, effective_difficulty, popularity_hits};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Difficulty,
    Duration,
    Popularity,
    Newest,
}

impl SortBy {
    pub const ALL: [Self; 5] = [
        Self::Relevance,
        Self::Difficulty,
        Self::Duration,
        Self::Popularity,
        Self::Newest,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Difficulty => "difficulty",
            Self::Duration => "duration",
            Self::Popularity => "popularity",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = TrError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "difficulty" => Ok(Self::Difficulty),
            "duration" => Ok(Self::Duration),
            "popularity" => Ok(Self::Popularity),
            "newest" => Ok(Self::Newest),
            _ => Err(TrError::Validation(format!(
                "invalid sort {value} (expected relevance|difficulty|duration|popularity|newest)"
            ))),
        }
    }
}

/// Order results in place. Every mode is a stable sort except `Newest`,
/// which only reverses the incoming order: there is no creation date on
/// the records, so the reversal stands in for a recency sort.
pub fn sort_results(results: &mut [SearchResult<'_>], sort_by: SortBy) {
    match sort_by {
        SortBy::Relevance => {
            results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        }
        SortBy::Difficulty => {
            results.sort_by_key(|r| effective_difficulty(r.project).ordinal());
        }
        SortBy::Duration => {
            results.sort_by_key(|r| derive_duration(r.project).ordinal());
        }
        SortBy::Popularity => {
            results.sort_by_key(|r| std::cmp::Reverse(popularity_hits(r.project)));
        }
        SortBy::Newest => results.reverse(),
    }
}
