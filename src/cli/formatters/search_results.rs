//! Search results formatter
//!
//! Renders a search as a numbered list for terminals, or as a JSON response
//! for robot mode.

use console::style;
use serde::Serialize;
use tracing::debug;

use crate::search::{SearchResult, SortBy, classify};

/// One rendered result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReportItem {
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub stack: Vec<String>,
    pub difficulty: String,
    pub duration: String,
    pub category: String,
    pub relevance_score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_fields: Vec<&'static str>,
}

impl From<&SearchResult<'_>> for SearchReportItem {
    fn from(result: &SearchResult<'_>) -> Self {
        let project = result.project;
        let classification = classify(project);
        Self {
            slug: project.slug.clone(),
            title: project.title.clone(),
            tagline: project.tagline.clone(),
            stack: project.stack.clone(),
            difficulty: classification.difficulty.to_string(),
            duration: classification.duration.as_str().to_string(),
            category: classification.category.label().to_string(),
            relevance_score: result.relevance_score,
            matched_fields: result.matched_fields.clone(),
        }
    }
}

/// Search results collection for formatted display
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub sort_by: SortBy,
    /// Matches before `--limit` was applied.
    pub total: usize,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub results: Vec<SearchReportItem>,
}

impl SearchReport {
    pub fn new(
        query: impl Into<String>,
        sort_by: SortBy,
        results: &[SearchResult<'_>],
        limit: Option<usize>,
    ) -> Self {
        let total = results.len();
        let results: Vec<SearchReportItem> = results
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(SearchReportItem::from)
            .collect();
        Self {
            query: query.into(),
            sort_by,
            total,
            count: results.len(),
            duration_ms: None,
            results,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn format_human(&self) -> String {
        debug!(target: "search", results = self.results.len(), "rendering results");
        if self.results.is_empty() {
            return self.format_empty();
        }

        let mut out = self.header();
        out.push_str("\n\n");
        for (i, item) in self.results.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} {} {}\n",
                i + 1,
                style(&item.title).bold(),
                score_style(item.relevance_score),
                style(format!("({})", item.slug)).dim(),
            ));
            if !item.tagline.is_empty() {
                out.push_str(&format!("   {}\n", item.tagline));
            }
            out.push_str(&format!(
                "   {} | {} | {} | {}\n",
                item.difficulty,
                item.duration,
                item.category,
                item.stack.join(", "),
            ));
            if !item.matched_fields.is_empty() {
                out.push_str(&format!("   matched: {}\n", item.matched_fields.join(", ")));
            }
            out.push('\n');
        }
        out
    }

    fn header(&self) -> String {
        let mut header = if self.query.is_empty() {
            format!("{} projects", self.total)
        } else {
            format!("{} results for '{}'", self.total, self.query)
        };
        header.push_str(&format!(" sorted by {}", self.sort_by));
        if self.count < self.total {
            header.push_str(&format!(", showing {}", self.count));
        }
        if let Some(ms) = self.duration_ms {
            header.push_str(&format!(" in {ms}ms"));
        }
        header
    }

    fn format_empty(&self) -> String {
        let mut out = if self.query.is_empty() {
            "! No projects match these filters\n\n".to_string()
        } else {
            format!("! No projects found for '{}'\n\n", self.query)
        };
        out.push_str(
            "Try:\n  \
             - Using different keywords\n  \
             - Removing filters (--stack, --difficulty, --duration, --category)\n  \
             - Listing valid filter values: tracereverse options\n",
        );
        out
    }
}

fn score_style(score: f64) -> console::StyledObject<String> {
    let text = format!("[{score:.2}]");
    match score_color(score) {
        "green" => style(text).green(),
        "yellow" => style(text).yellow(),
        _ => style(text).red(),
    }
}

fn score_color(score: f64) -> &'static str {
    if score >= 0.8 {
        "green"
    } else if score >= 0.5 {
        "yellow"
    } else {
        "red"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Difficulty, Project};

    fn project(slug: &str) -> Project {
        Project::new(slug, format!("Project {slug}"))
            .with_tagline("A tagline")
            .with_stack(["React", "CSS"])
            .with_difficulty(Difficulty::Beginner)
    }

    #[test]
    fn empty_report_suggests_options() {
        console::set_colors_enabled(false);
        let report = SearchReport::new("zzz", SortBy::Relevance, &[], None);
        let output = report.format_human();
        assert!(output.contains("No projects found for 'zzz'"));
        assert!(output.contains("tracereverse options"));
    }

    #[test]
    fn limit_truncates_but_keeps_total() {
        let projects = [project("a"), project("b"), project("c")];
        let results: Vec<_> = projects
            .iter()
            .map(|p| SearchResult {
                project: p,
                relevance_score: 1.0,
                matched_fields: Vec::new(),
            })
            .collect();
        let report = SearchReport::new("", SortBy::Relevance, &results, Some(2));
        assert_eq!(report.total, 3);
        assert_eq!(report.count, 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["slug"], "a");
        assert_eq!(json["results"][0]["difficulty"], "beginner");
        assert_eq!(json["results"][0]["category"], "Frontend Framework");
        assert_eq!(json["sort_by"], "relevance");
    }

    #[test]
    fn human_output_lists_results_in_order() {
        console::set_colors_enabled(false);
        let projects = [project("a"), project("b")];
        let results: Vec<_> = projects
            .iter()
            .map(|p| SearchResult {
                project: p,
                relevance_score: 0.75,
                matched_fields: vec!["title"],
            })
            .collect();
        let output = SearchReport::new("proj", SortBy::Relevance, &results, None)
            .with_duration(3)
            .format_human();
        assert!(output.starts_with("2 results for 'proj' sorted by relevance in 3ms"));
        let a = output.find("Project a").unwrap();
        let b = output.find("Project b").unwrap();
        assert!(a < b);
        assert!(output.contains("[0.75]"));
        assert!(output.contains("matched: title"));
    }

    #[test]
    fn truncated_human_output_renders_detail_lines() {
        console::set_colors_enabled(false);
        let projects = [project("a"), project("b")];
        let results: Vec<_> = projects
            .iter()
            .map(|p| SearchResult {
                project: p,
                relevance_score: 1.0,
                matched_fields: Vec::new(),
            })
            .collect();
        let output = SearchReport::new("", SortBy::Difficulty, &results, Some(1)).format_human();
        assert!(output.starts_with("2 projects sorted by difficulty, showing 1\n\n"));
        assert!(output.contains("1. Project a [1.00] (a)\n   A tagline\n"));
        assert!(output.contains("   beginner | "));
        assert!(!output.contains("Project b"));
        assert!(!output.contains("matched:"));
    }

    #[test]
    fn score_color_thresholds() {
        assert_eq!(score_color(0.95), "green");
        assert_eq!(score_color(0.8), "green");
        assert_eq!(score_color(0.6), "yellow");
        assert_eq!(score_color(0.1), "red");
    }
}
