//! Derived classification heuristics.
//!
//! Difficulty, duration and category buckets are computed from the shape of a
//! project record. Every function here is total and deterministic: missing
//! lists count as empty and unknown technologies fall back to a default weight.
//! The constants are part of the observable search behavior and must not drift.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::catalog::{Category, Difficulty, DurationBucket, Project};

/// Weight applied to technologies missing from [`STACK_WEIGHTS`].
pub const DEFAULT_STACK_WEIGHT: u32 = 2;

/// Technologies counted by the popularity sort. Exact, case-sensitive names.
pub const POPULAR_STACKS: [&str; 4] = ["React", "Next.js", "TypeScript", "JavaScript"];

static STACK_WEIGHTS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    HashMap::from([
        ("HTML", 1),
        ("CSS", 1),
        ("JavaScript", 2),
        ("React", 3),
        ("Vue", 3),
        ("Angular", 4),
        ("TypeScript", 2),
        ("Node.js", 3),
        ("Express", 2),
        ("Next.js", 4),
        ("MongoDB", 3),
        ("PostgreSQL", 3),
        ("Docker", 4),
        ("AWS", 4),
        ("GraphQL", 4),
        ("WebSocket", 3),
    ])
});

const FRAMEWORK_KEYWORDS: [&str; 3] = ["react", "vue", "angular"];
const BACKEND_KEYWORDS: [&str; 3] = ["node", "express", "api"];
const MOBILE_KEYWORDS: [&str; 2] = ["mobile", "react native"];

#[must_use]
pub fn stack_weight(tech: &str) -> u32 {
    STACK_WEIGHTS
        .get(tech)
        .copied()
        .unwrap_or(DEFAULT_STACK_WEIGHT)
}

#[must_use]
pub fn stack_complexity(stack: &[String]) -> u32 {
    stack.iter().map(|tech| stack_weight(tech)).sum()
}

/// Difficulty from stack complexity and concept count, first rule wins.
#[must_use]
pub fn derive_difficulty(project: &Project) -> Difficulty {
    let complexity = stack_complexity(&project.stack);
    let concepts = project.concepts.len();

    if complexity >= 8 || concepts >= 10 {
        Difficulty::Advanced
    } else if complexity >= 5 || concepts >= 6 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

/// Authored difficulty if present, derived otherwise.
#[must_use]
pub fn effective_difficulty(project: &Project) -> Difficulty {
    project
        .difficulty
        .unwrap_or_else(|| derive_difficulty(project))
}

/// Rough hours estimate: half an hour per instruction, 0.3h per concept.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimated_hours(project: &Project) -> f64 {
    let instructions = project.instructions.len() as f64;
    let concepts = project.concepts.len() as f64;
    instructions * 0.5 + concepts * 0.3
}

#[must_use]
pub fn derive_duration(project: &Project) -> DurationBucket {
    let hours = estimated_hours(project);
    if hours >= 20.0 {
        DurationBucket::Long
    } else if hours >= 8.0 {
        DurationBucket::Medium
    } else {
        DurationBucket::Short
    }
}

/// Keyword rules over the joined, lowercased stack, checked in order.
#[must_use]
pub fn derive_category(project: &Project) -> Category {
    let stack = project.stack.join(" ").to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| stack.contains(k));

    if contains_any(&FRAMEWORK_KEYWORDS) {
        return Category::FrontendFramework;
    }
    if contains_any(&BACKEND_KEYWORDS) {
        return Category::BackendApi;
    }
    if stack.contains("html") && stack.contains("css") && !stack.contains("react") {
        return Category::VanillaWeb;
    }
    // "react native" is already captured by the framework rule above.
    if contains_any(&MOBILE_KEYWORDS) {
        return Category::Mobile;
    }
    Category::FullStack
}

/// Number of stack entries that belong to [`POPULAR_STACKS`].
#[must_use]
pub fn popularity_hits(project: &Project) -> usize {
    project
        .stack
        .iter()
        .filter(|tech| POPULAR_STACKS.contains(&tech.as_str()))
        .count()
}

/// Every derived attribute of a project, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub difficulty: Difficulty,
    pub derived_difficulty: Difficulty,
    pub duration: DurationBucket,
    pub category: Category,
    pub stack_complexity: u32,
    pub estimated_hours: f64,
    pub popularity: usize,
}

#[must_use]
pub fn classify(project: &Project) -> Classification {
    Classification {
        difficulty: effective_difficulty(project),
        derived_difficulty: derive_difficulty(project),
        duration: derive_duration(project),
        category: derive_category(project),
        stack_complexity: stack_complexity(&project.stack),
        estimated_hours: estimated_hours(project),
        popularity: popularity_hits(project),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concepts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("concept {i}")).collect()
    }

    #[test]
    fn unknown_technology_uses_default_weight() {
        assert_eq!(stack_weight("Elm"), DEFAULT_STACK_WEIGHT);
        assert_eq!(stack_weight("html"), DEFAULT_STACK_WEIGHT);
        assert_eq!(stack_weight("HTML"), 1);
    }

    #[test]
    fn meta_framework_stack_is_advanced() {
        let project = Project::new("p", "P")
            .with_stack(["HTML", "CSS", "JavaScript", "React", "Next.js"])
            .with_concepts(concepts(7));
        assert_eq!(stack_complexity(&project.stack), 11);
        assert_eq!(derive_difficulty(&project), Difficulty::Advanced);
    }

    #[test]
    fn markup_only_stack_is_beginner() {
        let project = Project::new("p", "P")
            .with_stack(["HTML", "CSS"])
            .with_concepts(concepts(2));
        assert_eq!(derive_difficulty(&project), Difficulty::Beginner);
    }

    #[test]
    fn concept_count_alone_can_raise_difficulty() {
        let six = Project::new("p", "P").with_concepts(concepts(6));
        assert_eq!(derive_difficulty(&six), Difficulty::Intermediate);
        let ten = Project::new("p", "P").with_concepts(concepts(10));
        assert_eq!(derive_difficulty(&ten), Difficulty::Advanced);
    }

    #[test]
    fn complexity_thresholds_are_inclusive() {
        // 2 + 3 = 5
        let five = Project::new("p", "P").with_stack(["JavaScript", "React"]);
        assert_eq!(derive_difficulty(&five), Difficulty::Intermediate);
        // 4 + 4 = 8
        let eight = Project::new("p", "P").with_stack(["Docker", "AWS"]);
        assert_eq!(derive_difficulty(&eight), Difficulty::Advanced);
    }

    #[test]
    fn authored_difficulty_takes_precedence() {
        let project = Project::new("p", "P")
            .with_stack(["Docker", "AWS"])
            .with_difficulty(Difficulty::Beginner);
        assert_eq!(effective_difficulty(&project), Difficulty::Beginner);
        assert_eq!(derive_difficulty(&project), Difficulty::Advanced);
    }

    #[test]
    fn duration_buckets() {
        let empty = Project::new("p", "P");
        assert_eq!(derive_duration(&empty), DurationBucket::Short);

        // 16 * 0.5 = 8
        let medium = Project::new("p", "P").with_instructions(concepts(16));
        assert_eq!(derive_duration(&medium), DurationBucket::Medium);

        // 34 * 0.5 + 10 * 0.3 = 20
        let long = Project::new("p", "P")
            .with_instructions(concepts(34))
            .with_concepts(concepts(10));
        assert_eq!(derive_duration(&long), DurationBucket::Long);
    }

    #[test]
    fn category_rules_in_order() {
        let cases = [
            (vec!["React Native", "Expo"], Category::FrontendFramework),
            (vec!["Node.js", "Express"], Category::BackendApi),
            (vec!["Weather API"], Category::BackendApi),
            (vec!["HTML", "CSS", "JavaScript"], Category::VanillaWeb),
            (vec!["Mobile SDK"], Category::Mobile),
            (vec!["Svelte", "Go"], Category::FullStack),
            (vec![], Category::FullStack),
        ];
        for (stack, expected) in cases {
            let project = Project::new("p", "P").with_stack(stack.clone());
            assert_eq!(derive_category(&project), expected, "stack {stack:?}");
        }
    }

    #[test]
    fn popularity_counts_exact_names_only() {
        let project = Project::new("p", "P").with_stack(["React", "Next.js", "TypeScript", "react"]);
        assert_eq!(popularity_hits(&project), 3);
    }
}
