//! Weighted-key fuzzy matching over the project catalog.
//!
//! Each indexed field value is scored against the query with a Bitap-style
//! approximate substring search: `errors / pattern_len + |start - location| /
//! distance`, where `errors` is the edit distance of the best alignment and
//! `start` is where that alignment begins in the text. Lower is better, 0 is an
//! exact match, and a value only matches when its score is within the
//! threshold. A record matches when any of its field values match; its
//! combined score is the product of `score^(weight * norm)` over the matching
//! values, so strong matches on heavy fields dominate.

use crate::catalog::{Catalog, Project};

/// Longest pattern scored in one pass; longer queries are split into chunks.
pub const MAX_PATTERN_CHARS: usize = 32;

/// Lower bound for non-exact match scores.
const MIN_INEXACT_SCORE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    /// Maximum per-value score accepted as a match (0 = exact only, 1 = anything).
    pub threshold: f64,
    /// Expected position of the match in the text.
    pub location: usize,
    /// How far from `location` a match may start before it costs a full point.
    pub distance: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            location: 0,
            distance: 100,
        }
    }
}

/// A searchable project field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Title,
    Description,
    Tagline,
    Stack,
    Concepts,
    Features,
}

impl ProjectField {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Tagline => "tagline",
            Self::Stack => "stack",
            Self::Concepts => "concepts",
            Self::Features => "features",
        }
    }

    fn values(self, project: &Project) -> Vec<&str> {
        match self {
            Self::Title => vec![project.title.as_str()],
            Self::Description => vec![project.description.as_str()],
            Self::Tagline => vec![project.tagline.as_str()],
            Self::Stack => project.stack.iter().map(String::as_str).collect(),
            Self::Concepts => project.concepts.iter().map(String::as_str).collect(),
            Self::Features => project.features.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedKey {
    pub field: ProjectField,
    pub weight: f64,
}

/// Fields searched for projects, with their relative weights.
pub const PROJECT_KEYS: [WeightedKey; 6] = [
    WeightedKey { field: ProjectField::Title, weight: 0.30 },
    WeightedKey { field: ProjectField::Description, weight: 0.20 },
    WeightedKey { field: ProjectField::Tagline, weight: 0.20 },
    WeightedKey { field: ProjectField::Stack, weight: 0.15 },
    WeightedKey { field: ProjectField::Concepts, weight: 0.10 },
    WeightedKey { field: ProjectField::Features, weight: 0.05 },
];

/// One catalog entry that matched a query.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Position of the project in the catalog.
    pub index: usize,
    /// Combined score, 0 = perfect.
    pub score: f64,
    /// Names of the fields that matched, first occurrence order.
    pub matched_fields: Vec<&'static str>,
}

#[derive(Debug, Clone)]
struct IndexedValue {
    lowered: String,
    chars: Vec<char>,
    norm: f64,
}

impl IndexedValue {
    fn new(value: &str) -> Self {
        let lowered = value.to_lowercase();
        let chars = lowered.chars().collect();
        Self {
            norm: field_norm(value),
            lowered,
            chars,
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    // Aligned with `FuzzyIndex::keys`.
    fields: Vec<Vec<IndexedValue>>,
}

/// Pre-lowercased, pre-normed view of the catalog for repeated queries.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    records: Vec<IndexedRecord>,
    keys: Vec<WeightedKey>,
    options: FuzzyOptions,
}

impl FuzzyIndex {
    #[must_use]
    pub fn build(catalog: &Catalog, keys: &[WeightedKey], options: FuzzyOptions) -> Self {
        let total: f64 = keys.iter().map(|k| k.weight).sum();
        let keys: Vec<WeightedKey> = keys
            .iter()
            .map(|k| WeightedKey {
                field: k.field,
                weight: if total > 0.0 { k.weight / total } else { k.weight },
            })
            .collect();

        let records = catalog
            .iter()
            .map(|project| IndexedRecord {
                fields: keys
                    .iter()
                    .map(|key| {
                        key.field
                            .values(project)
                            .into_iter()
                            .filter(|value| !value.trim().is_empty())
                            .map(IndexedValue::new)
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        Self {
            records,
            keys,
            options,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn options(&self) -> FuzzyOptions {
        self.options
    }

    /// Matching records ordered by ascending score, ties in catalog order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<FuzzyMatch> {
        let pattern = PatternSearch::new(query, self.options);
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            let mut total = 1.0_f64;
            let mut matched_fields: Vec<&'static str> = Vec::new();

            for (key, values) in self.keys.iter().zip(&record.fields) {
                for value in values {
                    let Some(score) = pattern.score(value) else {
                        continue;
                    };
                    let base = if score == 0.0 && key.weight > 0.0 {
                        f64::EPSILON
                    } else {
                        score
                    };
                    total *= base.powf(key.weight * value.norm);
                    let name = key.field.name();
                    if !matched_fields.contains(&name) {
                        matched_fields.push(name);
                    }
                }
            }

            if !matched_fields.is_empty() {
                matches.push(FuzzyMatch {
                    index,
                    score: total,
                    matched_fields,
                });
            }
        }

        matches.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        matches
    }
}

/// Length normalisation: values with many tokens weigh less per match.
#[allow(clippy::cast_precision_loss)]
fn field_norm(value: &str) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    (1000.0 / (tokens as f64).sqrt()).round() / 1000.0
}

struct PatternChunk {
    chars: Vec<char>,
    start: usize,
}

/// A lowercased query split into chunks of at most [`MAX_PATTERN_CHARS`].
struct PatternSearch {
    lowered: String,
    chunks: Vec<PatternChunk>,
    options: FuzzyOptions,
}

impl PatternSearch {
    fn new(query: &str, options: FuzzyOptions) -> Self {
        let lowered = query.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();
        let len = chars.len();
        let mut chunks = Vec::new();

        if len <= MAX_PATTERN_CHARS {
            if len > 0 {
                chunks.push(PatternChunk { chars, start: 0 });
            }
        } else {
            let remainder = len % MAX_PATTERN_CHARS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                chunks.push(PatternChunk {
                    chars: chars[i..i + MAX_PATTERN_CHARS].to_vec(),
                    start: i,
                });
                i += MAX_PATTERN_CHARS;
            }
            if remainder > 0 {
                let start = len - MAX_PATTERN_CHARS;
                chunks.push(PatternChunk {
                    chars: chars[start..].to_vec(),
                    start,
                });
            }
        }

        Self {
            lowered,
            chunks,
            options,
        }
    }

    fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Score of one value, `None` when it does not match.
    #[allow(clippy::cast_precision_loss)]
    fn score(&self, value: &IndexedValue) -> Option<f64> {
        if value.lowered == self.lowered {
            return Some(0.0);
        }

        let mut total = 0.0;
        let mut any = false;
        for chunk in &self.chunks {
            let best = best_alignment(
                &value.chars,
                &chunk.chars,
                self.options.location + chunk.start,
                self.options,
            );
            match best {
                Some(score) if score <= self.options.threshold => {
                    any = true;
                    total += score.max(MIN_INEXACT_SCORE);
                }
                // A missed chunk still counts its closest rejected alignment.
                Some(score) => total += score.clamp(MIN_INEXACT_SCORE, 1.0),
                None => total += 1.0,
            }
        }

        any.then(|| total / self.chunks.len() as f64)
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_score(errors: usize, pattern_len: usize, start: usize, expected: usize, distance: usize) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = start.abs_diff(expected);
    if distance == 0 {
        return if proximity == 0 { accuracy } else { 1.0 };
    }
    accuracy + proximity as f64 / distance as f64
}

/// Best alignment of `pattern` anywhere in `text` (Sellers' edit distance with
/// a free starting point), scored by errors and start offset. The threshold
/// is not applied here. `None` when no alignment beats a full mismatch.
fn best_alignment(
    text: &[char],
    pattern: &[char],
    expected: usize,
    options: FuzzyOptions,
) -> Option<f64> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }

    // cost[i]: edits to align pattern[..i] ending at the current text position.
    // start[i]: text position where that alignment begins.
    let mut prev_cost: Vec<usize> = (0..=m).collect();
    let mut prev_start: Vec<usize> = vec![0; m + 1];
    let mut cost = vec![0usize; m + 1];
    let mut start = vec![0usize; m + 1];
    let mut best: Option<f64> = None;

    for (j, &tc) in text.iter().enumerate() {
        let column = j + 1;
        cost[0] = 0;
        start[0] = column;

        for i in 1..=m {
            let substitution = prev_cost[i - 1] + usize::from(pattern[i - 1] != tc);
            let mut candidates = [
                (substitution, prev_start[i - 1]),
                (cost[i - 1] + 1, start[i - 1]),
                (prev_cost[i] + 1, prev_start[i]),
            ];
            candidates.sort_by_key(|&(c, s)| (c, s.abs_diff(expected)));
            (cost[i], start[i]) = candidates[0];
        }

        if cost[m] < m {
            let score = compute_score(cost[m], m, start[m], expected, options.distance);
            if best.is_none_or(|b| score < b) {
                best = Some(score);
            }
        }

        std::mem::swap(&mut prev_cost, &mut cost);
        std::mem::swap(&mut prev_start, &mut start);
    }

    best
}
