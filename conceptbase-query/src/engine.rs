// Copyright 2025 Conceptbase (https://github.com/conceptbase)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Query engine over a concept snapshot.
//!
//! The engine loads the snapshot once and serves every query from the
//! resident, read-only index. A missing or corrupt snapshot degrades to
//! an empty index: queries run and return no results rather than
//! failing.

use conceptbase_core::{Concept, ConceptbaseError, Snapshot, Tier};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::warn;

/// Words this short are ignored by the per-word scoring signals.
const MIN_WORD_LEN: usize = 2;

/// Score for an exact-id hit.
const EXACT_MATCH_SCORE: f32 = 100.0;

/// One search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub concept: Concept,
}

/// A resolved concept listed by a filter query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    pub id: String,
    pub concept: Concept,
}

/// Summary of a related concept, resolved from the mapping.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedConcept {
    pub id: String,
    pub title: String,
    pub tier: Tier,
    pub description: String,
}

/// A concept together with its resolved related concepts.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptDetails {
    pub concept: Concept,
    pub related: Vec<RelatedConcept>,
}

/// One entry of a learning-path suggestion list.
///
/// Lower priority sorts first: next-tier concepts (priority 1) are
/// surfaced before related concepts (priority 2).
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub concept: Concept,
    pub reason: String,
    pub priority: u8,
}

/// Index statistics derived from the loaded snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_concepts: usize,
    pub files_processed: usize,
    pub last_updated: String,
    pub tier_counts: BTreeMap<Tier, usize>,
}

/// Read-only query interface over one loaded snapshot.
pub struct QueryEngine {
    snapshot: Snapshot,
}

impl QueryEngine {
    /// Open an engine over the snapshot at `path`.
    ///
    /// Never fails: a missing snapshot logs a hint to build first and a
    /// corrupt one logs the parse error; both yield an empty index.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Snapshot::load(path) {
            Ok(snapshot) => Self { snapshot },
            Err(ConceptbaseError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "concept index not found, run `conceptbase build` first");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load concept index, starting empty");
                Self::default()
            }
        }
    }

    /// Wrap an in-memory snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// The loaded snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether the index holds no concepts.
    pub fn is_empty(&self) -> bool {
        self.snapshot.concepts.is_empty()
    }

    /// Look up one concept by id.
    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.snapshot.concepts.get(id)
    }

    /// Search concepts by free text.
    ///
    /// Results carry an additive relevance score and are ordered by
    /// score descending, id ascending. Zero-score concepts are
    /// excluded. With `exact`, only the concept whose id (or its
    /// space-separated form) equals the query is returned, at score
    /// 100.
    pub fn search(&self, query: &str, exact: bool) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();

        let mut hits: Vec<SearchHit> = self
            .snapshot
            .concepts
            .iter()
            .filter_map(|(id, concept)| {
                let score = if exact {
                    exact_score(&query, id)
                } else {
                    relevance_score(&query, &words, id, concept)
                };
                (score > 0.0).then(|| SearchHit {
                    id: id.clone(),
                    score,
                    concept: concept.clone(),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits
    }

    /// Get a concept with its related concepts resolved.
    ///
    /// Related ids absent from the mapping are dropped silently.
    pub fn details(&self, id: &str) -> Option<ConceptDetails> {
        let concept = self.snapshot.concepts.get(id)?;

        let related = concept
            .related_concepts
            .iter()
            .filter_map(|related_id| {
                self.snapshot.concepts.get(related_id).map(|related| RelatedConcept {
                    id: related_id.clone(),
                    title: related.title.clone(),
                    tier: related.tier,
                    description: related.description.clone(),
                })
            })
            .collect();

        Some(ConceptDetails {
            concept: concept.clone(),
            related,
        })
    }

    /// Concept ids of the first category whose name contains the query.
    ///
    /// Categories are checked in their fixed order; an unmatched query
    /// yields an empty list.
    pub fn cross_references(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();

        for (category, ids) in &self.snapshot.cross_references {
            if category.name().contains(&query) {
                return ids.clone();
            }
        }
        Vec::new()
    }

    /// All concepts at a learning tier, resolved in learning-path
    /// order.
    ///
    /// Unknown tier names and ids missing from the mapping yield empty
    /// / skipped entries.
    pub fn concepts_by_tier(&self, tier: &str) -> Vec<SearchEntry> {
        let Some(tier) = Tier::from_str(tier) else {
            return Vec::new();
        };

        self.snapshot
            .learning_path
            .get(&tier)
            .into_iter()
            .flatten()
            .filter_map(|id| {
                self.snapshot.concepts.get(id).map(|concept| SearchEntry {
                    id: id.clone(),
                    concept: concept.clone(),
                })
            })
            .collect()
    }

    /// All concepts tagged with a project whose name contains
    /// `project`, case-insensitive.
    pub fn concepts_by_project(&self, project: &str) -> Vec<SearchEntry> {
        let project = project.to_lowercase();

        self.snapshot
            .concepts
            .iter()
            .filter(|(_, concept)| {
                concept
                    .projects
                    .iter()
                    .any(|p| p.to_lowercase().contains(&project))
            })
            .map(|(id, concept)| SearchEntry {
                id: id.clone(),
                concept: concept.clone(),
            })
            .collect()
    }

    /// Suggest what to learn after `id`.
    ///
    /// `None` when the id is unknown. Otherwise: resolvable related
    /// concepts at priority 2, then up to 3 concepts from the next tier
    /// at priority 1; sorted by priority ascending (stable), capped at
    /// 5 entries.
    pub fn suggest_next(&self, id: &str) -> Option<Vec<Suggestion>> {
        let current = self.snapshot.concepts.get(id)?;

        let mut suggestions = Vec::new();
        for related_id in &current.related_concepts {
            if let Some(concept) = self.snapshot.concepts.get(related_id) {
                suggestions.push(Suggestion {
                    id: related_id.clone(),
                    concept: concept.clone(),
                    reason: "related concept".to_string(),
                    priority: 2,
                });
            }
        }

        if let Some(next_tier) = current.tier.next() {
            for entry in self.concepts_by_tier(next_tier.as_str()).into_iter().take(3) {
                suggestions.push(Suggestion {
                    id: entry.id,
                    concept: entry.concept,
                    reason: format!("next tier ({next_tier})"),
                    priority: 1,
                });
            }
        }

        suggestions.sort_by_key(|s| s.priority);
        suggestions.truncate(5);
        Some(suggestions)
    }

    /// Snapshot metadata plus per-tier concept counts.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_concepts: self.snapshot.metadata.total_concepts,
            files_processed: self.snapshot.metadata.files_processed,
            last_updated: self.snapshot.metadata.last_updated.clone(),
            tier_counts: self
                .snapshot
                .learning_path
                .iter()
                .map(|(tier, ids)| (*tier, ids.len()))
                .collect(),
        }
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self {
            snapshot: Snapshot::empty(),
        }
    }
}

/// Exact-match score: 100 when the query equals the id or the id with
/// hyphens replaced by spaces, else 0.
fn exact_score(query: &str, id: &str) -> f32 {
    if query == id || query == id.replace('-', " ") {
        EXACT_MATCH_SCORE
    } else {
        0.0
    }
}

/// Additive relevance score of one concept against a lowercased query.
///
/// The fixed signal table:
/// title substring +50, title equality +25, spaced-id substring +40,
/// keyword substring +20 (+10 on equality) per keyword, description
/// substring +10, and per query word longer than 2 characters: +5 in
/// title, +3 in id, +2 per containing keyword.
fn relevance_score(query: &str, words: &[&str], id: &str, concept: &Concept) -> f32 {
    let mut score = 0.0;

    let title = concept.title.to_lowercase();
    if title.contains(query) {
        score += 50.0;
        if query == title {
            score += 25.0;
        }
    }

    if id.replace('-', " ").contains(query) {
        score += 40.0;
    }

    for keyword in &concept.keywords {
        let keyword = keyword.to_lowercase();
        if keyword.contains(query) {
            score += 20.0;
            if query == keyword {
                score += 10.0;
            }
        }
    }

    if concept.description.to_lowercase().contains(query) {
        score += 10.0;
    }

    for word in words {
        if word.len() <= MIN_WORD_LEN {
            continue;
        }
        if title.contains(word) {
            score += 5.0;
        }
        if id.contains(word) {
            score += 3.0;
        }
        for keyword in &concept.keywords {
            if keyword.to_lowercase().contains(word) {
                score += 2.0;
            }
        }
    }

    score
}
