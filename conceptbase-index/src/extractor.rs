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

//! Concept extraction from document sections.
//!
//! Each titled section yields at most one [`Concept`]: a stable id
//! derived from the title, a bounded description, a bounded keyword
//! set, related-concept references harvested from cue phrases, and the
//! owning projects inferred from the document path.

use crate::parser::Section;
use conceptbase_core::{Concept, Tier};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

/// Placeholder when no body line qualifies as a description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Curated vocabulary of domain terms matched as substrings of the
/// section body. Everything here is a keyword candidate alongside the
/// section's inline code spans.
pub const DOMAIN_VOCABULARY: &[&str] = &[
    "ownership", "borrowing", "lifetime", "trait", "impl", "struct", "enum",
    "match", "option", "result", "vec", "string", "slice", "reference",
    "mutable", "immutable", "async", "await", "thread", "mutex", "arc",
    "box", "rc", "refcell", "unsafe", "macro", "generic", "closure",
    "iterator", "collect", "map", "filter", "fold", "unwrap", "expect",
];

/// Known project names matched against document path components.
pub const PROJECT_CATALOG: &[&str] = &[
    "calculator",
    "file-explorer",
    "text-processor",
    "todo-app",
    "library-management-system",
    "cli-database-tool",
    "custom-data-structure",
    "multi-threaded-web-scraper",
    "thread-pool",
    "c-library-binding",
    "custom-memory-allocator",
    "dsl-project",
    "async-network-server",
    "compiler-plugin",
    "custom-runtime",
    "high-performance-data-processing",
    "capstone-project",
    "capstone-distributed-analysis",
];

/// Extraction limits.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Maximum keywords kept per concept.
    pub max_keywords: usize,
    /// Maximum related-concept references kept per concept.
    pub max_related: usize,
    /// Description length cap in characters, before the ellipsis.
    pub description_limit: usize,
    /// Minimum character count for a line to qualify as a description
    /// (exclusive).
    pub min_description_len: usize,
    /// Maximum character count for a code span to qualify as a keyword
    /// (exclusive).
    pub max_code_span_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_keywords: 10,
            max_related: 5,
            description_limit: 200,
            min_description_len: 20,
            max_code_span_len: 30,
        }
    }
}

/// Derives concept records from parsed sections.
pub struct ConceptExtractor {
    config: ExtractorConfig,
    id_strip_re: Regex,
    id_collapse_re: Regex,
    bold_re: Regex,
    italic_re: Regex,
    code_re: Regex,
    cue_res: Vec<Regex>,
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl ConceptExtractor {
    /// Create a new extractor with configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        let cue_phrases = ["see also", "related to", "builds on", "requires"];
        Self {
            config,
            id_strip_re: Regex::new(r"[^\w\s-]").expect("valid strip pattern"),
            id_collapse_re: Regex::new(r"[-\s]+").expect("valid collapse pattern"),
            bold_re: Regex::new(r"\*\*(.+?)\*\*").expect("valid bold pattern"),
            italic_re: Regex::new(r"\*(.+?)\*").expect("valid italic pattern"),
            code_re: Regex::new(r"`([^`]+)`").expect("valid code pattern"),
            cue_res: cue_phrases
                .iter()
                .map(|phrase| {
                    Regex::new(&format!(r"(?i){phrase}:?\s*([^.\n]+)"))
                        .expect("valid cue pattern")
                })
                .collect(),
        }
    }

    /// Derive a stable concept id from a title.
    ///
    /// Lowercases, strips characters that are neither word characters,
    /// whitespace nor hyphens, collapses whitespace/hyphen runs into a
    /// single hyphen, and trims leading/trailing hyphens. Idempotent.
    pub fn concept_id(&self, title: &str) -> String {
        let lowered = title.to_lowercase();
        let stripped = self.id_strip_re.replace_all(&lowered, "");
        let collapsed = self.id_collapse_re.replace_all(&stripped, "-");
        collapsed.trim_matches('-').to_string()
    }

    /// Extract the first meaningful body line as the description.
    ///
    /// Blank lines, headings and fence delimiters are skipped; the
    /// first remaining line longer than the minimum has its
    /// bold/italic/inline-code markup stripped and is truncated to the
    /// configured limit with a `...` marker.
    pub fn description(&self, body: &str) -> String {
        for line in body.trim().lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("```") {
                continue;
            }
            if line.chars().count() <= self.config.min_description_len {
                continue;
            }

            let line = self.bold_re.replace_all(line, "$1");
            let line = self.italic_re.replace_all(&line, "$1");
            let line = self.code_re.replace_all(&line, "$1");

            if line.chars().count() > self.config.description_limit {
                let mut truncated: String =
                    line.chars().take(self.config.description_limit).collect();
                truncated.push_str("...");
                return truncated;
            }
            return line.into_owned();
        }

        NO_DESCRIPTION.to_string()
    }

    /// Extract the bounded keyword set for a section body.
    ///
    /// Union of short non-URL inline code spans and domain vocabulary
    /// terms appearing in the lowercased body, sorted ascending and cut
    /// to the configured maximum. The cut keeps the alphabetically
    /// first entries.
    pub fn keywords(&self, body: &str) -> Vec<String> {
        let mut keywords = BTreeSet::new();

        for caps in self.code_re.captures_iter(body) {
            let span = &caps[1];
            if span.chars().count() < self.config.max_code_span_len && !span.starts_with("http") {
                keywords.insert(span.to_lowercase());
            }
        }

        let body_lower = body.to_lowercase();
        for term in DOMAIN_VOCABULARY {
            if body_lower.contains(term) {
                keywords.insert((*term).to_string());
            }
        }

        keywords.into_iter().take(self.config.max_keywords).collect()
    }

    /// Harvest related-concept ids from cue phrases in the body.
    ///
    /// Each cue phrase captures up to the end of the sentence; the
    /// capture is split on commas/semicolons and every piece is
    /// id-derived. Sorted, bounded by the configured maximum.
    pub fn related_concepts(&self, body: &str) -> Vec<String> {
        let mut related = BTreeSet::new();

        for cue_re in &self.cue_res {
            for caps in cue_re.captures_iter(body) {
                for piece in caps[1].split(&[',', ';'][..]) {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    let id = self.concept_id(piece);
                    if !id.is_empty() {
                        related.insert(id);
                    }
                }
            }
        }

        related.into_iter().take(self.config.max_related).collect()
    }

    /// Determine which known projects a document path belongs to.
    ///
    /// Each path component is checked against the catalog; the first
    /// catalog entry found in a component is kept and the component is
    /// not scanned further. The result is a set: a project appearing in
    /// several components is reported once.
    pub fn projects(&self, path: &Path) -> Vec<String> {
        let mut projects: Vec<String> = Vec::new();

        for component in path.components() {
            let part = component.as_os_str().to_string_lossy().to_lowercase();
            for name in PROJECT_CATALOG {
                if part.contains(name) {
                    if !projects.iter().any(|p| p == name) {
                        projects.push((*name).to_string());
                    }
                    break;
                }
            }
        }

        projects
    }

    /// Derive one concept record from a parsed section.
    ///
    /// Returns `None` when the title normalizes to an empty id.
    pub fn extract(
        &self,
        section: &Section,
        file_path: &str,
        tier: Tier,
        projects: &[String],
    ) -> Option<Concept> {
        let id = self.concept_id(&section.title);
        if id.is_empty() {
            return None;
        }

        Some(Concept {
            section: id.clone(),
            id,
            title: section.title.clone(),
            tier,
            description: self.description(&section.body),
            file_path: file_path.to_string(),
            keywords: self.keywords(&section.body),
            related_concepts: self.related_concepts(&section.body),
            projects: projects.to_vec(),
        })
    }
}
