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

//! Batch index construction over a documentation tree.

use crate::extractor::{ConceptExtractor, ExtractorConfig};
use crate::parser::SectionParser;
use chrono::Utc;
use conceptbase_core::{Category, Concept, Result, Snapshot, SnapshotMetadata, Tier};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Documentation filename eligible for indexing.
pub const DOC_FILENAME: &str = "CONCEPTS.md";

/// Builds a concept snapshot from every documentation file under a
/// root directory.
///
/// One builder owns the full accumulation state for a single batch
/// run; nothing is process-global, so builds are reentrant and
/// testable in isolation.
pub struct IndexBuilder {
    root: PathBuf,
    parser: SectionParser,
    extractor: ConceptExtractor,
}

impl IndexBuilder {
    /// Create a builder for the given corpus root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, ExtractorConfig::default())
    }

    /// Create a builder with explicit extraction limits.
    pub fn with_config(root: impl Into<PathBuf>, config: ExtractorConfig) -> Self {
        Self {
            root: root.into(),
            parser: SectionParser::new(),
            extractor: ConceptExtractor::new(config),
        }
    }

    /// Find every documentation file under the root, at any depth.
    ///
    /// Paths are sorted so collision resolution and snapshot output are
    /// deterministic for a given corpus.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut documents: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.file_name() == std::ffi::OsStr::new(DOC_FILENAME))
            .map(|entry| entry.into_path())
            .collect();
        documents.sort();
        documents
    }

    /// Build the full snapshot: scan, extract, merge, derive.
    ///
    /// Unreadable documents are logged and skipped; they never abort
    /// the batch. `files_processed` counts discovered documents.
    pub fn build(&self) -> Snapshot {
        let documents = self.discover();
        info!(documents = documents.len(), root = %self.root.display(), "scanning corpus");

        let mut concepts: BTreeMap<String, Concept> = BTreeMap::new();
        for path in &documents {
            self.index_document(path, &mut concepts);
        }

        info!(concepts = concepts.len(), "extraction complete");

        let cross_references = cross_references(&concepts);
        let learning_path = learning_path(&concepts);
        let metadata = SnapshotMetadata {
            total_concepts: concepts.len(),
            files_processed: documents.len(),
            last_updated: Utc::now().to_rfc3339(),
        };

        Snapshot {
            concepts,
            cross_references,
            learning_path,
            metadata,
        }
    }

    /// Build and persist the snapshot in one step.
    pub fn build_and_save(&self, output: impl AsRef<Path>) -> Result<Snapshot> {
        let snapshot = self.build();
        snapshot.save(&output)?;
        info!(output = %output.as_ref().display(), "snapshot written");
        Ok(snapshot)
    }

    /// Extract one document's sections into the concept mapping.
    ///
    /// Id collisions keep the last-processed concept, matching the
    /// documented merge policy.
    fn index_document(&self, path: &Path, concepts: &mut BTreeMap<String, Concept>) {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable document");
                return;
            }
        };

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let file_path = relative.display().to_string();
        let tier = Tier::from_path(path);
        let projects = self.extractor.projects(path);

        for section in self.parser.parse(&text) {
            let Some(concept) = self.extractor.extract(&section, &file_path, tier, &projects)
            else {
                continue;
            };
            let id = concept.id.clone();
            if concepts.insert(id.clone(), concept).is_some() {
                debug!(id = %id, path = %file_path, "duplicate concept id, keeping last occurrence");
            }
        }
    }
}

/// Group concept ids into the fixed cross-reference categories.
///
/// Membership is evaluated in ascending id order, so each category's
/// list is sorted. Every category key is present even when empty.
fn cross_references(concepts: &BTreeMap<String, Concept>) -> BTreeMap<Category, Vec<String>> {
    let mut references: BTreeMap<Category, Vec<String>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

    for (id, concept) in concepts {
        for category in Category::ALL {
            if category.matches(concept) {
                references.entry(category).or_default().push(id.clone());
            }
        }
    }

    references
}

/// Group concept ids by tier, each group sorted lexicographically.
fn learning_path(concepts: &BTreeMap<String, Concept>) -> BTreeMap<Tier, Vec<String>> {
    let mut path: BTreeMap<Tier, Vec<String>> =
        Tier::ALL.iter().map(|t| (*t, Vec::new())).collect();

    for (id, concept) in concepts {
        path.entry(concept.tier).or_default().push(id.clone());
    }
    for ids in path.values_mut() {
        ids.sort();
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_doc(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_empty_directory_yields_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = IndexBuilder::new(dir.path()).build();

        assert_eq!(snapshot.metadata.total_concepts, 0);
        assert_eq!(snapshot.metadata.files_processed, 0);
        assert!(snapshot.concepts.is_empty());
        assert!(snapshot.cross_references.values().all(|ids| ids.is_empty()));
        assert!(snapshot.learning_path.values().all(|ids| ids.is_empty()));
    }

    #[test]
    fn test_build_extracts_and_merges_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "basic/calculator/CONCEPTS.md",
            "## Ownership Basics\nRust's ownership model ensures memory safety without a garbage collector. See also: borrowing, lifetimes.\n",
        );
        write_doc(
            dir.path(),
            "intermediate/thread-pool/CONCEPTS.md",
            "## Worker Threads\nEach `thread` in the pool receives jobs over a channel from the dispatcher.\n",
        );

        let snapshot = IndexBuilder::new(dir.path()).build();
        assert_eq!(snapshot.metadata.files_processed, 2);
        assert_eq!(snapshot.metadata.total_concepts, 2);

        let ownership = &snapshot.concepts["ownership-basics"];
        assert_eq!(ownership.tier, Tier::Basic);
        assert_eq!(ownership.file_path, "basic/calculator/CONCEPTS.md");
        assert_eq!(ownership.projects, vec!["calculator".to_string()]);
        assert!(ownership.description.starts_with("Rust's ownership model"));
        assert!(ownership.related_concepts.contains(&"borrowing".to_string()));

        let workers = &snapshot.concepts["worker-threads"];
        assert_eq!(workers.tier, Tier::Intermediate);
        assert_eq!(workers.projects, vec!["thread-pool".to_string()]);
    }

    #[test]
    fn test_cross_references_and_learning_path() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "basic/CONCEPTS.md",
            "## Borrowing\nShared references let several readers observe one value safely.\n\n## Vectors\nA `vec` is a growable array and the default iterator source in practice.\n",
        );
        write_doc(
            dir.path(),
            "expert/CONCEPTS.md",
            "## Unsafe Code\nRaw pointers opt out of the borrow checker and need manual proofs.\n",
        );

        let snapshot = IndexBuilder::new(dir.path()).build();

        assert!(snapshot.cross_references[&Category::Ownership]
            .contains(&"borrowing".to_string()));
        assert!(snapshot.cross_references[&Category::Collections]
            .contains(&"vectors".to_string()));
        assert_eq!(
            snapshot.cross_references[&Category::Advanced],
            vec!["unsafe-code".to_string()]
        );

        assert_eq!(
            snapshot.learning_path[&Tier::Basic],
            vec!["borrowing".to_string(), "vectors".to_string()]
        );
        assert_eq!(
            snapshot.learning_path[&Tier::Expert],
            vec!["unsafe-code".to_string()]
        );
        assert!(snapshot.learning_path[&Tier::Intermediate].is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_last_document() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "a/CONCEPTS.md",
            "## Shadowing\nRebinding a name replaces the earlier binding for later code.\n",
        );
        write_doc(
            dir.path(),
            "b/CONCEPTS.md",
            "## Shadowing\nShadowing in match guards is a separate discussion entirely here.\n",
        );

        let snapshot = IndexBuilder::new(dir.path()).build();
        assert_eq!(snapshot.metadata.total_concepts, 1);
        // documents are processed in sorted path order, so b/ wins
        assert_eq!(snapshot.concepts["shadowing"].file_path, "b/CONCEPTS.md");
    }

    #[test]
    fn test_non_matching_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "basic/README.md", "## Not Indexed\nThis file is not a concepts document.\n");

        let snapshot = IndexBuilder::new(dir.path()).build();
        assert_eq!(snapshot.metadata.files_processed, 0);
        assert!(snapshot.concepts.is_empty());
    }
}
