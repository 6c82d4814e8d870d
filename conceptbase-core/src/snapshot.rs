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

//! Persisted snapshot of the concept index.
//!
//! The snapshot is the sole hand-off point between the index builder
//! and the query engine: a single JSON document holding the concept
//! mapping, the cross-reference groups, the per-tier learning path and
//! build metadata. Written once per build, read in full at query
//! startup.

use crate::concept::{Category, Concept, Tier};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Build metadata recorded alongside the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Number of concepts in the mapping.
    pub total_concepts: usize,
    /// Number of documents discovered during the scan.
    pub files_processed: usize,
    /// RFC 3339 timestamp of the build.
    pub last_updated: String,
}

/// The full serialized index.
///
/// All maps are `BTreeMap` so iteration, and therefore the serialized
/// form and every derived ordering, is deterministic for a given
/// corpus. `cross_references` always carries all 9 category keys and
/// `learning_path` all 4 tier keys, empty or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub concepts: BTreeMap<String, Concept>,
    pub cross_references: BTreeMap<Category, Vec<String>>,
    pub learning_path: BTreeMap<Tier, Vec<String>>,
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// An empty index with the fixed-key skeleton in place.
    pub fn empty() -> Self {
        Self {
            concepts: BTreeMap::new(),
            cross_references: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
            learning_path: Tier::ALL.iter().map(|t| (*t, Vec::new())).collect(),
            metadata: SnapshotMetadata::default(),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the snapshot to a JSON file.
    ///
    /// The write is all-or-nothing: the document is written to a
    /// temporary file next to the target and renamed into place, so a
    /// failed serialization or write never corrupts an existing
    /// snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        let tmp = match (path.parent(), path.file_name()) {
            (Some(dir), Some(name)) => dir.join(format!(".{}.tmp", name.to_string_lossy())),
            _ => path.with_extension("tmp"),
        };
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_has_fixed_keys() {
        let snapshot = Snapshot::empty();
        assert_eq!(snapshot.cross_references.len(), 9);
        assert_eq!(snapshot.learning_path.len(), 4);
        assert!(snapshot.cross_references.values().all(|ids| ids.is_empty()));
        assert!(snapshot.learning_path.values().all(|ids| ids.is_empty()));
        assert_eq!(snapshot.metadata.total_concepts, 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concept_index.json");

        let mut snapshot = Snapshot::empty();
        snapshot.concepts.insert(
            "ownership".to_string(),
            Concept {
                id: "ownership".to_string(),
                title: "Ownership".to_string(),
                tier: Tier::Basic,
                description: "Every value has a single owner.".to_string(),
                file_path: "basic/CONCEPTS.md".to_string(),
                section: "ownership".to_string(),
                keywords: vec!["ownership".to_string()],
                related_concepts: vec!["borrowing".to_string()],
                projects: vec!["calculator".to_string()],
            },
        );
        snapshot.learning_path.get_mut(&Tier::Basic).unwrap().push("ownership".to_string());
        snapshot.metadata.total_concepts = 1;
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_map_keys_serialize_as_names() {
        let snapshot = Snapshot::empty();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"error-handling\""));
        assert!(json.contains("\"intermediate\""));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Snapshot::load("/nonexistent/concept_index.json").unwrap_err();
        assert!(matches!(err, crate::ConceptbaseError::Io(_)));
    }
}
