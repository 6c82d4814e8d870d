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

//! End-to-end tests: build a corpus on disk, load the snapshot, query.

use conceptbase_index::IndexBuilder;
use conceptbase_query::QueryEngine;
use std::fs;
use std::path::Path;

fn write_doc(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn build_corpus(root: &Path) -> QueryEngine {
    write_doc(
        root,
        "basic/calculator/CONCEPTS.md",
        "## Ownership Basics\nRust's ownership model ensures memory safety without a garbage collector. See also: borrowing, lifetimes.\n\n## Borrowing\nA `&T` reference borrows a value without taking ownership of it.\n",
    );
    write_doc(
        root,
        "intermediate/thread-pool/CONCEPTS.md",
        "## Worker Threads\nEach `thread` in the pool receives jobs over an `mpsc` channel shared by workers.\n",
    );

    let output = root.join("concept_index.json");
    IndexBuilder::new(root).build_and_save(&output).unwrap();
    QueryEngine::open(&output)
}

/// Free-text search finds the basic concept with a title + id +
/// keyword driven score.
#[test]
fn test_search_over_built_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let engine = build_corpus(dir.path());

    let hits = engine.search("ownership", false);
    assert_eq!(hits[0].id, "ownership-basics");
    assert!(hits[0].score >= 50.0);
}

#[test]
fn test_exact_search_round_trips_ids() {
    let dir = tempfile::tempdir().unwrap();
    let engine = build_corpus(dir.path());

    for id in engine.snapshot().concepts.keys() {
        let hits = engine.search(id, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 100.0);

        let hits = engine.search(&id.replace('-', " "), true);
        assert_eq!(hits.len(), 1, "spaced form of {id} should match");
    }

    assert!(engine.search("no-such-concept", true).is_empty());
}

#[test]
fn test_tier_filter_matches_learning_path() {
    let dir = tempfile::tempdir().unwrap();
    let engine = build_corpus(dir.path());

    let basic = engine.concepts_by_tier("basic");
    let ids: Vec<&str> = basic.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["borrowing", "ownership-basics"]);

    let snapshot_ids = &engine.snapshot().learning_path[&conceptbase_core::Tier::Basic];
    assert_eq!(ids, snapshot_ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_project_filter_and_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let engine = build_corpus(dir.path());

    let entries = engine.concepts_by_project("thread-pool");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "worker-threads");

    // ownership-basics has no resolvable related ids in the corpus
    // except borrowing; the next tier contributes worker-threads first
    let suggestions = engine.suggest_next("ownership-basics").unwrap();
    assert_eq!(suggestions[0].priority, 1);
    assert_eq!(suggestions[0].id, "worker-threads");
    assert!(suggestions.iter().any(|s| s.id == "borrowing" && s.priority == 2));
}

#[test]
fn test_details_points_back_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let engine = build_corpus(dir.path());

    let details = engine.details("worker-threads").unwrap();
    assert_eq!(details.concept.file_path, "intermediate/thread-pool/CONCEPTS.md");
    assert_eq!(details.concept.section, "worker-threads");
}
