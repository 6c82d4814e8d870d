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

//! Conceptbase Core
//!
//! Shared data model for the concept knowledge base: the indexed
//! `Concept` record, the `Tier` learning progression, the fixed
//! cross-reference `Category` buckets, and the persisted `Snapshot`.

pub mod concept;
pub mod error;
pub mod snapshot;

pub use concept::{Category, Concept, Tier};
pub use error::{ConceptbaseError, Result};
pub use snapshot::{Snapshot, SnapshotMetadata};
