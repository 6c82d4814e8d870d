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

//! Conceptbase Indexing
//!
//! Turns a documentation tree into a concept snapshot in one batch
//! pass: the section parser splits each document on headings, the
//! concept extractor derives one record per section, and the index
//! builder merges everything and emits the snapshot.

pub mod builder;
pub mod extractor;
pub mod parser;

pub use builder::{IndexBuilder, DOC_FILENAME};
pub use extractor::{ConceptExtractor, ExtractorConfig, DOMAIN_VOCABULARY, PROJECT_CATALOG};
pub use parser::{Section, SectionParser};
