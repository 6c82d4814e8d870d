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

//! Concept records and their classification axes.
//!
//! A `Concept` is one indexed documentation section with derived
//! metadata. `Tier` orders concepts into the learning progression and
//! `Category` groups them into the fixed cross-reference buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Difficulty tier of a concept, ordered by learning progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl Default for Tier {
    fn default() -> Self {
        Self::Basic
    }
}

impl Tier {
    /// All tiers in learning order.
    pub const ALL: [Tier; 4] = [Tier::Basic, Tier::Intermediate, Tier::Advanced, Tier::Expert];

    /// Get the lowercase tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Parse from a tier name, case-insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    /// Derive the tier from a document path.
    ///
    /// First tier name found as a case-insensitive substring of the
    /// path wins, checked in learning order. Paths naming no tier
    /// default to `Basic`.
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| path_str.contains(tier.as_str()))
            .unwrap_or_default()
    }

    /// The next tier in the learning progression, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Basic => Some(Self::Intermediate),
            Self::Intermediate => Some(Self::Advanced),
            Self::Advanced => Some(Self::Expert),
            Self::Expert => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed cross-reference buckets concepts are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Ownership,
    ErrorHandling,
    Concurrency,
    Memory,
    Types,
    Collections,
    Functions,
    Testing,
    Advanced,
}

impl Category {
    /// All categories, in their fixed order.
    pub const ALL: [Category; 9] = [
        Category::Ownership,
        Category::ErrorHandling,
        Category::Concurrency,
        Category::Memory,
        Category::Types,
        Category::Collections,
        Category::Functions,
        Category::Testing,
        Category::Advanced,
    ];

    /// Get the kebab-case category name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ownership => "ownership",
            Self::ErrorHandling => "error-handling",
            Self::Concurrency => "concurrency",
            Self::Memory => "memory",
            Self::Types => "types",
            Self::Collections => "collections",
            Self::Functions => "functions",
            Self::Testing => "testing",
            Self::Advanced => "advanced",
        }
    }

    /// Keywords whose presence places a concept in this category.
    ///
    /// `Testing` and `Advanced` are special-cased in [`Category::matches`].
    fn member_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Ownership => &["ownership", "borrowing", "reference", "lifetime"],
            Self::ErrorHandling => &["result", "option", "error", "unwrap", "expect"],
            Self::Concurrency => &["thread", "async", "await", "mutex", "arc"],
            Self::Memory => &["box", "rc", "heap", "stack", "allocator"],
            Self::Types => &["struct", "enum", "trait", "generic"],
            Self::Collections => &["vec", "hashmap", "iterator", "collect"],
            Self::Functions => &["closure", "fn", "impl"],
            Self::Testing => &["test"],
            Self::Advanced => &[],
        }
    }

    /// Whether the concept belongs in this category.
    pub fn matches(&self, concept: &Concept) -> bool {
        match self {
            Self::Testing => {
                concept.keywords.iter().any(|kw| kw == "test")
                    || concept.title.to_lowercase().contains("testing")
            }
            Self::Advanced => matches!(concept.tier, Tier::Advanced | Tier::Expert),
            _ => {
                let members = self.member_keywords();
                concept.keywords.iter().any(|kw| members.contains(&kw.as_str()))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One indexed documentation section with derived metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Stable identifier derived from the title (lowercase-hyphenated).
    pub id: String,
    /// Original heading text.
    pub title: String,
    /// Difficulty tier, derived from the document path.
    pub tier: Tier,
    /// First meaningful content line, markup stripped, bounded length.
    pub description: String,
    /// Path of the originating document, relative to the corpus root.
    pub file_path: String,
    /// Section anchor within the document (equals the concept id).
    pub section: String,
    /// Lowercase keyword set, sorted, at most 10 entries.
    pub keywords: Vec<String>,
    /// Related concept ids harvested from cue phrases, sorted, at most 5.
    pub related_concepts: Vec<String>,
    /// Project names matched against the document path.
    pub projects: Vec<String>,
}
