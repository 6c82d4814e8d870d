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

//! Heading-based document sectioning.

use regex::Regex;

/// One titled section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text, trimmed.
    pub title: String,
    /// Every line after the heading up to the next qualifying heading.
    pub body: String,
}

/// Splits raw document text into sections on level 2-4 headings.
///
/// Headings deeper than level 4 stay in the surrounding section body,
/// as does everything else that is not a qualifying heading. Content
/// before the first qualifying heading is discarded.
pub struct SectionParser {
    heading_re: Regex,
}

impl Default for SectionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionParser {
    /// Create a parser with the compiled heading pattern.
    pub fn new() -> Self {
        Self {
            heading_re: Regex::new(r"^(#{2,4})\s+(.+)$").expect("valid heading pattern"),
        }
    }

    /// Parse document text into an ordered sequence of sections.
    pub fn parse(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current_title: Option<String> = None;
        let mut current_body: Vec<&str> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = self.heading_re.captures(line) {
                if let Some(title) = current_title.take() {
                    sections.push(Section {
                        title,
                        body: current_body.join("\n"),
                    });
                    current_body.clear();
                }
                current_title = Some(caps[2].trim().to_string());
            } else if current_title.is_some() {
                current_body.push(line);
            }
        }

        if let Some(title) = current_title {
            sections.push(Section {
                title,
                body: current_body.join("\n"),
            });
        }

        sections
    }
}
