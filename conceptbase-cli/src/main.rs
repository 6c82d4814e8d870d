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

//! Conceptbase CLI
//!
//! Command-line interface over the concept index: builds the snapshot
//! and renders query results as text. All indexing and scoring logic
//! lives in the library crates; this binary only parses arguments and
//! formats output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conceptbase_index::IndexBuilder;
use conceptbase_query::{ConceptDetails, QueryEngine, SearchEntry, SearchHit, Suggestion};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "conceptbase")]
#[command(about = "Conceptbase - documentation concept index and search", long_about = None)]
struct Cli {
    /// Snapshot file
    #[arg(short, long, default_value = "concept_index.json")]
    index: PathBuf,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the concept index from a documentation tree
    Build {
        /// Root directory of the documentation corpus
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Search concepts by free text
    Search {
        /// Search query
        query: String,

        /// Match concept ids exactly instead of scoring
        #[arg(long)]
        exact: bool,

        /// Maximum number of results to show
        #[arg(long, default_value = "10")]
        max_results: usize,
    },

    /// Show details for a concept id
    Details {
        /// Concept id
        id: String,
    },

    /// List concepts at a learning tier
    Tier {
        /// Tier name (basic, intermediate, advanced, expert)
        tier: String,
    },

    /// List concepts used by a project
    Project {
        /// Project name (substring match)
        name: String,
    },

    /// Suggest what to learn next
    Suggest {
        /// Concept id to start from
        id: String,
    },

    /// List concepts in a cross-reference category
    Xref {
        /// Category name (substring match)
        category: String,
    },

    /// Show index statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Build doesn't need a loaded snapshot
    if let Commands::Build { root } = &cli.command {
        let snapshot = IndexBuilder::new(root)
            .build_and_save(&cli.index)
            .context("Failed to write concept index")?;
        println!(
            "✓ Indexed {} concepts from {} documents",
            snapshot.metadata.total_concepts, snapshot.metadata.files_processed
        );
        println!("  Snapshot: {}", cli.index.display());
        return Ok(());
    }

    let engine = QueryEngine::open(&cli.index);

    match cli.command {
        Commands::Build { .. } => unreachable!(), // handled above

        Commands::Search {
            query,
            exact,
            max_results,
        } => {
            let hits = engine.search(&query, exact);
            render_search(&hits, max_results);
        }

        Commands::Details { id } => match engine.details(&id) {
            Some(details) => render_details(&details),
            None => println!("Concept '{id}' not found."),
        },

        Commands::Tier { tier } => {
            let entries = engine.concepts_by_tier(&tier);
            if entries.is_empty() {
                println!("No concepts found for tier '{tier}'.");
            } else {
                println!("Concepts at the {tier} tier:");
                render_entries(&entries);
            }
        }

        Commands::Project { name } => {
            let entries = engine.concepts_by_project(&name);
            if entries.is_empty() {
                println!("No concepts found for project '{name}'.");
            } else {
                println!("Concepts used in project '{name}':");
                render_entries(&entries);
            }
        }

        Commands::Suggest { id } => match engine.suggest_next(&id) {
            Some(suggestions) if !suggestions.is_empty() => {
                println!("What to learn after '{id}':");
                render_suggestions(&suggestions);
            }
            Some(_) => println!("No suggestions found for '{id}'."),
            None => println!("Concept '{id}' not found."),
        },

        Commands::Xref { category } => {
            let ids = engine.cross_references(&category);
            if ids.is_empty() {
                println!("No cross-references found for '{category}'.");
            } else {
                println!("Cross-referenced concepts for '{category}':");
                for id in &ids {
                    match engine.get(id) {
                        Some(concept) => println!("- {}: {}", concept.title, concept.description),
                        None => println!("- {id}"),
                    }
                }
            }
        }

        Commands::Stats => {
            let stats = engine.stats();
            println!("Conceptbase Statistics");
            println!("======================");
            println!("Total concepts:  {}", stats.total_concepts);
            println!("Files processed: {}", stats.files_processed);
            println!("Last updated:    {}", stats.last_updated);
            println!();
            println!("Concepts by tier:");
            for (tier, count) in &stats.tier_counts {
                println!("  {tier}: {count}");
            }
        }
    }

    Ok(())
}

fn render_search(hits: &[SearchHit], max_results: usize) {
    if hits.is_empty() {
        println!("No concepts found matching your query.");
        return;
    }

    println!("Found {} concept(s):\n", hits.len());
    for (i, hit) in hits.iter().take(max_results).enumerate() {
        let concept = &hit.concept;
        println!("{}. {} (score: {:.1})", i + 1, concept.title, hit.score);
        println!("   Tier: {}", concept.tier);
        println!("   {}", concept.description);
        if !concept.keywords.is_empty() {
            let shown: Vec<_> = concept.keywords.iter().take(5).cloned().collect();
            println!("   Keywords: {}", shown.join(", "));
        }
        if !concept.projects.is_empty() {
            let shown: Vec<_> = concept.projects.iter().take(3).cloned().collect();
            println!("   Projects: {}", shown.join(", "));
        }
        println!();
    }

    if hits.len() > max_results {
        println!("... and {} more results", hits.len() - max_results);
    }
}

fn render_details(details: &ConceptDetails) {
    let concept = &details.concept;
    println!("=== {} ===", concept.title);
    println!("Tier: {}", concept.tier);
    println!("{}", concept.description);

    if !concept.keywords.is_empty() {
        println!();
        println!("Keywords: {}", concept.keywords.join(", "));
    }
    if !concept.projects.is_empty() {
        println!("Used in projects: {}", concept.projects.join(", "));
    }
    if !details.related.is_empty() {
        println!();
        println!("Related concepts:");
        for related in &details.related {
            println!("  - {} ({}): {}", related.title, related.tier, related.description);
        }
    }

    println!();
    println!("Documentation: {}#{}", concept.file_path, concept.section);
}

fn render_entries(entries: &[SearchEntry]) {
    for entry in entries {
        println!("- {}: {}", entry.concept.title, entry.concept.description);
    }
}

fn render_suggestions(suggestions: &[Suggestion]) {
    for suggestion in suggestions {
        println!("- {} ({})", suggestion.concept.title, suggestion.reason);
        println!("  {}", suggestion.concept.description);
    }
}
