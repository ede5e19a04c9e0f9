//! Project search
//!
//! This module provides the per-project full-text search:
//! - Category resolution and content sniffing
//! - Directory walking with a fixed exclusion list
//! - Literal/whole-word matching, ranking and the result budget
//! - Per-project search state and session history

pub mod categories;
mod history;
pub mod matcher;
mod store;
pub mod walker;

pub use categories::{category_availability, resolve_locations, SUSHI_CONFIG_FILE};
pub use history::{SearchHistory, MAX_HISTORY_ENTRIES};
pub use store::SearchStateStore;

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use indexmap::IndexMap;
use regex::Regex;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{Category, FileMatchResult, SearchOutcome, SearchRequest, SearchState};

/// Files and match total collected for one category
#[derive(Debug, Default)]
struct CategoryScan {
    results: Vec<FileMatchResult>,
    matches: usize,
    truncated: bool,
}

/// Search engine owning all per-project search state for the session
#[derive(Debug, Default)]
pub struct SearchEngine {
    config: EngineConfig,
    store: SearchStateStore,
    history: SearchHistory,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: SearchStateStore::new(),
            history: SearchHistory::new(),
        }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    pub fn get_state(&mut self, project_root: &str) -> &SearchState {
        self.store.get_state(project_root)
    }

    pub fn set_state(&mut self, project_root: &str, state: SearchState) {
        self.store.set_state(project_root, state);
    }

    /// Called when a build starts for the project
    pub fn invalidate_output(&mut self, project_root: &str) {
        log::debug!("Dropping output search results for {}", project_root);
        self.store.invalidate_output(project_root);
    }

    /// Drop all search state for a project that is no longer tracked
    pub fn forget_project(&mut self, project_root: &str) {
        self.store.remove(project_root);
    }

    pub fn category_availability(&self, project_root: &str) -> IndexMap<Category, bool> {
        category_availability(Path::new(project_root))
    }

    /// Run a search and store it as the project's current state.
    ///
    /// Never fails: errors are reported through `SearchOutcome::error`.
    pub fn perform_search(&mut self, project_root: &str, request: SearchRequest) -> SearchOutcome {
        let outcome = if request.search_term.trim().is_empty() {
            SearchOutcome::default()
        } else {
            let started = Instant::now();
            match run_search(Path::new(project_root), &request, &self.config) {
                Ok(outcome) => {
                    log::info!(
                        "Search for '{}' in {}: {} matches in {} files{} ({:?})",
                        request.search_term,
                        project_root,
                        outcome.total_matches,
                        outcome.results.len(),
                        if outcome.truncated { ", truncated" } else { "" },
                        started.elapsed()
                    );
                    outcome
                }
                Err(e) => {
                    log::warn!("Search for '{}' failed: {}", request.search_term, e);
                    SearchOutcome::failed(e.to_string())
                }
            }
        };

        if outcome.error.is_none() {
            self.history
                .add(project_root, &request.search_term, outcome.total_matches);
        }

        let mut categories = request.categories;
        for category in Category::ALL {
            categories.entry(category).or_insert(false);
        }

        let state = self.store.get_state(project_root);
        state.search_term = request.search_term;
        state.case_sensitive = request.case_sensitive;
        state.whole_words = request.whole_words;
        state.categories = categories;
        state.results = outcome.results.clone();
        state.last_search_time = Some(Utc::now());

        outcome
    }
}

/// Scan enabled categories in the order of the request's map
fn run_search(root: &Path, request: &SearchRequest, config: &EngineConfig) -> Result<SearchOutcome> {
    let pattern = matcher::build_pattern(
        &request.search_term,
        request.case_sensitive,
        request.whole_words,
    )?;
    let budget = config.max_results;

    let mut results = Vec::new();
    let mut running = 0;
    let mut truncated = false;

    for (&category, &enabled) in &request.categories {
        if !enabled {
            continue;
        }
        if truncated {
            break;
        }

        // With the budget full this only looks for one more match
        let scan = scan_category(root, category, &pattern, config, budget - running);
        running += scan.matches;
        truncated |= scan.truncated;
        results.extend(scan.results);
    }

    matcher::rank_results(&mut results, &pattern);
    if results.len() > budget {
        results.truncate(budget);
        truncated = true;
    }

    let total_matches = results.iter().map(|r| r.total_matches).sum();
    Ok(SearchOutcome {
        results,
        total_matches,
        error: None,
        truncated,
    })
}

/// Scan one category until its matches reach `remaining`.
///
/// Once the budget is full, scanning goes on only until one more matching
/// file shows up; that match is dropped and marks the scan truncated.
fn scan_category(
    root: &Path,
    category: Category,
    pattern: &Regex,
    config: &EngineConfig,
    remaining: usize,
) -> CategoryScan {
    let mut scan = CategoryScan::default();

    'locations: for location in resolve_locations(root, category) {
        let files = walker::find_files(&location.path, location.extensions, location.recursive);
        for path in files {
            if !categories::passes_filter(&path, location.filter, config) {
                continue;
            }

            let found = match matcher::scan_file(&path, root, category, pattern) {
                Ok(Some(found)) => found,
                Ok(None) => continue,
                Err(e) => {
                    log::debug!("Skipping file: {}", e);
                    continue;
                }
            };

            if scan.matches >= remaining {
                scan.truncated = true;
                break 'locations;
            }

            let found_matches = found.total_matches;
            match matcher::fit_to_budget(found, remaining - scan.matches) {
                Some(fitted) => {
                    scan.truncated |= fitted.total_matches < found_matches;
                    scan.matches += fitted.total_matches;
                    scan.results.push(fitted);
                }
                None => scan.truncated = true,
            }
        }
    }

    scan
}
