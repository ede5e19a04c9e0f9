use chrono::Utc;
use std::collections::VecDeque;

use crate::models::SearchHistoryEntry;

/// Maximum number of search history entries to keep
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Session search history, most recent first
#[derive(Debug, Default)]
pub struct SearchHistory {
    entries: VecDeque<SearchHistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_ENTRIES),
        }
    }

    fn same_search(entry: &SearchHistoryEntry, project_root: &str, query: &str) -> bool {
        entry.project_root == project_root && entry.query.to_lowercase() == query.to_lowercase()
    }

    /// Record a search for a project
    pub fn add(&mut self, project_root: &str, query: &str, total_matches: usize) {
        if query.trim().is_empty() {
            return;
        }

        // Re-running a search moves it to the front
        self.entries
            .retain(|e| !Self::same_search(e, project_root, query));

        self.entries.push_front(SearchHistoryEntry {
            project_root: project_root.to_string(),
            query: query.to_string(),
            timestamp: Utc::now(),
            total_matches,
        });

        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn recent(&self, count: usize) -> Vec<SearchHistoryEntry> {
        self.entries.iter().take(count).cloned().collect()
    }

    pub fn for_project(&self, project_root: &str) -> Vec<SearchHistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.project_root == project_root)
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
