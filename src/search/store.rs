use rustc_hash::FxHashMap;

use crate::models::SearchState;

/// Per-project search state, keyed by project root
#[derive(Debug, Default)]
pub struct SearchStateStore {
    states: FxHashMap<String, SearchState>,
}

impl SearchStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state for a project, creating the default one on first access
    pub fn get_state(&mut self, project_root: &str) -> &mut SearchState {
        self.states.entry(project_root.to_string()).or_default()
    }

    /// Replace a project's state wholesale
    pub fn set_state(&mut self, project_root: &str, state: SearchState) {
        self.states.insert(project_root.to_string(), state);
    }

    /// Drop stored results from output categories; a build is about to regenerate them
    pub fn invalidate_output(&mut self, project_root: &str) {
        if let Some(state) = self.states.get_mut(project_root) {
            state.results.retain(|r| !r.category.is_output());
        }
    }

    /// Forget a project entirely
    pub fn remove(&mut self, project_root: &str) -> Option<SearchState> {
        self.states.remove(project_root)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
