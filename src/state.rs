//! Application state management
//!
//! Central state shared with the desktop shell:
//! - Search engine (per-project search state, session history)
//! - Tracked project folders

use std::sync::Mutex;

use crate::config::EngineConfig;
use crate::projects::ProjectRegistry;
use crate::search::SearchEngine;

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Searches run one at a time; the lock serializes them
    pub engine: Mutex<SearchEngine>,

    /// Project folders shown in the project table
    pub projects: Mutex<ProjectRegistry>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Mutex::new(SearchEngine::new(config)),
            projects: Mutex::new(ProjectRegistry::new()),
        }
    }

    /// Stop tracking a project and drop its search state
    pub fn remove_project(&self, path: &str) -> Result<(), String> {
        let removed = self
            .projects
            .lock()
            .map_err(|e| e.to_string())?
            .remove(path)
            .map_err(|e| e.to_string())?;
        self.engine
            .lock()
            .map_err(|e| e.to_string())?
            .forget_project(&removed);
        Ok(())
    }
}
