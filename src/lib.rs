//! IG Manager backend
//!
//! Tracks local FHIR Implementation Guide projects and searches their
//! sources, resources, pages, translations and build output.

pub mod config;
pub mod error;
pub mod models;
pub mod projects;
pub mod search;
pub mod state;

#[cfg(feature = "desktop")]
mod commands;

pub use config::EngineConfig;
pub use error::{ConfigError, ProjectError, SearchError};
pub use models::{
    Category, FileMatchResult, LineMatch, ProjectInfo, SearchOutcome, SearchRequest, SearchState,
};
pub use search::SearchEngine;
pub use state::AppState;

#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
const CONFIG_FILE_NAME: &str = "search.json";

#[cfg(feature = "desktop")]
fn load_engine_config(app: &tauri::App) -> EngineConfig {
    let path = match app.path().app_config_dir() {
        Ok(dir) => dir.join(CONFIG_FILE_NAME),
        Err(e) => {
            log::warn!("No config directory, using default search settings: {}", e);
            return EngineConfig::default();
        }
    };
    EngineConfig::load(&path).unwrap_or_else(|e| {
        log::warn!("Ignoring {}: {}", path.display(), e);
        EngineConfig::default()
    })
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::*;

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(if cfg!(debug_assertions) {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                })
                .build(),
        )
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            perform_search,
            get_search_state,
            set_search_state,
            get_category_availability,
            notify_build_started,
            get_search_history,
            clear_search_history,
            add_project,
            remove_project,
            list_projects,
            refresh_project,
            open_path
        ])
        .setup(|app| {
            let config = load_engine_config(app);
            log::info!("Search budget: {} matches", config.max_results);
            app.manage(AppState::new(config));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
