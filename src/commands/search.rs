use indexmap::IndexMap;
use tauri::State;

use crate::models::{Category, SearchHistoryEntry, SearchOutcome, SearchRequest, SearchState};
use crate::projects::normalize_project_path;
use crate::state::AppState;

/// Search a project
///
/// The engine lock is held for the whole search, so a second search
/// waits for the first to finish.
#[tauri::command]
pub async fn perform_search(
    project_root: String,
    request: SearchRequest,
    state: State<'_, AppState>,
) -> Result<SearchOutcome, String> {
    let root = normalize_project_path(&project_root);
    let mut engine = state.engine.lock().map_err(|e| e.to_string())?;
    Ok(engine.perform_search(&root, request))
}

/// Current search configuration and results for a project
#[tauri::command]
pub async fn get_search_state(
    project_root: String,
    state: State<'_, AppState>,
) -> Result<SearchState, String> {
    let root = normalize_project_path(&project_root);
    let mut engine = state.engine.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_state(&root).clone())
}

/// Replace a project's search state (e.g. when the search panel is edited)
#[tauri::command]
pub async fn set_search_state(
    project_root: String,
    search_state: SearchState,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let root = normalize_project_path(&project_root);
    let mut engine = state.engine.lock().map_err(|e| e.to_string())?;
    engine.set_state(&root, search_state);
    Ok(())
}

/// Which category checkboxes can be enabled for a project
#[tauri::command]
pub async fn get_category_availability(
    project_root: String,
    state: State<'_, AppState>,
) -> Result<IndexMap<Category, bool>, String> {
    let root = normalize_project_path(&project_root);
    let engine = state.engine.lock().map_err(|e| e.to_string())?;
    Ok(engine.category_availability(&root))
}

/// A build was started; output hits are stale until searched again
#[tauri::command]
pub async fn notify_build_started(
    project_root: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let root = normalize_project_path(&project_root);
    let mut engine = state.engine.lock().map_err(|e| e.to_string())?;
    engine.invalidate_output(&root);
    Ok(())
}

/// Get search history
#[tauri::command]
pub async fn get_search_history(
    count: Option<usize>,
    state: State<'_, AppState>,
) -> Result<Vec<SearchHistoryEntry>, String> {
    let engine = state.engine.lock().map_err(|e| e.to_string())?;
    Ok(engine.history().recent(count.unwrap_or(10)))
}

/// Clear search history
#[tauri::command]
pub async fn clear_search_history(state: State<'_, AppState>) -> Result<(), String> {
    let mut engine = state.engine.lock().map_err(|e| e.to_string())?;
    engine.history_mut().clear();
    Ok(())
}
