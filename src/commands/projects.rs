use tauri::State;

use crate::models::ProjectInfo;
use crate::state::AppState;

/// Start tracking a project folder
#[tauri::command]
pub async fn add_project(path: String, state: State<'_, AppState>) -> Result<ProjectInfo, String> {
    let mut projects = state.projects.lock().map_err(|e| e.to_string())?;
    projects.add(&path).map_err(|e| e.to_string())
}

/// Stop tracking a project folder and drop its search state
#[tauri::command]
pub async fn remove_project(path: String, state: State<'_, AppState>) -> Result<(), String> {
    state.remove_project(&path)
}

/// Get all tracked projects
#[tauri::command]
pub async fn list_projects(state: State<'_, AppState>) -> Result<Vec<ProjectInfo>, String> {
    let projects = state.projects.lock().map_err(|e| e.to_string())?;
    Ok(projects.list())
}

/// Re-read a project's folder, e.g. after a build finished
#[tauri::command]
pub async fn refresh_project(
    path: String,
    state: State<'_, AppState>,
) -> Result<ProjectInfo, String> {
    let projects = state.projects.lock().map_err(|e| e.to_string())?;
    projects.refresh(&path).map_err(|e| e.to_string())
}

/// Open a file or build artifact with the default application
#[tauri::command]
pub async fn open_path(path: String) -> Result<(), String> {
    opener::open(&path).map_err(|e| e.to_string())
}
