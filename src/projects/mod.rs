//! Project tracking
//!
//! Keeps the list of local IG project folders the manager knows about
//! and summarizes what each one currently contains.

use std::fs;
use std::path::Path;

use crate::error::ProjectError;
use crate::models::ProjectInfo;
use crate::search::SUSHI_CONFIG_FILE;

/// Build outputs surfaced in the project list, root-relative
pub const KNOWN_ARTIFACTS: &[&str] = &[
    "output/index.html",
    "output/qa.html",
    "output/full-ig.zip",
    "output/package.tgz",
    "fsh-generated",
];

/// Normalize a project path for use as a key: trailing separators are trimmed
pub fn normalize_project_path(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        path.chars().take(1).collect()
    } else {
        trimmed.to_string()
    }
}

/// Extract folder name from full path
pub fn get_folder_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Read the `version:` entry of a SUSHI configuration
fn read_ig_version(config: &Path) -> Option<String> {
    let raw = fs::read_to_string(config).ok()?;
    raw.lines()
        .filter(|line| !line.starts_with([' ', '\t']))
        .find_map(|line| line.strip_prefix("version:"))
        .map(|v| v.trim().trim_matches(['"', '\'']).to_string())
        .filter(|v| !v.is_empty())
}

/// Summarize a project folder
pub fn project_info(path: &str) -> ProjectInfo {
    let root = Path::new(path);
    let sushi_config = root.join(SUSHI_CONFIG_FILE);

    ProjectInfo {
        path: path.to_string(),
        name: get_folder_name(path),
        has_sushi_config: sushi_config.is_file(),
        has_output: root.join("output").is_dir(),
        artifacts: KNOWN_ARTIFACTS
            .iter()
            .filter(|rel| root.join(rel).exists())
            .map(|rel| rel.to_string())
            .collect(),
        ig_version: read_ig_version(&sushi_config),
    }
}

/// Tracked project folders in insertion order
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: Vec<String>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        let key = normalize_project_path(path);
        self.projects.iter().any(|p| *p == key)
    }

    /// Track a folder. Adding a tracked folder again returns its current info.
    pub fn add(&mut self, path: &str) -> Result<ProjectInfo, ProjectError> {
        let key = normalize_project_path(path);
        if !Path::new(&key).is_dir() {
            return Err(ProjectError::NotADirectory(key.into()));
        }

        if !self.contains(&key) {
            log::info!("Tracking project {}", key);
            self.projects.push(key.clone());
        }
        Ok(project_info(&key))
    }

    pub fn remove(&mut self, path: &str) -> Result<String, ProjectError> {
        let key = normalize_project_path(path);
        let idx = self
            .projects
            .iter()
            .position(|p| *p == key)
            .ok_or_else(|| ProjectError::NotTracked(key.clone()))?;
        log::info!("No longer tracking project {}", key);
        Ok(self.projects.remove(idx))
    }

    pub fn list(&self) -> Vec<ProjectInfo> {
        self.projects.iter().map(|p| project_info(p)).collect()
    }

    pub fn refresh(&self, path: &str) -> Result<ProjectInfo, ProjectError> {
        let key = normalize_project_path(path);
        if !self.contains(&key) {
            return Err(ProjectError::NotTracked(key));
        }
        Ok(project_info(&key))
    }
}
