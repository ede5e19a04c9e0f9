//! Tauri command handlers
//!
//! All Tauri commands exposed to the frontend are defined here.
//! Split into submodules by functionality.

mod projects;
mod search;

pub use projects::*;
pub use search::*;
