use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into, compared case-insensitively
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "bower_components",
    ".npm",
    ".yarn",
    "__pycache__",
    "input-cache",
    "temp",
    "template",
    "build",
    "dist",
    "target",
    ".gradle",
    ".idea",
    ".vscode",
];

/// Check if a directory name is on the exclusion list
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.iter().any(|d| d.eq_ignore_ascii_case(name))
}

/// Check a file name against an extension allow-list (`.json` style, any case).
/// An empty list accepts every file.
pub fn has_allowed_extension(path: &Path, extensions: &[&str]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => return false,
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && is_excluded_dir(&entry.file_name().to_string_lossy())
}

/// Enumerate files under `dir` whose extension is allowed.
///
/// Excluded directories are pruned below the starting directory. Entries
/// that cannot be read are skipped and the walk continues with siblings.
pub fn find_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_entry(|e| !is_pruned(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_allowed_extension(e.path(), extensions))
        .map(DirEntry::into_path)
        .collect()
}
