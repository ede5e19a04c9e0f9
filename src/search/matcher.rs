use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SearchError};
use crate::models::{Category, FileMatchResult, LineMatch};

/// Build the match pattern for a literal search term
pub fn build_pattern(term: &str, case_sensitive: bool, whole_words: bool) -> Result<Regex> {
    let escaped = regex::escape(term);
    let pattern = if whole_words {
        format!(r"\b{}\b", escaped)
    } else {
        escaped
    };

    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()?)
}

/// Matching lines of `content`, with 1-based line numbers
pub fn match_lines(content: &str, pattern: &Regex) -> Vec<LineMatch> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let count = pattern.find_iter(line).count();
            (count > 0).then(|| LineMatch {
                line_number: idx + 1,
                line_text: line.trim().to_string(),
                match_count: count,
            })
        })
        .collect()
}

/// Display path of `path` relative to the project root, `/`-separated
pub fn relative_display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Scan one file. `Ok(None)` means it has no matching line.
pub fn scan_file(
    path: &Path,
    root: &Path,
    category: Category,
    pattern: &Regex,
) -> Result<Option<FileMatchResult>> {
    let bytes = fs::read(path).map_err(|source| SearchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let matches = match_lines(&content, pattern);
    if matches.is_empty() {
        return Ok(None);
    }

    let total_matches = matches.iter().map(|m| m.match_count).sum();
    Ok(Some(FileMatchResult {
        path: path.to_string_lossy().to_string(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        relative_path: relative_display_path(root, path),
        category,
        matches,
        total_matches,
    }))
}

/// Keep the leading lines of a result whose matches fit in `remaining`.
///
/// Returns `None` when not even the first line fits. Lines are never split.
pub fn fit_to_budget(mut result: FileMatchResult, remaining: usize) -> Option<FileMatchResult> {
    if result.total_matches <= remaining {
        return Some(result);
    }

    let mut used = 0;
    let keep = result
        .matches
        .iter()
        .take_while(|m| {
            used += m.match_count;
            used <= remaining
        })
        .count();
    if keep == 0 {
        return None;
    }

    result.matches.truncate(keep);
    result.total_matches = result.matches.iter().map(|m| m.match_count).sum();
    Some(result)
}

/// Order results: name matches first, then more matching lines first
pub fn rank_results(results: &mut [FileMatchResult], pattern: &Regex) {
    results.sort_by(|a, b| {
        let a_name = pattern.is_match(&a.file_name);
        let b_name = pattern.is_match(&b.file_name);
        match (a_name, b_name) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => b.matches.len().cmp(&a.matches.len()),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, lines: &[usize]) -> FileMatchResult {
        let matches: Vec<LineMatch> = lines
            .iter()
            .enumerate()
            .map(|(i, &count)| LineMatch {
                line_number: i + 1,
                line_text: format!("line {}", i + 1),
                match_count: count,
            })
            .collect();
        FileMatchResult {
            path: format!("/ig/{}", name),
            file_name: name.to_string(),
            relative_path: name.to_string(),
            category: Category::InputPages,
            total_matches: lines.iter().sum(),
            matches,
        }
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = build_pattern("a.b*(c)", true, false).unwrap();
        assert!(pattern.is_match("x a.b*(c) y"));
        assert!(!pattern.is_match("aXbbb(c)"));
    }

    #[test]
    fn test_case_sensitivity() {
        let insensitive = build_pattern("hello", false, false).unwrap();
        let sensitive = build_pattern("hello", true, false).unwrap();
        assert!(insensitive.is_match("Hello world"));
        assert!(!sensitive.is_match("Hello world"));
    }

    #[test]
    fn test_whole_words() {
        let pattern = build_pattern("cat", false, true).unwrap();
        assert!(!pattern.is_match("category"));
        assert!(pattern.is_match("the cat sat"));

        let loose = build_pattern("cat", false, false).unwrap();
        assert!(loose.is_match("category"));
    }

    #[test]
    fn test_match_lines_counts_and_trims() {
        let pattern = build_pattern("obs", false, false).unwrap();
        let content = "first\n   Obs and obs again  \nnone\nobs\n";
        let lines = match_lines(content, &pattern);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_number, 2);
        assert_eq!(lines[0].line_text, "Obs and obs again");
        assert_eq!(lines[0].match_count, 2);
        assert_eq!(lines[1].line_number, 4);
    }

    #[test]
    fn test_scan_file_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "nothing here").unwrap();
        let pattern = build_pattern("patient", false, false).unwrap();

        let scanned = scan_file(&path, dir.path(), Category::InputPages, &pattern).unwrap();
        assert!(scanned.is_none());
    }

    #[test]
    fn test_scan_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = build_pattern("x", false, false).unwrap();
        let scanned = scan_file(
            &dir.path().join("gone.md"),
            dir.path(),
            Category::InputPages,
            &pattern,
        );
        assert!(matches!(scanned, Err(SearchError::Io { .. })));
    }

    #[test]
    fn test_relative_display_path() {
        let root = Path::new("/ig");
        assert_eq!(
            relative_display_path(root, Path::new("/ig/input/pagecontent/intro.md")),
            "input/pagecontent/intro.md"
        );
        assert_eq!(relative_display_path(root, Path::new("/other/x")), "/other/x");
    }

    #[test]
    fn test_fit_to_budget() {
        assert_eq!(fit_to_budget(result("a.md", &[1, 2]), 5).unwrap().total_matches, 3);

        let trimmed = fit_to_budget(result("a.md", &[1, 2, 1]), 3).unwrap();
        assert_eq!(trimmed.matches.len(), 2);
        assert_eq!(trimmed.total_matches, 3);

        assert!(fit_to_budget(result("a.md", &[4]), 3).is_none());
    }

    #[test]
    fn test_rank_name_matches_first_then_line_count() {
        let pattern = build_pattern("patient", false, false).unwrap();
        let mut results = vec![
            result("intro.md", &[1]),
            result("notes.md", &[1, 1, 1]),
            result("Patient.fsh", &[1]),
        ];
        rank_results(&mut results, &pattern);

        let order: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(order, vec!["Patient.fsh", "notes.md", "intro.md"]);
    }
}
