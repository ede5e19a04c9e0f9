use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// File classification bucket searched independently within a project
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// FSH shorthand sources and the SUSHI configuration
    Fsh,
    /// Authored FHIR resources under `input/` and `fsh-generated/`
    InputResources,
    /// Narrative page fragments under `input/pagecontent/`
    InputPages,
    /// Localized text under `input/translations/`
    Translations,
    /// Built resources under `output/`
    OutputResources,
    /// Built HTML pages under `output/`
    OutputHtml,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Fsh,
        Category::InputResources,
        Category::InputPages,
        Category::Translations,
        Category::OutputResources,
        Category::OutputHtml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fsh => "fsh",
            Category::InputResources => "inputResources",
            Category::InputPages => "inputPages",
            Category::Translations => "translations",
            Category::OutputResources => "outputResources",
            Category::OutputHtml => "outputHtml",
        }
    }

    /// Categories whose files are regenerated by a build
    pub fn is_output(self) -> bool {
        matches!(self, Category::OutputResources | Category::OutputHtml)
    }

    /// Output categories start disabled; everything authored is searched by default
    pub fn enabled_by_default(self) -> bool {
        !self.is_output()
    }

    /// Enablement map in canonical order with each category at its default
    pub fn default_enablement() -> IndexMap<Category, bool> {
        Category::ALL
            .iter()
            .map(|c| (*c, c.enabled_by_default()))
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-project search configuration and the most recent result set
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchState {
    pub search_term: String,
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub categories: IndexMap<Category, bool>,
    pub results: Vec<FileMatchResult>,
    pub last_search_time: Option<DateTime<Utc>>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            case_sensitive: false,
            whole_words: false,
            categories: Category::default_enablement(),
            results: Vec::new(),
            last_search_time: None,
        }
    }
}

/// Per-file predicate applied to candidates of a search location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFilter {
    /// File name must equal the given name exactly
    FileName(&'static str),
    /// Content prefix must look like a FHIR resource
    FhirResource,
    /// Content prefix must look like text rather than binary
    Text,
}

/// Resolved, existing directory scope contributing files to a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocation {
    pub path: PathBuf,
    /// Allowed extensions including the leading dot; empty means any file
    pub extensions: &'static [&'static str],
    pub recursive: bool,
    pub filter: Option<ContentFilter>,
}

/// One matching line within a file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineMatch {
    /// 1-based
    pub line_number: usize,
    pub line_text: String,
    pub match_count: usize,
}

/// All matching lines of one file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMatchResult {
    pub path: String,
    pub file_name: String,
    /// Path relative to the project root, `/`-separated
    pub relative_path: String,
    pub category: Category,
    pub matches: Vec<LineMatch>,
    pub total_matches: usize,
}

/// What the presentation layer sends to trigger a search
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub search_term: String,
    pub case_sensitive: bool,
    pub whole_words: bool,
    /// Iteration order of this map is the category scan order
    pub categories: IndexMap<Category, bool>,
}

/// Result shape handed back to the presentation layer
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<FileMatchResult>,
    pub total_matches: usize,
    pub error: Option<String>,
    pub truncated: bool,
}

impl SearchOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// A tracked project folder
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub path: String,
    pub name: String,
    pub has_sushi_config: bool,
    pub has_output: bool,
    /// Well-known build outputs that currently exist, root-relative
    pub artifacts: Vec<String>,
    pub ig_version: Option<String>,
}

/// Search history entry
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub project_root: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub total_matches: usize,
}
