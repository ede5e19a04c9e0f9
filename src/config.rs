//! Engine configuration
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of matches a single search returns
pub const DEFAULT_MAX_RESULTS: usize = 200;
/// Characters inspected when deciding whether a file is a FHIR resource
pub const DEFAULT_RESOURCE_SNIFF_CHARS: usize = 2000;
/// Bytes inspected when deciding whether a file is text
pub const DEFAULT_TEXT_SNIFF_BYTES: usize = 512;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub max_results: usize,
    pub resource_sniff_chars: usize,
    pub text_sniff_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            resource_sniff_chars: DEFAULT_RESOURCE_SNIFF_CHARS,
            text_sniff_bytes: DEFAULT_TEXT_SNIFF_BYTES,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("search.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_results, 200);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        fs::write(&path, r#"{ "maxResults": 50 }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.max_results, 50);
        assert_eq!(config.resource_sniff_chars, 2000);
        assert_eq!(config.text_sniff_bytes, 512);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
