//! Category resolution
//!
//! Maps a project root and a category to the directories that hold its
//! files, and sniffs file prefixes for the content-based filters.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::models::{Category, ContentFilter, SearchLocation};

/// SUSHI configuration file expected at the project root
pub const SUSHI_CONFIG_FILE: &str = "sushi-config.yaml";

const RESOURCE_EXTENSIONS: &[&str] = &[".json", ".xml", ".map", ".ttl"];
const FHIR_XML_NAMESPACE: &str = r#"xmlns="http://hl7.org/fhir""#;
const FHIR_BASE_URL: &str = "http://hl7.org/fhir";

/// Extensions always treated as text without sniffing
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "text", "md", "markdown", "html", "htm", "xhtml", "xml", "json", "csv", "tsv", "css",
    "js", "ts", "yaml", "yml", "properties", "po", "pot", "xliff", "xlf",
];

/// Candidate locations for a category, before the existence check
fn candidate_locations(root: &Path, category: Category) -> Vec<SearchLocation> {
    let input = root.join("input");
    let output = root.join("output");

    match category {
        Category::Fsh => vec![
            SearchLocation {
                path: root.to_path_buf(),
                extensions: &[".yaml"],
                recursive: false,
                filter: Some(ContentFilter::FileName(SUSHI_CONFIG_FILE)),
            },
            SearchLocation {
                path: input,
                extensions: &[".fsh"],
                recursive: true,
                filter: None,
            },
        ],
        Category::InputResources => {
            let mut locations = vec![SearchLocation {
                path: input,
                extensions: RESOURCE_EXTENSIONS,
                recursive: true,
                filter: Some(ContentFilter::FhirResource),
            }];
            let generated = root.join("fsh-generated");
            if generated.is_dir() {
                locations.push(SearchLocation {
                    path: generated,
                    extensions: RESOURCE_EXTENSIONS,
                    recursive: true,
                    filter: Some(ContentFilter::FhirResource),
                });
            }
            locations
        }
        Category::InputPages => vec![SearchLocation {
            path: input.join("pagecontent"),
            extensions: &[],
            recursive: true,
            filter: None,
        }],
        Category::Translations => vec![SearchLocation {
            path: input.join("translations"),
            extensions: &[],
            recursive: true,
            filter: Some(ContentFilter::Text),
        }],
        Category::OutputResources => vec![SearchLocation {
            path: output,
            extensions: &[".json"],
            recursive: true,
            filter: Some(ContentFilter::FhirResource),
        }],
        Category::OutputHtml => vec![SearchLocation {
            path: output,
            extensions: &[".html"],
            recursive: true,
            filter: None,
        }],
    }
}

/// Existing search locations for a category. An empty list is not an error.
pub fn resolve_locations(root: &Path, category: Category) -> Vec<SearchLocation> {
    candidate_locations(root, category)
        .into_iter()
        .filter(|loc| loc.path.exists())
        .collect()
}

/// Which categories can be offered for a project.
///
/// Probe failures count as "not available".
pub fn category_availability(root: &Path) -> IndexMap<Category, bool> {
    let has_sushi = root.join(SUSHI_CONFIG_FILE).exists();
    let has_output = root.join("output").is_dir();

    Category::ALL
        .iter()
        .map(|&category| {
            let available = match category {
                Category::Fsh => has_sushi,
                Category::InputResources | Category::InputPages | Category::Translations => true,
                Category::OutputResources | Category::OutputHtml => has_output,
            };
            (category, available)
        })
        .collect()
}

/// Apply a location's content filter to one candidate file
pub fn passes_filter(path: &Path, filter: Option<ContentFilter>, config: &EngineConfig) -> bool {
    match filter {
        None => true,
        Some(ContentFilter::FileName(name)) => {
            path.file_name().map(|n| n == name).unwrap_or(false)
        }
        Some(ContentFilter::FhirResource) => looks_like_resource(path, config.resource_sniff_chars),
        Some(ContentFilter::Text) => looks_like_text(path, config.text_sniff_bytes),
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Read at most `max_chars` characters from the start of a file
fn read_char_prefix(path: &Path, max_chars: usize) -> std::io::Result<String> {
    let mut buf = Vec::new();
    // A char is at most four bytes in UTF-8
    File::open(path)?
        .take((max_chars as u64).saturating_mul(4))
        .read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).chars().take(max_chars).collect())
}

/// Heuristic check that a file holds a FHIR resource.
///
/// Only the first `window` characters are inspected, so a marker that
/// appears later in the file is missed.
pub fn looks_like_resource(path: &Path, window: usize) -> bool {
    let ext = lowercase_extension(path);
    match ext.as_str() {
        "map" | "ttl" => true,
        "json" | "xml" => match read_char_prefix(path, window) {
            Ok(prefix) if ext == "json" => prefix.contains("\"resourceType\""),
            Ok(prefix) => prefix.contains(FHIR_XML_NAMESPACE) || prefix.contains(FHIR_BASE_URL),
            Err(e) => {
                log::debug!("Could not sniff {}: {}", path.display(), e);
                false
            }
        },
        _ => false,
    }
}

/// Known text extensions pass outright; anything else is text when its
/// first `window` bytes contain no NUL.
pub fn looks_like_text(path: &Path, window: usize) -> bool {
    let ext = lowercase_extension(path);
    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        return true;
    }

    let mut buf = Vec::with_capacity(window);
    let read = File::open(path).and_then(|f| f.take(window as u64).read_to_end(&mut buf));
    match read {
        Ok(_) => !buf.contains(&0),
        Err(e) => {
            log::debug!("Could not sniff {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_fsh_locations() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("input")).unwrap();

        let locations = resolve_locations(root, Category::Fsh);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].path, root);
        assert!(!locations[0].recursive);
        assert_eq!(
            locations[0].filter,
            Some(ContentFilter::FileName(SUSHI_CONFIG_FILE))
        );
        assert_eq!(locations[1].path, root.join("input"));
        assert_eq!(locations[1].extensions, &[".fsh"]);
        assert!(locations[1].recursive);
    }

    #[test]
    fn test_input_resources_includes_fsh_generated_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("input")).unwrap();
        assert_eq!(resolve_locations(root, Category::InputResources).len(), 1);

        fs::create_dir_all(root.join("fsh-generated")).unwrap();
        let locations = resolve_locations(root, Category::InputResources);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[1].path, root.join("fsh-generated"));
        assert_eq!(locations[1].filter, Some(ContentFilter::FhirResource));
    }

    #[test]
    fn test_missing_locations_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        assert!(resolve_locations(root, Category::InputPages).is_empty());
        assert!(resolve_locations(root, Category::Translations).is_empty());
        assert!(resolve_locations(root, Category::OutputHtml).is_empty());
    }

    #[test]
    fn test_output_locations() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("output")).unwrap();

        let resources = resolve_locations(root, Category::OutputResources);
        assert_eq!(resources[0].extensions, &[".json"]);
        assert_eq!(resources[0].filter, Some(ContentFilter::FhirResource));

        let html = resolve_locations(root, Category::OutputHtml);
        assert_eq!(html[0].extensions, &[".html"]);
        assert_eq!(html[0].filter, None);
    }

    #[test]
    fn test_availability() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let availability = category_availability(root);
        assert!(!availability[&Category::Fsh]);
        assert!(availability[&Category::InputResources]);
        assert!(availability[&Category::InputPages]);
        assert!(availability[&Category::Translations]);
        assert!(!availability[&Category::OutputResources]);
        assert!(!availability[&Category::OutputHtml]);

        write(root, SUSHI_CONFIG_FILE, b"id: test\n");
        fs::create_dir_all(root.join("output")).unwrap();
        let availability = category_availability(root);
        assert!(availability[&Category::Fsh]);
        assert!(availability[&Category::OutputHtml]);
    }

    #[test]
    fn test_output_file_is_not_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "output", b"not a dir");
        assert!(!category_availability(dir.path())[&Category::OutputResources]);
    }

    #[test]
    fn test_resource_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let json = write(root, "p.json", br#"{ "resourceType": "Patient" }"#);
        let plain_json = write(root, "package.json", br#"{ "name": "x" }"#);
        let xml = write(
            root,
            "p.xml",
            br#"<Patient xmlns="http://hl7.org/fhir"><id value="a"/></Patient>"#,
        );
        let other_xml = write(root, "pom.xml", b"<project/>");
        let map = write(root, "m.map", b"anything");

        assert!(looks_like_resource(&json, 2000));
        assert!(!looks_like_resource(&plain_json, 2000));
        assert!(looks_like_resource(&xml, 2000));
        assert!(!looks_like_resource(&other_xml, 2000));
        assert!(looks_like_resource(&map, 2000));
        assert!(!looks_like_resource(&root.join("gone.json"), 2000));
    }

    #[test]
    fn test_resource_marker_past_window_is_missed() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = format!("{{ \"pad\": \"{}\", ", "x".repeat(2100));
        content.push_str("\"resourceType\": \"Patient\" }");
        let path = write(dir.path(), "late.json", content.as_bytes());

        assert!(!looks_like_resource(&path, 2000));
        assert!(looks_like_resource(&path, 4000));
    }

    #[test]
    fn test_text_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let md = write(root, "a.md", b"\0\0 binary but known extension");
        let unknown_text = write(root, "notes.lang", b"hello = bonjour");
        let binary = write(root, "blob.bin", b"PK\x03\x04\0\0");

        assert!(looks_like_text(&md, 512));
        assert!(looks_like_text(&unknown_text, 512));
        assert!(!looks_like_text(&binary, 512));
        assert!(!looks_like_text(&root.join("gone.bin"), 512));
    }

    #[test]
    fn test_file_name_filter() {
        let config = EngineConfig::default();
        let filter = Some(ContentFilter::FileName(SUSHI_CONFIG_FILE));
        assert!(passes_filter(Path::new("/ig/sushi-config.yaml"), filter, &config));
        assert!(!passes_filter(Path::new("/ig/other.yaml"), filter, &config));
        assert!(passes_filter(Path::new("/ig/anything"), None, &config));
    }
}
