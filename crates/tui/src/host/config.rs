//! Host page layout: which uploaders the demo page shows and how each is configured.

use std::path::{Path, PathBuf};

use asset_uploader_types::{AcceptPatterns, DEFAULT_ACCEPTED_TYPES, SelectedFile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::components::asset_uploader::{DEFAULT_MAX_SIZE, validate_builtin};

const IMAGE_TYPES: &str = "image/jpeg,image/png,image/jpg";

#[derive(Debug, Error)]
pub enum HostConfigError {
    #[error("failed to read host page config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid host page config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("host page config {0} declares no uploaders")]
    NoUploaders(PathBuf),
}

/// Batch rules the host page applies through an uploader's external validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRules {
    pub accepted_types: String,
    pub max_size: u64,
}

impl Default for BatchRules {
    fn default() -> Self {
        Self {
            accepted_types: "image/jpeg,image/png,video/mp4".to_string(),
            max_size: 5 * 1024 * 1024,
        }
    }
}

impl BatchRules {
    /// Returns one message per offending file; an empty list approves the batch.
    pub fn check(&self, files: &[SelectedFile]) -> Vec<String> {
        validate_builtin(files, &AcceptPatterns::parse(&self.accepted_types), self.max_size).error_messages()
    }
}

/// Settings for a single uploader section on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploaderSettings {
    pub heading: Option<String>,
    pub button_title: String,
    pub button_class: Option<String>,
    pub multiple: bool,
    pub accepted_types: String,
    pub max_size: u64,
    pub is_video: bool,
    /// Route this uploader's batches through the page-wide validator.
    pub use_page_validator: bool,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            heading: None,
            button_title: "Upload".to_string(),
            button_class: None,
            multiple: false,
            accepted_types: DEFAULT_ACCEPTED_TYPES.to_string(),
            max_size: DEFAULT_MAX_SIZE,
            is_video: false,
            use_page_validator: true,
        }
    }
}

/// The whole demo page.
///
/// Pages loaded from JSON only get a page-wide validator when they declare one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub validator: Option<BatchRules>,
    pub uploaders: Vec<UploaderSettings>,
}

fn default_title() -> String {
    "Upload Assets".to_string()
}

impl Default for HostPageConfig {
    /// The three-section page: single image, multiple images, video.
    fn default() -> Self {
        let upload_button = Some("upload-button".to_string());
        Self {
            title: default_title(),
            validator: Some(BatchRules::default()),
            uploaders: vec![
                UploaderSettings {
                    heading: Some("Upload Single Image".to_string()),
                    button_title: "Upload Image".to_string(),
                    button_class: upload_button.clone(),
                    accepted_types: IMAGE_TYPES.to_string(),
                    max_size: 1024 * 1024,
                    ..Default::default()
                },
                UploaderSettings {
                    heading: Some("Upload Multiple Images".to_string()),
                    button_title: "Upload Images".to_string(),
                    button_class: upload_button.clone(),
                    multiple: true,
                    accepted_types: IMAGE_TYPES.to_string(),
                    ..Default::default()
                },
                UploaderSettings {
                    heading: Some("Upload Video".to_string()),
                    button_title: "Upload Video".to_string(),
                    button_class: upload_button,
                    accepted_types: "video/mp4".to_string(),
                    is_video: true,
                    ..Default::default()
                },
            ],
        }
    }
}

impl HostPageConfig {
    /// Reads a page layout from a JSON file.
    pub fn load(path: &Path) -> Result<Self, HostConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| HostConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| HostConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.uploaders.is_empty() {
            return Err(HostConfigError::NoUploaders(path.to_path_buf()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn file(name: &str, mime_type: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, mime_type, size, format!("/assets/{name}"))
    }

    #[test]
    fn default_page_has_three_sections() {
        let config = HostPageConfig::default();
        let titles: Vec<_> = config.uploaders.iter().map(|u| u.button_title.as_str()).collect();
        assert_eq!(titles, vec!["Upload Image", "Upload Images", "Upload Video"]);
        assert!(config.uploaders[1].multiple);
        assert!(config.uploaders[2].is_video);
    }

    #[test]
    fn page_rules_report_every_offending_file() {
        let rules = BatchRules::default();
        let messages = rules.check(&[
            file("ok.png", "image/png", 10),
            file("anim.gif", "image/gif", 10),
            file("long.mp4", "video/mp4", 6 * 1024 * 1024),
        ]);
        assert_eq!(messages, vec!["Invalid format: anim.gif", "Size bigger than allowed: long.mp4"]);
        assert!(rules.check(&[file("ok.jpg", "image/jpeg", 1)]).is_empty());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(
            &path,
            r#"{"title":"Gallery","uploaders":[{"buttonTitle":"Add photos","multiple":true,"usePageValidator":false}]}"#,
        )
        .unwrap();

        let config = HostPageConfig::load(&path).unwrap();
        assert_eq!(config.title, "Gallery");
        assert!(config.validator.is_none());
        let uploader = &config.uploaders[0];
        assert_eq!(uploader.accepted_types, DEFAULT_ACCEPTED_TYPES);
        assert_eq!(uploader.max_size, DEFAULT_MAX_SIZE);
        assert!(!uploader.use_page_validator);
    }

    #[test]
    fn load_rejects_pages_without_uploaders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"{"uploaders":[]}"#).unwrap();
        assert!(matches!(HostPageConfig::load(&path), Err(HostConfigError::NoUploaders(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(HostPageConfig::load(&path), Err(HostConfigError::Parse { .. })));

        let missing = dir.path().join("missing.json");
        assert!(matches!(HostPageConfig::load(&missing), Err(HostConfigError::Io { .. })));
    }
}
