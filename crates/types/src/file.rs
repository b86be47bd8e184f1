//! File selection models shared by the uploader widget and its host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default accept list used when an uploader does not configure one.
pub const DEFAULT_ACCEPTED_TYPES: &str = "image/*,video/*";

/// A single file reported by the file picker.
///
/// The declared MIME type is whatever the picker inferred for the file; an
/// empty string means the type is unknown, mirroring what a browser reports for
/// unrecognized extensions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    /// Display name (final path component).
    pub name: String,
    /// Declared MIME type, possibly empty.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Local path the file was read from.
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            path: path.into(),
        }
    }
}

/// The full set of files from one selection event, validated together.
pub type FileSelection = Vec<SelectedFile>;

/// Comma-separated MIME patterns matched by substring containment.
///
/// Patterns are trimmed when parsed and blank segments are dropped. Matching is
/// literal: `image/*` only matches a declared type that contains the text
/// `image/*`, it is not a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcceptPatterns {
    raw: String,
    patterns: Vec<String>,
}

impl AcceptPatterns {
    pub fn parse(raw: &str) -> Self {
        let patterns = raw
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_owned)
            .collect();
        Self {
            raw: raw.to_owned(),
            patterns,
        }
    }

    /// Returns `true` when `mime_type` contains at least one pattern.
    pub fn matches(&self, mime_type: &str) -> bool {
        self.patterns.iter().any(|pattern| mime_type.contains(pattern.as_str()))
    }

    /// Browser-style `accept` matching used to highlight candidates in the picker.
    ///
    /// Unlike [`AcceptPatterns::matches`], `type/*` acts as a wildcard here and
    /// `.ext` patterns match on the file extension. It never decides
    /// acceptance; validation still runs on the confirmed selection.
    pub fn suggests(&self, mime_type: &str, extension: Option<&str>) -> bool {
        self.patterns.iter().any(|pattern| {
            if let Some(ext) = pattern.strip_prefix('.') {
                return extension.is_some_and(|e| e.eq_ignore_ascii_case(ext));
            }
            if let Some(top_level) = pattern.strip_suffix("/*") {
                return !mime_type.is_empty() && mime_type.split('/').next() == Some(top_level);
            }
            !mime_type.is_empty() && mime_type.contains(pattern.as_str())
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The configured string as supplied by the host.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}
