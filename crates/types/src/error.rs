//! Failures reported by an uploader to its host.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single reason a selection (or the upload step) did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadError {
    /// The declared type matched none of the accepted patterns.
    #[error("Invalid format: {file_name}")]
    Format { file_name: String },
    /// The file passed the type check but exceeds the size limit.
    #[error("Size bigger than allowed: {file_name}")]
    Size { file_name: String },
    /// A message produced by the host's batch validator.
    #[error("{message}")]
    ExternalValidation { message: String },
    /// The host upload callback failed, synchronously or after deferring.
    #[error("{message}")]
    UploadCallback { message: String },
}

impl UploadError {
    /// File name the error refers to, when it is tied to a single file.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Format { file_name } | Self::Size { file_name } => Some(file_name),
            Self::ExternalValidation { .. } | Self::UploadCallback { .. } => None,
        }
    }
}

/// Every error produced by one handler pass, delivered to the host at once.
///
/// `Display` renders the messages joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFailure {
    errors: Vec<UploadError>,
}

impl UploadFailure {
    pub fn new(errors: Vec<UploadError>) -> Self {
        Self { errors }
    }

    pub fn single(error: UploadError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn errors(&self) -> &[UploadError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<UploadError> {
        self.errors
    }

    /// The joined rendering, identical to `to_string()`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for UploadFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_joins_messages_in_order() {
        let failure = UploadFailure::new(vec![
            UploadError::Format {
                file_name: "a.gif".into(),
            },
            UploadError::Size {
                file_name: "b.png".into(),
            },
        ]);
        assert_eq!(failure.message(), "Invalid format: a.gif, Size bigger than allowed: b.png");
    }

    #[test]
    fn external_and_callback_messages_are_passed_through() {
        let failure = UploadFailure::single(UploadError::ExternalValidation {
            message: "bad batch".into(),
        });
        assert_eq!(failure.to_string(), "bad batch");
        assert_eq!(failure.errors()[0].file_name(), None);
    }

    #[test]
    fn errors_serialize_with_kind_tag() {
        let json = serde_json::to_value(UploadError::Size {
            file_name: "clip.mp4".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "size");
        assert_eq!(json["file_name"], "clip.mp4");
    }
}
