//! Batch validation for picked files.
//!
//! Two strategies exist and exactly one runs per batch:
//!
//! - **External**: a host-supplied validator sees the whole batch. Any message
//!   rejects every file in it; no messages accepts every file unchanged.
//! - **Built-in**: each file is checked on its own against the accepted type
//!   patterns and then the size limit. Rejections produce one error per file,
//!   everything else is accepted in its original order.

use asset_uploader_types::{AcceptPatterns, FileSelection, SelectedFile, UploadError};

/// Partition of a batch into accepted files and rejection reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: FileSelection,
    pub errors: Vec<UploadError>,
}

impl ValidationOutcome {
    /// Compatibility rendering of each error, e.g. `"Invalid format: clip.avi"`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Runs the built-in per-file checks.
pub fn validate_builtin(files: &[SelectedFile], accept: &AcceptPatterns, max_size: u64) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for file in files {
        if !accept.matches(&file.mime_type) {
            outcome.errors.push(UploadError::Format {
                file_name: file.name.clone(),
            });
        } else if file.size > max_size {
            outcome.errors.push(UploadError::Size {
                file_name: file.name.clone(),
            });
        } else {
            outcome.accepted.push(file.clone());
        }
    }
    outcome
}

/// Runs a host validator over the whole batch, all-or-nothing.
pub fn validate_external<F>(files: &[SelectedFile], validator: F) -> ValidationOutcome
where
    F: Fn(&[SelectedFile]) -> Vec<String>,
{
    let messages = validator(files);
    if messages.is_empty() {
        return ValidationOutcome {
            accepted: files.to_vec(),
            errors: Vec::new(),
        };
    }
    ValidationOutcome {
        accepted: Vec::new(),
        errors: messages
            .into_iter()
            .map(|message| UploadError::ExternalValidation { message })
            .collect(),
    }
}
