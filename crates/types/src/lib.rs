//! Shared types for the asset uploader: file selections, upload failures, and
//! the message/effect vocabulary exchanged between the UI runtime and its
//! components.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod file;

pub use error::{UploadError, UploadFailure};
pub use file::{AcceptPatterns, DEFAULT_ACCEPTED_TYPES, FileSelection, SelectedFile};

/// Identifies one uploader instance on a host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct UploaderId(pub usize);

impl fmt::Display for UploaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uploader-{}", self.0)
    }
}

/// One row of a directory listing shown by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Parameters the file picker is opened with on behalf of an uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    pub uploader_id: UploaderId,
    pub accept: AcceptPatterns,
    pub multiple: bool,
}

/// Modal views that can be opened over the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    FilePicker(PickerRequest),
}

/// Results produced by background work started from an [`Effect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Directory listing finished.
    DirectoryContents { entries: Vec<DirectoryEntry>, root_path: PathBuf },
    /// The files confirmed in the picker have been stat'ed and typed.
    /// `skipped` lists picked paths that could not be read.
    FilesInspected {
        uploader_id: UploaderId,
        files: FileSelection,
        skipped: Vec<PathBuf>,
    },
    /// A deferred upload acknowledgement resolved.
    UploadSettled {
        uploader_id: UploaderId,
        result: Result<(), String>,
    },
    /// Free-form diagnostic line.
    Log(String),
}

/// Messages delivered to components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowModal(Modal),
    CloseModal,
    /// List a directory for the file picker
    ListDirectoryContents(PathBuf),
    /// Stat the chosen paths and hand the resulting selection to an uploader
    InspectFiles { uploader_id: UploaderId, paths: Vec<PathBuf> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploader_id_display_is_stable() {
        assert_eq!(UploaderId(2).to_string(), "uploader-2");
    }

    #[test]
    fn picker_request_carries_parsed_patterns() {
        let request = PickerRequest {
            uploader_id: UploaderId(0),
            accept: AcceptPatterns::parse("video/mp4"),
            multiple: false,
        };
        assert!(request.accept.matches("video/mp4"));
    }
}
