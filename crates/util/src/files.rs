//! Filesystem helpers backing the file picker: directory listings and turning
//! confirmed paths into a typed [`FileSelection`].

use std::io;
use std::path::{Path, PathBuf};

use asset_uploader_types::{DirectoryEntry, FileSelection, SelectedFile};
use thiserror::Error;
use tracing::warn;

use crate::mime_types::guess_mime_type;

/// System file names that never show up in listings.
const SYSTEM_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

#[derive(Debug, Error)]
pub enum FilesError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

fn is_hidden_or_system(name: &str) -> bool {
    name.starts_with('.') || SYSTEM_FILES.contains(&name)
}

/// Lists `dir` for the picker.
///
/// The parent directory (when there is one) is always the first entry,
/// followed by sub-directories and then files, each group sorted by name.
/// Hidden and system files are filtered out.
pub fn list_directory(dir: &Path) -> Result<Vec<DirectoryEntry>, FilesError> {
    if !dir.exists() {
        return Err(FilesError::NotFound(dir.to_path_buf()));
    }
    let mut directories = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_hidden_or_system(name) {
            continue;
        }
        if path.is_dir() {
            directories.push(path);
        } else if path.is_file() {
            files.push(path);
        }
    }
    directories.sort();
    files.sort();

    let mut entries = Vec::with_capacity(directories.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        entries.push(DirectoryEntry {
            path: parent.to_path_buf(),
            is_directory: true,
        });
    }
    entries.extend(directories.into_iter().map(|path| DirectoryEntry { path, is_directory: true }));
    entries.extend(files.into_iter().map(|path| DirectoryEntry {
        path,
        is_directory: false,
    }));
    Ok(entries)
}

/// Reads name, size and declared type for a single file.
pub fn inspect_file(path: &Path) -> Result<SelectedFile, FilesError> {
    if !path.exists() {
        return Err(FilesError::NotFound(path.to_path_buf()));
    }
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, guess_mime_type(path), metadata.len(), path))
}

/// Files that could be inspected, plus the paths that were left out.
#[derive(Debug, Default)]
pub struct Inspection {
    pub files: FileSelection,
    pub skipped: Vec<PathBuf>,
}

/// Inspects every path in order, skipping directories and unreadable entries.
///
/// A file that vanished between picking and inspection is logged and left out
/// of the selection rather than failing the whole batch.
pub fn inspect_files(paths: &[PathBuf]) -> Inspection {
    let mut inspection = Inspection::default();
    for path in paths.iter().filter(|path| !path.is_dir()) {
        match inspect_file(path) {
            Ok(file) => inspection.files.push(file),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "skipping unreadable file");
                inspection.skipped.push(path.clone());
            }
        }
    }
    inspection
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn listing_puts_parent_then_directories_then_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), "bb").unwrap();
        fs::write(dir.path().join("a.mp4"), "a").unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();

        let entries = list_directory(dir.path()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].path, dir.path().parent().unwrap());
        assert!(entries[1].is_directory);
        assert!(entries[1].path.ends_with("zeta"));
        assert!(entries[2].path.ends_with("a.mp4"));
        assert!(entries[3].path.ends_with("b.png"));
    }

    #[test]
    fn listing_filters_hidden_and_system_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("visible.jpg"), "yes").unwrap();
        fs::write(dir.path().join(".hidden"), "no").unwrap();
        fs::write(dir.path().join("Thumbs.db"), "no").unwrap();

        let entries = list_directory(dir.path()).unwrap();
        let files: Vec<_> = entries.iter().filter(|e| !e.is_directory).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("visible.jpg"));
    }

    #[test]
    fn listing_missing_directory_fails() {
        let result = list_directory(Path::new("/nonexistent/asset/dir"));
        assert!(matches!(result, Err(FilesError::NotFound(_))));
    }

    #[test]
    fn inspect_reports_name_size_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, "12345").unwrap();

        let file = inspect_file(&path).unwrap();
        assert_eq!(file.name, "photo.png");
        assert_eq!(file.size, 5);
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.path, path);
    }

    #[test]
    fn inspect_files_skips_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.mp4");
        fs::write(&keep, "x").unwrap();

        let gone = dir.path().join("gone.png");
        let inspection = inspect_files(&[dir.path().to_path_buf(), gone.clone(), keep.clone()]);
        assert_eq!(inspection.files.len(), 1);
        assert_eq!(inspection.files[0].path, keep);
        assert_eq!(inspection.skipped, vec![gone]);
    }
}
