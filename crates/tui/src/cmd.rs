//! # Command Execution Layer
//!
//! Translates [`Effect`]s into [`Cmd`]s and runs them. Everything that
//! touches the file system or waits on a host acknowledgement happens here,
//! off the component handlers, and comes back to the UI as an
//! [`ExecOutcome`].

use std::path::PathBuf;

use asset_uploader_types::{Effect, ExecOutcome, UploaderId};
use asset_uploader_util::{inspect_files, list_directory};
use tokio::task::{JoinHandle, spawn, spawn_blocking};
use tracing::{debug, warn};

use crate::app::App;
use crate::ui::components::asset_uploader::PendingUpload;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Read a directory for the file picker.
    ListDirectory(PathBuf),
    /// Stat confirmed paths and deliver them to an uploader.
    InspectFiles { uploader_id: UploaderId, paths: Vec<PathBuf> },
}

/// Convert effects into commands. Navigation effects are handled by the
/// runtime and produce no command.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::ListDirectoryContents(path) => Some(Cmd::ListDirectory(path)),
            Effect::InspectFiles { uploader_id, paths } => Some(Cmd::InspectFiles { uploader_id, paths }),
            Effect::ShowModal(_) | Effect::CloseModal => None,
        })
        .collect()
}

/// Starts the commands derived from `effects`; each resolves on the
/// runtime's task set.
pub fn run_from_effects(effects: Vec<Effect>) -> Vec<JoinHandle<ExecOutcome>> {
    from_effects(effects)
        .into_iter()
        .map(|command| {
            debug!(?command, "running command");
            run_cmd(command)
        })
        .collect()
}

/// Starts waiting on every deferred upload acknowledgement the app produced
/// since the last call.
pub fn spawn_pending_uploads(app: &mut App) -> Vec<JoinHandle<ExecOutcome>> {
    app.take_pending_uploads()
        .into_iter()
        .map(|(uploader_id, pending)| spawn_upload_wait(uploader_id, pending))
        .collect()
}

fn run_cmd(command: Cmd) -> JoinHandle<ExecOutcome> {
    match command {
        Cmd::ListDirectory(root_path) => spawn_blocking(move || match list_directory(&root_path) {
            Ok(entries) => ExecOutcome::DirectoryContents { entries, root_path },
            Err(error) => {
                warn!(path = %root_path.display(), %error, "directory listing failed");
                ExecOutcome::Log(format!("Could not open {}: {error}", root_path.display()))
            }
        }),
        Cmd::InspectFiles { uploader_id, paths } => spawn_blocking(move || {
            let inspection = inspect_files(&paths);
            ExecOutcome::FilesInspected {
                uploader_id,
                files: inspection.files,
                skipped: inspection.skipped,
            }
        }),
    }
}

/// Waits for a deferred upload on the runtime and reports its result.
pub fn spawn_upload_wait(uploader_id: UploaderId, pending: PendingUpload) -> JoinHandle<ExecOutcome> {
    spawn(async move {
        let result = pending.wait().await;
        ExecOutcome::UploadSettled { uploader_id, result }
    })
}

#[cfg(test)]
mod tests {
    use asset_uploader_types::{AcceptPatterns, Modal, PickerRequest};

    use super::*;

    #[test]
    fn navigation_effects_produce_no_commands() {
        let effects = vec![
            Effect::ShowModal(Modal::FilePicker(PickerRequest {
                uploader_id: UploaderId(0),
                accept: AcceptPatterns::parse("image/png"),
                multiple: false,
            })),
            Effect::CloseModal,
            Effect::ListDirectoryContents(PathBuf::from("/tmp")),
        ];
        assert_eq!(from_effects(effects), vec![Cmd::ListDirectory(PathBuf::from("/tmp"))]);
    }

    #[tokio::test]
    async fn inspect_command_reports_files_for_the_uploader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let outcome = run_cmd(Cmd::InspectFiles {
            uploader_id: UploaderId(2),
            paths: vec![path.clone()],
        })
        .await
        .unwrap();

        let ExecOutcome::FilesInspected { uploader_id, files, skipped } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(uploader_id, UploaderId(2));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].mime_type, "video/mp4");
        assert_eq!(files[0].size, 16);
        assert!(skipped.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_becomes_log_outcome() {
        let outcome = run_cmd(Cmd::ListDirectory(PathBuf::from("/definitely/not/here")))
            .await
            .unwrap();
        assert!(matches!(outcome, ExecOutcome::Log(_)));
    }

    #[tokio::test]
    async fn upload_wait_routes_result_to_uploader() {
        let (sender, pending) = PendingUpload::channel();
        let handle = spawn_upload_wait(UploaderId(1), pending);
        sender.send(Ok(())).unwrap();
        assert_eq!(
            handle.await.unwrap(),
            ExecOutcome::UploadSettled {
                uploader_id: UploaderId(1),
                result: Ok(())
            }
        );
    }
}
