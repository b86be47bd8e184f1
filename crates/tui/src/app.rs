//! Application state for the uploader host page.
//!
//! `App` owns every uploader instance, the open file picker (if any), the
//! activity log, and the focus graph. Components read and mutate it; side
//! effects leave it as [`Effect`]s and come back as [`Msg`]s.

use std::mem;
use std::path::PathBuf;

use asset_uploader_types::{Effect, ExecOutcome, Modal, Msg, UploaderId};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::host::HostEvent;
use crate::ui::components::activity::{ActivityLevel, ActivityLog};
use crate::ui::components::asset_uploader::{AssetUploaderState, PendingUpload};
use crate::ui::components::common::FilePickerState;
use crate::ui::theme::Theme;

/// Cross-cutting context shared by all components.
#[derive(Debug)]
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub theme_id: &'static str,
    /// Directory the file picker opens in; home when unset.
    pub start_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    pub title: String,
    pub focus: Focus,
    pub uploaders: Vec<AssetUploaderState>,
    pub file_picker: Option<FilePickerState>,
    pub open_modal: Option<Modal>,
    pub activity: ActivityLog,
    pending_uploads: Vec<(UploaderId, PendingUpload)>,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(ctx: SharedCtx, title: impl Into<String>, uploaders: Vec<AssetUploaderState>) -> Self {
        let mut app = Self {
            ctx,
            title: title.into(),
            focus: Focus::default(),
            uploaders,
            file_picker: None,
            open_modal: None,
            activity: ActivityLog::default(),
            pending_uploads: Vec::new(),
            container_focus: FocusFlag::new().with_name("app"),
        };
        app.focus = FocusBuilder::build_for(&app);
        if let Some(first) = app.uploaders.first() {
            app.focus.focus(&first.f_button);
        }
        app
    }

    pub fn uploader_mut(&mut self, uploader_id: UploaderId) -> Option<&mut AssetUploaderState> {
        self.uploaders.iter_mut().find(|uploader| uploader.id() == uploader_id)
    }

    /// Applies background results to the uploaders they belong to.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        let Msg::ExecCompleted(outcome) = msg else {
            return Vec::new();
        };
        match outcome.as_ref() {
            ExecOutcome::FilesInspected {
                uploader_id,
                files,
                skipped,
            } => {
                let uploader_id = *uploader_id;
                for path in skipped {
                    self.activity
                        .push(ActivityLevel::Error, Some(uploader_id), format!("Could not read {}", path.display()));
                }
                let Some(uploader) = self.uploader_mut(uploader_id) else {
                    warn!(uploader = %uploader_id, "selection for unknown uploader");
                    return Vec::new();
                };
                let report = uploader.handle_selection(files.clone());
                debug!(uploader = %uploader_id, accepted = report.accepted, errors = report.errors.len(), "selection handled");
                if let Some(pending) = report.deferred {
                    self.pending_uploads.push((uploader_id, pending));
                }
                if files.is_empty() && skipped.is_empty() {
                    self.activity
                        .push(ActivityLevel::Info, Some(uploader_id), "No readable files in the selection");
                }
            }
            ExecOutcome::UploadSettled { uploader_id, result } => {
                if let Some(uploader) = self.uploader_mut(*uploader_id) {
                    uploader.settle_upload(result.clone());
                }
            }
            ExecOutcome::Log(line) => {
                if let Some(picker) = self.file_picker.as_mut() {
                    picker.set_status_message(Some(line.clone()));
                }
                self.activity.push(ActivityLevel::Error, None, line.clone());
            }
            ExecOutcome::DirectoryContents { .. } => {}
        }
        Vec::new()
    }

    /// Records what a host callback reported in the activity panel.
    pub fn apply_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::UploadRequested { uploader_id, files } => {
                self.activity
                    .push(ActivityLevel::Info, Some(uploader_id), format!("Files to upload: {}", files.join(", ")));
            }
            HostEvent::UploadFinished { uploader_id, ok: true } => {
                self.activity.push(ActivityLevel::Success, Some(uploader_id), "Upload finished");
            }
            HostEvent::UploadFinished { uploader_id, ok: false } => {
                self.activity.push(ActivityLevel::Error, Some(uploader_id), "Upload failed on the host");
            }
            HostEvent::ErrorReported { uploader_id, message } => {
                self.activity
                    .push(ActivityLevel::Error, Some(uploader_id), format!("Upload error: {message}"));
            }
        }
    }

    /// Deferred upload acknowledgements produced since the last call.
    pub fn take_pending_uploads(&mut self) -> Vec<(UploaderId, PendingUpload)> {
        mem::take(&mut self.pending_uploads)
    }

    /// Index of the uploader owning the focused widget.
    pub fn focused_uploader_index(&self) -> Option<usize> {
        self.uploaders
            .iter()
            .position(|uploader| uploader.f_button.get() || uploader.f_previews.get())
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        if self.open_modal.is_some()
            && let Some(picker) = self.file_picker.as_ref()
        {
            builder.widget(picker);
        } else {
            for uploader in &self.uploaders {
                builder.widget(uploader);
            }
            builder.widget(&self.activity);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use asset_uploader_types::SelectedFile;

    use super::*;
    use crate::ui::components::asset_uploader::{AssetUploaderConfig, UploadAck};
    use crate::ui::theme::DraculaTheme;

    fn test_app() -> App {
        let ctx = SharedCtx {
            theme: Box::new(DraculaTheme::new()),
            theme_id: "dracula",
            start_dir: None,
        };
        let deferred = AssetUploaderConfig::new("Upload", |_| {
            let (sender, pending) = PendingUpload::channel();
            let _ = sender.send(Ok(()));
            Ok(UploadAck::Deferred(pending))
        })
        .accepted_types("image/png");
        let immediate = AssetUploaderConfig::new("Upload", |_| Ok(UploadAck::Completed)).accepted_types("image/png");
        App::new(
            ctx,
            "Test page",
            vec![
                AssetUploaderState::new(UploaderId(0), immediate),
                AssetUploaderState::new(UploaderId(1), deferred),
            ],
        )
    }

    fn inspected(uploader_id: usize, files: Vec<SelectedFile>) -> Msg {
        Msg::ExecCompleted(Box::new(ExecOutcome::FilesInspected {
            uploader_id: UploaderId(uploader_id),
            files,
            skipped: Vec::new(),
        }))
    }

    #[test]
    fn inspected_files_reach_only_their_uploader() {
        let mut app = test_app();
        app.update(&inspected(0, vec![SelectedFile::new("a.png", "image/png", 1, "/a.png")]));
        assert_eq!(app.uploaders[0].previews().len(), 1);
        assert!(app.uploaders[1].previews().is_empty());
        assert!(app.take_pending_uploads().is_empty());
    }

    #[test]
    fn deferred_acknowledgements_are_queued_for_the_runtime() {
        let mut app = test_app();
        app.update(&inspected(1, vec![SelectedFile::new("a.png", "image/png", 1, "/a.png")]));
        let pending = app.take_pending_uploads();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, UploaderId(1));
        assert!(app.take_pending_uploads().is_empty());
    }

    #[test]
    fn host_events_and_failures_land_in_activity() {
        let mut app = test_app();
        app.apply_host_event(HostEvent::ErrorReported {
            uploader_id: UploaderId(0),
            message: "Invalid format: b.gif".into(),
        });
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Log("Could not open /nope".into()))));
        let messages: Vec<_> = app.activity.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Upload error: Invalid format: b.gif", "Could not open /nope"]);
    }

    #[test]
    fn unreadable_picks_are_listed_in_activity() {
        let mut app = test_app();
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::FilesInspected {
            uploader_id: UploaderId(0),
            files: vec![SelectedFile::new("a.png", "image/png", 1, "/a.png")],
            skipped: vec![PathBuf::from("/gone.png")],
        })));

        assert_eq!(app.uploaders[0].previews().len(), 1);
        let entries = app.activity.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Could not read /gone.png");
        assert_eq!(entries[0].level, ActivityLevel::Error);
    }

    #[test]
    fn first_trigger_button_starts_focused() {
        let app = test_app();
        assert!(app.uploaders[0].f_button.get());
        assert_eq!(app.focused_uploader_index(), Some(0));
    }
}
