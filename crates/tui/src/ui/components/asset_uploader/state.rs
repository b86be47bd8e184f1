//! State container for one uploader instance.
//!
//! The state owns the instance configuration, the ordered preview list, and
//! the registry that issues preview handles. All mutations go through
//! [`AssetUploaderState::handle_selection`] (replace-all) and
//! [`AssetUploaderState::remove_preview`] (remove-at-index).

use asset_uploader_types::{FileSelection, SelectedFile, UploadError, UploadFailure, UploaderId};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use super::config::{AssetUploaderConfig, PendingUpload, UploadAck};
use super::preview::{PreviewHandle, PreviewRegistry};
use super::validation::{ValidationOutcome, validate_builtin, validate_external};

/// What one selection pass did, returned to the caller driving the widget.
#[derive(Debug, Default)]
pub struct SelectionReport {
    /// Number of files forwarded to the upload callback.
    pub accepted: usize,
    /// Errors reported for this pass, including a synchronous upload failure.
    pub errors: Vec<UploadError>,
    /// Set when the upload callback acknowledged asynchronously.
    pub deferred: Option<PendingUpload>,
}

impl SelectionReport {
    /// `true` when the pass neither accepted nor rejected anything.
    pub fn is_noop(&self) -> bool {
        self.accepted == 0 && self.errors.is_empty()
    }
}

#[derive(Debug)]
pub struct AssetUploaderState {
    id: UploaderId,
    heading: Option<String>,
    config: AssetUploaderConfig,
    previews: Vec<PreviewHandle>,
    registry: PreviewRegistry,
    selected_preview: Option<usize>,

    container_focus: FocusFlag,
    pub f_button: FocusFlag,
    pub f_previews: FocusFlag,
}

impl AssetUploaderState {
    pub fn new(id: UploaderId, config: AssetUploaderConfig) -> Self {
        Self {
            id,
            heading: None,
            config,
            previews: Vec::new(),
            registry: PreviewRegistry::default(),
            selected_preview: None,
            container_focus: FocusFlag::new().with_name(&format!("{id}.container")),
            f_button: FocusFlag::new().with_name(&format!("{id}.button")),
            f_previews: FocusFlag::new().with_name(&format!("{id}.previews")),
        }
    }

    /// Sets the section title rendered above the uploader.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn id(&self) -> UploaderId {
        self.id
    }

    /// Section title; falls back to the trigger label.
    pub fn heading(&self) -> &str {
        self.heading.as_deref().unwrap_or_else(|| self.config.button_title())
    }

    pub fn config(&self) -> &AssetUploaderConfig {
        &self.config
    }

    /// Runs the configured validation strategy without touching any state.
    pub fn validate(&self, files: &[SelectedFile]) -> ValidationOutcome {
        match self.config.validate_files.as_ref() {
            Some(validator) => validate_external(files, validator),
            None => validate_builtin(files, self.config.accept(), self.config.max_size_bytes()),
        }
    }

    /// Handles a confirmed selection from the file picker.
    ///
    /// An empty selection is a no-op. Otherwise the batch is validated, errors
    /// are reported once through the error callback, and accepted files replace
    /// the preview list before being handed to the upload callback. Handles of
    /// the replaced previews are revoked.
    pub fn handle_selection(&mut self, files: FileSelection) -> SelectionReport {
        if files.is_empty() {
            debug!(uploader = %self.id, "empty selection ignored");
            return SelectionReport::default();
        }

        let ValidationOutcome { accepted, mut errors } = self.validate(&files);
        if !errors.is_empty() {
            self.report_errors(errors.clone());
        }

        let mut report = SelectionReport {
            accepted: accepted.len(),
            ..Default::default()
        };
        if accepted.is_empty() {
            report.errors = errors;
            return report;
        }

        self.replace_previews(&accepted);

        match (self.config.on_upload)(&accepted) {
            Ok(UploadAck::Completed) => {
                info!(uploader = %self.id, files = accepted.len(), "upload callback completed");
            }
            Ok(UploadAck::Deferred(pending)) => {
                debug!(uploader = %self.id, "upload callback deferred");
                report.deferred = Some(pending);
            }
            Err(error) => {
                let callback_error = UploadError::UploadCallback {
                    message: error.to_string(),
                };
                self.report_errors(vec![callback_error.clone()]);
                errors.push(callback_error);
            }
        }

        report.errors = errors;
        report
    }

    /// Applies the result of a deferred upload acknowledgement.
    ///
    /// Returns the error that was reported, if any.
    pub fn settle_upload(&mut self, result: Result<(), String>) -> Option<UploadError> {
        match result {
            Ok(()) => {
                info!(uploader = %self.id, "deferred upload completed");
                None
            }
            Err(message) => {
                let error = UploadError::UploadCallback { message };
                self.report_errors(vec![error.clone()]);
                Some(error)
            }
        }
    }

    /// Removes the preview at `index`, keeping the order of the others.
    ///
    /// The host is not notified. Out-of-range indices are ignored.
    pub fn remove_preview(&mut self, index: usize) -> Option<PreviewHandle> {
        if index >= self.previews.len() {
            return None;
        }
        let handle = self.previews.remove(index);
        self.registry.revoke(&handle);
        // the cursor stays on the same tile when an earlier one is removed
        self.selected_preview = match self.selected_preview {
            _ if self.previews.is_empty() => None,
            Some(selected) if index < selected => Some(selected - 1),
            Some(selected) if selected >= self.previews.len() => Some(self.previews.len() - 1),
            other => other,
        };
        Some(handle)
    }

    pub fn previews(&self) -> &[PreviewHandle] {
        &self.previews
    }

    /// Resolves the file rendered by the preview at `index`.
    pub fn preview_file(&self, index: usize) -> Option<&SelectedFile> {
        self.previews.get(index).and_then(|handle| self.registry.resolve(handle))
    }

    /// Number of preview handles currently held by this instance.
    pub fn live_handle_count(&self) -> usize {
        self.registry.live_count()
    }

    pub fn selected_preview(&self) -> Option<usize> {
        self.selected_preview
    }

    pub fn select_preview(&mut self, index: Option<usize>) {
        self.selected_preview = index.filter(|i| *i < self.previews.len());
    }

    pub fn select_next_preview(&mut self) {
        if self.previews.is_empty() {
            return;
        }
        let next = self.selected_preview.map_or(0, |i| (i + 1) % self.previews.len());
        self.selected_preview = Some(next);
    }

    pub fn select_previous_preview(&mut self) {
        let len = self.previews.len();
        if len == 0 {
            return;
        }
        let previous = self.selected_preview.map_or(len - 1, |i| (i + len - 1) % len);
        self.selected_preview = Some(previous);
    }

    fn replace_previews(&mut self, accepted: &[SelectedFile]) {
        for handle in self.previews.drain(..) {
            self.registry.revoke(&handle);
        }
        self.previews = accepted.iter().map(|file| self.registry.create(file)).collect();
        self.selected_preview = None;
    }

    fn report_errors(&mut self, errors: Vec<UploadError>) {
        let failure = UploadFailure::new(errors);
        match self.config.on_error.as_mut() {
            Some(on_error) => on_error(failure),
            None => debug!(uploader = %self.id, error = %failure, "dropping upload errors; no error callback"),
        }
    }
}

impl HasFocus for AssetUploaderState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_button);
        if !self.previews.is_empty() {
            builder.leaf_widget(&self.f_previews);
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
