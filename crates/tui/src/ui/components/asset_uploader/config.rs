//! Per-instance uploader configuration and host callbacks.

use std::fmt;

use asset_uploader_types::{AcceptPatterns, DEFAULT_ACCEPTED_TYPES, SelectedFile, UploadFailure};
use tokio::sync::oneshot;

/// Default maximum size accepted by the built-in strategy (10 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Called with the accepted files of a selection.
pub type UploadHandler = Box<dyn FnMut(&[SelectedFile]) -> anyhow::Result<UploadAck>>;
/// Called once per handler pass with every error it produced.
pub type ErrorHandler = Box<dyn FnMut(UploadFailure)>;
/// Host-supplied batch validator; any message rejects the whole batch.
pub type FileValidator = Box<dyn Fn(&[SelectedFile]) -> Vec<String>>;

/// What the host upload callback reports back.
#[derive(Debug)]
pub enum UploadAck {
    /// The host finished handling the files before returning.
    Completed,
    /// The host continues in the background and resolves the handle later.
    Deferred(PendingUpload),
}

/// Receiving half of a deferred upload acknowledgement.
#[derive(Debug)]
pub struct PendingUpload {
    receiver: oneshot::Receiver<Result<(), String>>,
}

impl PendingUpload {
    /// Creates a pending acknowledgement and the sender the host resolves it with.
    pub fn channel() -> (oneshot::Sender<Result<(), String>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver })
    }

    /// Waits for the host to resolve the upload.
    ///
    /// A sender dropped without resolving counts as a failure.
    pub async fn wait(self) -> Result<(), String> {
        self.receiver
            .await
            .unwrap_or_else(|_| Err("upload acknowledgement dropped before completion".to_string()))
    }
}

/// Immutable settings of one uploader instance.
pub struct AssetUploaderConfig {
    pub(crate) on_upload: UploadHandler,
    pub(crate) on_error: Option<ErrorHandler>,
    pub(crate) validate_files: Option<FileValidator>,
    multiple: bool,
    accepted_types: AcceptPatterns,
    max_size: u64,
    button_title: String,
    button_class: Option<String>,
    is_video: bool,
}

impl AssetUploaderConfig {
    /// Builds a config with the two required fields and defaults for the rest.
    pub fn new<F>(button_title: impl Into<String>, on_upload: F) -> Self
    where
        F: FnMut(&[SelectedFile]) -> anyhow::Result<UploadAck> + 'static,
    {
        Self {
            on_upload: Box::new(on_upload),
            on_error: None,
            validate_files: None,
            multiple: false,
            accepted_types: AcceptPatterns::parse(DEFAULT_ACCEPTED_TYPES),
            max_size: DEFAULT_MAX_SIZE,
            button_title: button_title.into(),
            button_class: None,
            is_video: false,
        }
    }

    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: FnMut(UploadFailure) + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn validate_files<F>(mut self, validator: F) -> Self
    where
        F: Fn(&[SelectedFile]) -> Vec<String> + 'static,
    {
        self.validate_files = Some(Box::new(validator));
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn accepted_types(mut self, accepted_types: &str) -> Self {
        self.accepted_types = AcceptPatterns::parse(accepted_types);
        self
    }

    pub fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn button_class(mut self, button_class: impl Into<String>) -> Self {
        self.button_class = Some(button_class.into());
        self
    }

    pub fn is_video(mut self, is_video: bool) -> Self {
        self.is_video = is_video;
        self
    }

    pub fn allows_multiple(&self) -> bool {
        self.multiple
    }

    pub fn accept(&self) -> &AcceptPatterns {
        &self.accepted_types
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size
    }

    pub fn button_title(&self) -> &str {
        &self.button_title
    }

    pub fn button_class_name(&self) -> Option<&str> {
        self.button_class.as_deref()
    }

    pub fn renders_video(&self) -> bool {
        self.is_video
    }

    pub fn has_error_handler(&self) -> bool {
        self.on_error.is_some()
    }

    pub fn has_external_validator(&self) -> bool {
        self.validate_files.is_some()
    }
}

impl fmt::Debug for AssetUploaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetUploaderConfig")
            .field("button_title", &self.button_title)
            .field("button_class", &self.button_class)
            .field("multiple", &self.multiple)
            .field("accepted_types", &self.accepted_types.as_str())
            .field("max_size", &self.max_size)
            .field("is_video", &self.is_video)
            .field("on_error", &self.on_error.is_some())
            .field("validate_files", &self.validate_files.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AssetUploaderConfig::new("Upload", |_| Ok(UploadAck::Completed));
        assert!(!config.allows_multiple());
        assert_eq!(config.accept().as_str(), "image/*,video/*");
        assert_eq!(config.max_size_bytes(), 10_485_760);
        assert!(!config.renders_video());
        assert!(config.button_class_name().is_none());
        assert!(!config.has_error_handler());
        assert!(!config.has_external_validator());
    }

    #[test]
    fn builder_overrides_optional_fields() {
        let config = AssetUploaderConfig::new("Upload Video", |_| Ok(UploadAck::Completed))
            .multiple(true)
            .accepted_types("video/mp4")
            .max_size(42)
            .button_class("upload-button")
            .is_video(true)
            .on_error(|_| {})
            .validate_files(|_| Vec::new());
        assert!(config.allows_multiple());
        assert!(config.accept().matches("video/mp4"));
        assert_eq!(config.max_size_bytes(), 42);
        assert_eq!(config.button_class_name(), Some("upload-button"));
        assert!(config.renders_video());
        assert!(config.has_error_handler());
        assert!(config.has_external_validator());
    }

    #[tokio::test]
    async fn pending_upload_resolves_with_sent_result() {
        let (sender, pending) = PendingUpload::channel();
        sender.send(Err("quota exceeded".into())).unwrap();
        assert_eq!(pending.wait().await, Err("quota exceeded".to_string()));
    }

    #[tokio::test]
    async fn dropped_sender_counts_as_failure() {
        let (sender, pending) = PendingUpload::channel();
        drop(sender);
        assert!(pending.wait().await.is_err());
    }
}
