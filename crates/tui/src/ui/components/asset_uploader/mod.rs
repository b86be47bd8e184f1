//! The uploader widget: configuration, validation, preview handles, and the
//! component that renders one uploader section.

mod asset_uploader_component;
mod config;
mod preview;
mod state;
mod validation;

pub use asset_uploader_component::{AssetUploaderComponent, PRIMARY_BUTTON_CLASS};
pub use config::{AssetUploaderConfig, DEFAULT_MAX_SIZE, ErrorHandler, FileValidator, PendingUpload, UploadAck, UploadHandler};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use state::{AssetUploaderState, SelectionReport};
pub use validation::{ValidationOutcome, validate_builtin, validate_external};
