//! UI components: uploader sections, the host page, activity, and the file picker.

pub mod activity;
pub mod asset_uploader;
pub mod common;
pub mod component;
pub mod host_page;

pub use activity::ActivityComponent;
pub use asset_uploader::AssetUploaderComponent;
pub use common::FilePickerModal;
pub use component::*;
pub use host_page::HostPageComponent;
