//! Utility helpers shared by the asset uploader crates: filesystem listing and
//! inspection, MIME detection, byte formatting, and preference persistence.

pub mod files;
pub mod format;
pub mod mime_types;
pub mod path_processing;
pub mod preferences;

pub use files::{FilesError, Inspection, inspect_file, inspect_files, list_directory};
pub use format::format_bytes;
pub use mime_types::guess_mime_type;
pub use path_processing::expand_tilde;
pub use preferences::{PreferencesError, UserPreferences};
