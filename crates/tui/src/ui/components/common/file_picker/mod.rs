//! File picker modal opened by an uploader's trigger button.

mod file_picker_component;
mod state;

pub use file_picker_component::FilePickerModal;
pub use state::FilePickerState;
