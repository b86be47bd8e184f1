//! The demo host page: its layout config and the callbacks it hands to uploaders.

pub mod config;
pub mod demo;

pub use config::{BatchRules, HostConfigError, HostPageConfig, UploaderSettings};
pub use demo::{HostBehavior, HostEvent, build_uploaders};
