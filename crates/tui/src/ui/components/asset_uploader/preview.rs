//! Ephemeral preview handles for accepted files.
//!
//! A [`PreviewRegistry`] plays the role of a browser's object-URL table: it
//! issues a `blob:` style handle per accepted file and keeps the file record
//! alive until the handle is revoked. Each uploader owns its own registry.

use std::collections::HashMap;

use asset_uploader_types::SelectedFile;
use tracing::debug;
use uuid::Uuid;

const HANDLE_PREFIX: &str = "blob:asset-uploader/";

/// A locally resolvable reference to an accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashMap<PreviewHandle, SelectedFile>,
}

impl PreviewRegistry {
    /// Issues a new handle for `file`.
    pub fn create(&mut self, file: &SelectedFile) -> PreviewHandle {
        let handle = PreviewHandle(format!("{HANDLE_PREFIX}{}", Uuid::new_v4()));
        self.live.insert(handle.clone(), file.clone());
        handle
    }

    /// Looks up the file behind a live handle.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<&SelectedFile> {
        self.live.get(handle)
    }

    /// Releases `handle`; returns `false` when it was not live.
    pub fn revoke(&mut self, handle: &PreviewHandle) -> bool {
        let released = self.live.remove(handle).is_some();
        if released {
            debug!(handle = %handle, "revoked preview handle");
        }
        released
    }

    /// Number of handles issued and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
