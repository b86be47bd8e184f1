//! # Asset Uploader TUI
//!
//! A file-uploader widget for the terminal and the host page that embeds it.
//!
//! Each uploader instance renders a trigger button and a strip of preview
//! tiles. Files chosen in the picker modal are validated (MIME pattern and
//! size, or a host-supplied validator), previewed, and handed to the host's
//! upload callback; every failure from one pass is reported once through the
//! host's error callback.
//!
//! ## Architecture
//!
//! - [`AssetUploaderConfig`] and [`AssetUploaderState`] hold one instance's
//!   configuration and previews; they have no terminal dependency and can be
//!   driven directly.
//! - The runtime routes crossterm input to components, which return effects;
//!   file system work and deferred upload acknowledgements run on tokio and
//!   come back as messages.
//! - The demo host page ([`HostPageConfig`]) wires several instances to
//!   logging callbacks and an activity panel.

mod app;
mod cmd;
mod host;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

pub use host::{BatchRules, HostBehavior, HostConfigError, HostEvent, HostPageConfig, UploaderSettings, build_uploaders};
pub use ui::components::asset_uploader::{
    AssetUploaderConfig, AssetUploaderState, DEFAULT_MAX_SIZE, PendingUpload, PreviewHandle, PreviewRegistry, SelectionReport,
    UploadAck, ValidationOutcome, validate_builtin, validate_external,
};
pub use ui::theme::{LoadedTheme, THEME_ENV, ThemeDefinition, catalog, load as load_theme};

/// Everything the runtime needs to show a host page.
pub struct RunOptions {
    pub page: HostPageConfig,
    pub behavior: HostBehavior,
    pub theme: LoadedTheme,
    /// Directory the file picker opens in; home when unset.
    pub start_dir: Option<PathBuf>,
}

/// Runs the host page until the user quits with Ctrl+C.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode or drawn to.
pub async fn run(options: RunOptions) -> Result<()> {
    let RunOptions {
        page,
        behavior,
        theme,
        start_dir,
    } = options;

    let (host_sender, host_receiver) = unbounded_channel();
    let uploaders = build_uploaders(&page, behavior, host_sender);
    info!(theme = theme.definition.id, sections = uploaders.len(), "building host page");

    let ctx = app::SharedCtx {
        theme: theme.theme,
        theme_id: theme.definition.id,
        start_dir,
    };
    let app = app::App::new(ctx, page.title.clone(), uploaders);
    ui::runtime::run_app(app, host_receiver).await
}
