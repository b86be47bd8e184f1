use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use asset_uploader_tui::{HostBehavior, HostPageConfig, RunOptions, catalog, load_theme};
use asset_uploader_util::{UserPreferences, expand_tilde};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "asset-uploader.log";

/// Pick files, preview them, and hand them to a demo host page.
#[derive(Parser, Debug)]
#[command(name = "asset-uploader", version, about)]
struct Args {
    /// Host page layout (JSON); the three-section demo page when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the file picker opens in
    #[arg(long)]
    start_dir: Option<String>,

    /// Theme id (dracula, nord); remembered for later runs
    #[arg(long)]
    theme: Option<String>,

    /// Acknowledge uploads asynchronously after this many milliseconds
    #[arg(long)]
    upload_delay_ms: Option<u64>,

    /// Make the demo upload callback fail
    #[arg(long)]
    fail_uploads: bool,

    /// Where tracing output goes; the terminal belongs to the UI
    #[arg(long, env = "ASSET_UPLOADER_LOG_PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let theme = load_theme(resolve_preferred_theme(args.theme.as_deref()).as_deref());
    info!(theme = theme.definition.id, "theme selected");

    let page = match args.config.as_deref() {
        Some(path) => HostPageConfig::load(path).with_context(|| format!("load host page config {}", path.display()))?,
        None => HostPageConfig::default(),
    };

    let start_dir = args.start_dir.as_deref().map(expand_tilde);
    if let Some(dir) = start_dir.as_ref()
        && !dir.is_dir()
    {
        anyhow::bail!("start directory {} is not a directory", dir.display());
    }

    let behavior = HostBehavior {
        upload_delay: args.upload_delay_ms.map(Duration::from_millis),
        fail_uploads: args.fail_uploads,
    };

    asset_uploader_tui::run(RunOptions {
        page,
        behavior,
        theme,
        start_dir,
    })
    .await
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn default_log_path() -> PathBuf {
    dirs_next::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("asset-uploader")
        .join(LOG_FILE_NAME)
}

/// Stores `requested` as the preferred theme and returns the name to load.
fn resolve_preferred_theme(requested: Option<&str>) -> Option<String> {
    let mut preferences = UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; using in-memory store");
        UserPreferences::ephemeral()
    });

    if let Some(name) = requested {
        let Some(definition) = catalog::resolve(name) else {
            warn!(theme = name, "unknown theme; keeping the saved preference");
            return preferences.preferred_theme().map(str::to_string);
        };
        if let Err(error) = preferences.set_preferred_theme(Some(definition.id.to_string())) {
            warn!(%error, "failed to persist theme preference");
        }
        return Some(definition.id.to_string());
    }
    preferences.preferred_theme().map(str::to_string)
}
