//! Demo host callbacks wired into each uploader on the page.
//!
//! The callbacks log through `tracing` and forward a [`HostEvent`] to the
//! runtime so the activity panel can show what the host saw.

use std::time::Duration;

use anyhow::anyhow;
use asset_uploader_types::{SelectedFile, UploaderId};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use super::config::{HostPageConfig, UploaderSettings};
use crate::ui::components::asset_uploader::{AssetUploaderConfig, AssetUploaderState, PendingUpload, UploadAck};

/// Something a host callback observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The upload callback received these file names.
    UploadRequested { uploader_id: UploaderId, files: Vec<String> },
    /// A deferred upload finished on the host side.
    UploadFinished { uploader_id: UploaderId, ok: bool },
    /// The error callback received this message.
    ErrorReported { uploader_id: UploaderId, message: String },
}

/// How the demo upload callback behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostBehavior {
    /// Acknowledge asynchronously after this long instead of immediately.
    pub upload_delay: Option<Duration>,
    /// Report every upload as failed.
    pub fail_uploads: bool,
}

/// Builds one uploader state per configured section, wired to the demo callbacks.
pub fn build_uploaders(page: &HostPageConfig, behavior: HostBehavior, events: UnboundedSender<HostEvent>) -> Vec<AssetUploaderState> {
    page.uploaders
        .iter()
        .enumerate()
        .map(|(index, settings)| {
            let uploader_id = UploaderId(index);
            let config = uploader_config(page, settings, uploader_id, behavior, &events);
            let state = AssetUploaderState::new(uploader_id, config);
            match settings.heading.as_ref() {
                Some(heading) => state.with_heading(heading.clone()),
                None => state,
            }
        })
        .collect()
}

fn uploader_config(
    page: &HostPageConfig,
    settings: &UploaderSettings,
    uploader_id: UploaderId,
    behavior: HostBehavior,
    events: &UnboundedSender<HostEvent>,
) -> AssetUploaderConfig {
    let upload_events = events.clone();
    let error_events = events.clone();
    let mut config = AssetUploaderConfig::new(settings.button_title.clone(), move |files| {
        handle_upload(uploader_id, files, behavior, &upload_events)
    })
    .on_error(move |failure| {
        error!(uploader = %uploader_id, error = %failure, "upload error");
        let _ = error_events.send(HostEvent::ErrorReported {
            uploader_id,
            message: failure.message(),
        });
    })
    .multiple(settings.multiple)
    .accepted_types(&settings.accepted_types)
    .max_size(settings.max_size)
    .is_video(settings.is_video);

    if let Some(class) = settings.button_class.as_ref() {
        config = config.button_class(class.clone());
    }
    if settings.use_page_validator
        && let Some(rules) = page.validator.clone()
    {
        config = config.validate_files(move |files| rules.check(files));
    }
    config
}

fn handle_upload(
    uploader_id: UploaderId,
    files: &[SelectedFile],
    behavior: HostBehavior,
    events: &UnboundedSender<HostEvent>,
) -> anyhow::Result<UploadAck> {
    let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    info!(uploader = %uploader_id, files = ?names, "files to upload");
    let _ = events.send(HostEvent::UploadRequested {
        uploader_id,
        files: names,
    });

    let failure = behavior
        .fail_uploads
        .then(|| format!("upload endpoint rejected {} file(s)", files.len()));

    let Some(delay) = behavior.upload_delay else {
        return match failure {
            Some(message) => Err(anyhow!(message)),
            None => Ok(UploadAck::Completed),
        };
    };

    let (sender, pending) = PendingUpload::channel();
    let events = events.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let ok = failure.is_none();
        let _ = events.send(HostEvent::UploadFinished { uploader_id, ok });
        let _ = sender.send(failure.map_or(Ok(()), Err));
    });
    Ok(UploadAck::Deferred(pending))
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;

    fn file(name: &str, mime_type: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, mime_type, size, format!("/assets/{name}"))
    }

    #[test]
    fn page_validator_overrides_per_uploader_limits() {
        let (sender, mut receiver) = unbounded_channel();
        let mut uploaders = build_uploaders(&HostPageConfig::default(), HostBehavior::default(), sender);
        assert_eq!(uploaders.len(), 3);
        assert_eq!(uploaders[0].heading(), "Upload Single Image");

        // 2 MiB passes the page-wide 5 MiB rule even though the section says 1 MiB
        let report = uploaders[0].handle_selection(vec![file("big.png", "image/png", 2 * 1024 * 1024)]);
        assert_eq!(report.accepted, 1);
        assert_eq!(
            receiver.try_recv().unwrap(),
            HostEvent::UploadRequested {
                uploader_id: UploaderId(0),
                files: vec!["big.png".to_string()]
            }
        );

        // a video is valid for the page-wide rules, so the image section accepts it too
        let report = uploaders[0].handle_selection(vec![file("clip.mp4", "video/mp4", 1)]);
        assert_eq!(report.accepted, 1);
    }

    #[test]
    fn rejected_batches_reach_the_error_callback() {
        let (sender, mut receiver) = unbounded_channel();
        let mut uploaders = build_uploaders(&HostPageConfig::default(), HostBehavior::default(), sender);

        let report = uploaders[1].handle_selection(vec![file("a.png", "image/png", 1), file("b.gif", "image/gif", 1)]);

        assert_eq!(report.accepted, 0);
        assert_eq!(
            receiver.try_recv().unwrap(),
            HostEvent::ErrorReported {
                uploader_id: UploaderId(1),
                message: "Invalid format: b.gif".to_string()
            }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn failing_host_reports_synchronously_without_delay() {
        let (sender, mut receiver) = unbounded_channel();
        let behavior = HostBehavior {
            upload_delay: None,
            fail_uploads: true,
        };
        let mut uploaders = build_uploaders(&HostPageConfig::default(), behavior, sender);

        let report = uploaders[2].handle_selection(vec![file("clip.mp4", "video/mp4", 10)]);

        assert_eq!(report.errors.len(), 1);
        assert!(matches!(receiver.try_recv().unwrap(), HostEvent::UploadRequested { .. }));
        assert_eq!(
            receiver.try_recv().unwrap(),
            HostEvent::ErrorReported {
                uploader_id: UploaderId(2),
                message: "upload endpoint rejected 1 file(s)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn delayed_host_defers_the_acknowledgement() {
        let (sender, mut receiver) = unbounded_channel();
        let behavior = HostBehavior {
            upload_delay: Some(Duration::from_millis(5)),
            fail_uploads: true,
        };
        let mut uploaders = build_uploaders(&HostPageConfig::default(), behavior, sender);

        let report = uploaders[0].handle_selection(vec![file("a.png", "image/png", 1)]);
        let pending = report.deferred.expect("deferred acknowledgement");

        assert_eq!(pending.wait().await, Err("upload endpoint rejected 1 file(s)".to_string()));
        assert!(matches!(receiver.recv().await, Some(HostEvent::UploadRequested { .. })));
        assert_eq!(
            receiver.recv().await,
            Some(HostEvent::UploadFinished {
                uploader_id: UploaderId(0),
                ok: false
            })
        );
    }
}
