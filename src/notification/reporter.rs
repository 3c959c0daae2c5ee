//! Reporter sinks and the per-category gate in front of them.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::NotificationConfig;
use crate::metadata::MetadataError;
use crate::notification::{Notification, Theme};
use crate::upload::{DownloadError, UploadFailure};

/// Receives notifications for display.
pub trait Reporter: Send + Sync {
    fn report(&self, notification: Notification);
}

/// Logs notifications. Used when nothing else is attached.
#[derive(Debug, Default, Clone)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, notification: Notification) {
        tracing::info!(theme = %notification.theme, "{}", notification.message);
    }
}

/// Forwards notifications over a channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

/// Translates lifecycle events into notifications, honouring the switches of
/// one configuration snapshot.
#[derive(Clone)]
pub struct Notifier {
    reporter: Arc<dyn Reporter>,
    gates: NotificationConfig,
}

impl Notifier {
    pub fn new(reporter: Arc<dyn Reporter>, gates: NotificationConfig) -> Self {
        Self { reporter, gates }
    }

    fn emit(&self, enabled: bool, theme: Theme, message: impl Into<String>) {
        if enabled {
            self.reporter.report(Notification::new(theme, message));
        }
    }

    pub fn download_started(&self) {
        self.emit(self.gates.download_start, Theme::Downloading, "Starting torrent download.");
    }

    pub fn upload_started(&self) {
        self.emit(self.gates.upload_start, Theme::Uploading, "Starting torrent upload to seedbox.");
    }

    pub fn uploaded(&self) {
        self.emit(self.gates.upload_success, Theme::Uploaded, "Torrent uploaded successfully.");
    }

    /// Report the terminal failure of an attempt. Cancellation is silent.
    pub fn failed(&self, failure: &UploadFailure) {
        match failure {
            UploadFailure::Auth(_) | UploadFailure::Credentials => {
                self.emit(self.gates.auth_failure, Theme::Failure, "Server authentication failed.")
            }
            UploadFailure::Rejected(status) => self.emit(
                self.gates.upload_failure,
                Theme::Failure,
                format!("Torrent upload failed (HTTP {}).", status.as_u16()),
            ),
            UploadFailure::Transport(_) => self.emit(
                self.gates.upload_failure,
                Theme::Failure,
                "Torrent upload failed (connection error).",
            ),
            UploadFailure::Protocol(_) => self.emit(
                self.gates.upload_failure,
                Theme::Failure,
                "Torrent upload failed (unexpected server response).",
            ),
            UploadFailure::Timeout(_) => {
                self.emit(self.gates.timeout, Theme::Timeout, "Timeout uploading torrent.")
            }
            UploadFailure::Download(err) => self.download_failed(err),
            UploadFailure::Cancelled => {}
        }
    }

    fn download_failed(&self, err: &DownloadError) {
        let (theme, message) = match err {
            DownloadError::Status(status) => (
                Theme::Failure,
                format!("Torrent download failed (HTTP {}).", status.as_u16()),
            ),
            DownloadError::Timeout(_) => (
                Theme::Timeout,
                "Torrent download failed because of source server timeout.".to_string(),
            ),
            DownloadError::Transport(_) => (
                Theme::Failure,
                "Torrent download failed (connection error).".to_string(),
            ),
            DownloadError::UnsupportedScheme(scheme) => (
                Theme::Failure,
                format!("Torrent download failed ('{}' links cannot be downloaded).", scheme),
            ),
        };
        self.emit(self.gates.download_failure, theme, message);
    }

    /// Report a degraded label/directory fetch.
    pub fn metadata_failed(&self, err: &MetadataError) {
        match err {
            MetadataError::Status(status) => self.emit(
                self.gates.auth_failure,
                Theme::Failure,
                format!(
                    "Label info download failed because of seedbox error (HTTP {}).",
                    status.as_u16()
                ),
            ),
            MetadataError::Transport(_) => self.emit(
                self.gates.auth_failure,
                Theme::Failure,
                "Label info download failed because of seedbox error (connection error).",
            ),
            MetadataError::Timeout(_) => self.emit(
                self.gates.timeout,
                Theme::Timeout,
                "Label info download failed because of seedbox timeout.",
            ),
            MetadataError::Malformed(_) => self.emit(
                self.gates.auth_failure,
                Theme::Failure,
                "Label info from seedbox could not be parsed.",
            ),
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("gates", &self.gates).finish_non_exhaustive()
    }
}
