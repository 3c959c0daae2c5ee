//! Attempt phases, failure taxonomy and reports.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::resilience::TimeoutError;
use crate::torrent::ClientType;

/// Where an attempt is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fetching labels/directories and asking the user.
    Metadata,
    /// Downloading the `.torrent` file from its source.
    Download,
    /// Single-request submission to a non-Deluge backend.
    Submit,
    /// Deluge `auth.login`.
    Login,
    /// Deluge multipart upload to the staging area.
    StageUpload,
    /// Deluge `web.add_torrents`.
    AddTorrent,
    /// Terminal success.
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Metadata => "metadata",
            Phase::Download => "download",
            Phase::Submit => "submit",
            Phase::Login => "login",
            Phase::StageUpload => "stage_upload",
            Phase::AddTorrent => "add_torrent",
            Phase::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why fetching the torrent from its source failed.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("source answered HTTP {0}")]
    Status(StatusCode),

    #[error("source server timed out: {0}")]
    Timeout(TimeoutError),

    #[error("source unreachable: {0}")]
    Transport(String),

    #[error("cannot download '{0}' links")]
    UnsupportedScheme(String),
}

/// Terminal failure of one network step.
#[derive(Debug, Error)]
pub enum UploadFailure {
    #[error("server authentication failed (HTTP {0})")]
    Auth(StatusCode),

    #[error("server rejected the credentials")]
    Credentials,

    #[error("server rejected the upload (HTTP {0})")]
    Rejected(StatusCode),

    #[error("server unreachable: {0}")]
    Transport(String),

    #[error("unexpected server response: {0}")]
    Protocol(String),

    #[error("timeout: {0}")]
    Timeout(#[from] TimeoutError),

    #[error("torrent download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("cancelled at the label/directory prompt")]
    Cancelled,
}

/// Coarse failure category, as counted in metrics and gated in notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Auth,
    Generic,
    Timeout,
    Download,
    Cancelled,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::Auth => "auth_failure",
            FailureClass::Generic => "generic_failure",
            FailureClass::Timeout => "timeout",
            FailureClass::Download => "download_failure",
            FailureClass::Cancelled => "cancelled",
        }
    }
}

impl UploadFailure {
    /// Classify a non-success status the same way for every backend.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 | 407 => UploadFailure::Auth(status),
            _ => UploadFailure::Rejected(status),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            UploadFailure::Auth(_) | UploadFailure::Credentials => FailureClass::Auth,
            UploadFailure::Rejected(_) | UploadFailure::Transport(_) | UploadFailure::Protocol(_) => {
                FailureClass::Generic
            }
            UploadFailure::Timeout(_) => FailureClass::Timeout,
            UploadFailure::Download(_) => FailureClass::Download,
            UploadFailure::Cancelled => FailureClass::Cancelled,
        }
    }
}

/// A failure tagged with the phase it ended the attempt in.
#[derive(Debug, Error)]
#[error("{phase} failed: {failure}")]
pub struct AttemptError {
    pub phase: Phase,
    #[source]
    pub failure: UploadFailure,
}

impl AttemptError {
    pub fn new(phase: Phase, failure: impl Into<UploadFailure>) -> Self {
        Self {
            phase,
            failure: failure.into(),
        }
    }
}

/// Result of one upload attempt.
#[derive(Debug)]
pub struct UploadReport {
    pub attempt_id: Uuid,
    pub client: ClientType,
    pub result: Result<(), AttemptError>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The phase the attempt ended in.
    pub fn phase(&self) -> Phase {
        match &self.result {
            Ok(()) => Phase::Complete,
            Err(e) => e.phase,
        }
    }

    /// Metrics label for the outcome.
    pub fn outcome_label(&self) -> &'static str {
        match &self.result {
            Ok(()) => "success",
            Err(e) => e.failure.class().as_str(),
        }
    }
}
