//! Backend protocol adapters.
//!
//! # Data Flow
//! ```text
//! ClientType
//!     → adapter_for() (one adapter per backend family)
//!     → accepts_locator()? magnet/URL handed over as-is
//!       otherwise fetch.rs downloads the .torrent bytes first
//!     → submit() (one request, or the Deluge session for Deluge)
//!     → transport.rs (basic auth, deadline, status classification)
//! ```
//!
//! # Design Decisions
//! - Closed `ClientType` enum; no string dispatch
//! - ruTorrent 2.x and 3.x share one adapter; 3.x only adds a path prefix
//! - Adapters never notify; the upload driver reports the single outcome

pub mod fetch;
pub mod generic;
pub mod rutorrent;
pub mod torrentflux;
pub mod transport;
pub mod utorrent;

pub use fetch::{HttpFetcher, TorrentFetcher, TorrentFile};
pub use transport::{Reply, Transport};

use async_trait::async_trait;
use reqwest::multipart::Part;
use url::Url;

use crate::config::DelugeConfig;
use crate::deluge::DelugeAdapter;
use crate::torrent::{ClientType, ServerDescriptor, TorrentResource, UploadMetadata};
use crate::upload::{AttemptError, Phase, UploadFailure};

use self::generic::GenericAdapter;
use self::rutorrent::{RutorrentAdapter, RutorrentVersion};
use self::torrentflux::TorrentFluxAdapter;
use self::utorrent::UTorrentAdapter;

pub const TORRENT_MIME: &str = "application/x-bittorrent";

/// What gets handed to the backend.
#[derive(Debug)]
pub enum Payload {
    /// The locator itself (magnet links on ruTorrent).
    Locator(Url),
    /// The downloaded `.torrent` file.
    File(TorrentFile),
}

impl Payload {
    /// The file, for backends that cannot take a locator.
    pub fn into_file(self) -> Result<TorrentFile, UploadFailure> {
        match self {
            Payload::File(file) => Ok(file),
            Payload::Locator(url) => Err(UploadFailure::Protocol(format!(
                "backend needs a torrent file, got locator {}",
                url.scheme()
            ))),
        }
    }
}

/// Everything an adapter needs to talk to one server.
#[derive(Debug, Clone, Copy)]
pub struct SubmitContext<'a> {
    pub transport: &'a Transport,
    pub server: &'a ServerDescriptor,
    pub metadata: &'a UploadMetadata,
}

/// The common submit capability of every backend.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn client_type(&self) -> ClientType;

    /// Whether `resource` can be submitted without downloading it first.
    fn accepts_locator(&self, _resource: &TorrentResource) -> bool {
        false
    }

    /// Hand the torrent to the backend. Failures carry the phase they happened in.
    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError>;
}

/// Pick the adapter for a backend type.
pub fn adapter_for(client: ClientType, deluge: &DelugeConfig) -> Box<dyn BackendAdapter> {
    match client {
        ClientType::RutorrentV2 => Box::new(RutorrentAdapter::new(RutorrentVersion::V2)),
        ClientType::RutorrentV3 => Box::new(RutorrentAdapter::new(RutorrentVersion::V3)),
        ClientType::UTorrent => Box::new(UTorrentAdapter),
        ClientType::TorrentFluxB4RT => Box::new(TorrentFluxAdapter),
        ClientType::Deluge => Box::new(DelugeAdapter::new(deluge.clone())),
        ClientType::Generic => Box::new(GenericAdapter),
    }
}

/// Multipart part holding the torrent file.
pub(crate) fn torrent_part(file: TorrentFile) -> Result<Part, UploadFailure> {
    Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str(TORRENT_MIME)
        .map_err(|e| UploadFailure::Protocol(e.to_string()))
}

/// Run a single-request submission as the `Submit` phase.
pub(crate) fn in_submit_phase<T>(result: Result<T, UploadFailure>) -> Result<T, AttemptError> {
    result.map_err(|failure| AttemptError::new(Phase::Submit, failure))
}
