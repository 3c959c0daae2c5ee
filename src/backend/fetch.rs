//! Downloading `.torrent` files from their source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::resilience::guard;
use crate::torrent::TorrentResource;
use crate::upload::DownloadError;

/// Torrent file contents, held only until the submission using them settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Lazily obtains the bytes of a direct-file resource.
#[async_trait]
pub trait TorrentFetcher: Send + Sync {
    async fn fetch(&self, resource: &TorrentResource, limit: Duration) -> Result<TorrentFile, DownloadError>;
}

/// Fetches over plain, unauthenticated HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TorrentFetcher for HttpFetcher {
    async fn fetch(&self, resource: &TorrentResource, limit: Duration) -> Result<TorrentFile, DownloadError> {
        let url = resource.locator();
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DownloadError::UnsupportedScheme(url.scheme().to_string()));
        }

        tracing::debug!(source = %url, "Downloading torrent");
        let request = self.client.get(url.clone());
        let result = guard("download", limit, async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Ok::<_, reqwest::Error>(Err(status));
            }
            response.bytes().await.map(|b| Ok(b.to_vec()))
        })
        .await
        .map_err(DownloadError::Timeout)?;

        match result {
            Ok(Ok(bytes)) => Ok(TorrentFile {
                name: resource.file_name(),
                bytes,
            }),
            Ok(Err(status)) => Err(DownloadError::Status(status)),
            Err(e) => Err(DownloadError::Transport(e.without_url().to_string())),
        }
    }
}
