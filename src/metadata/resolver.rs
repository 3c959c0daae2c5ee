//! Label/directory resolution before an upload.

use crate::backend::Transport;
use crate::config::UploadConfig;
use crate::metadata::choice::{ChoicePrompt, Chooser};
use crate::metadata::parse::{parse_listing, Listing};
use crate::metadata::MetadataError;
use crate::notification::Notifier;
use crate::observability::metrics;
use crate::torrent::{endpoint, ServerDescriptor, UploadMetadata};

const INFO_PATH: &str = "plugins/_getdir/info.php?mode=";

/// Which listings to request from the `_getdir` plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    pub directories: bool,
    pub labels: bool,
}

impl Modes {
    /// Modes to request for `server`, or `None` when nothing should be fetched.
    pub fn for_server(server: &ServerDescriptor, options: &UploadConfig) -> Option<Self> {
        let modes = Self {
            directories: options.capture_directories,
            labels: options.capture_labels,
        };
        (server.client.supports_introspection() && (modes.directories || modes.labels)).then_some(modes)
    }

    /// `dirlist;labels`, `dirlist` or `labels`.
    pub fn query(&self) -> String {
        let mut modes = Vec::with_capacity(2);
        if self.directories {
            modes.push("dirlist");
        }
        if self.labels {
            modes.push("labels");
        }
        modes.join(";")
    }
}

pub fn info_url(host: &str, modes: Modes) -> String {
    let mut url = endpoint::join(host, INFO_PATH);
    url.push_str(&modes.query());
    url
}

/// Outcome of resolution. Failures are already degraded to empty metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(UploadMetadata),
    /// The user dismissed the prompt; nothing should be uploaded.
    Dismissed,
}

pub struct MetadataResolver<'a> {
    transport: &'a Transport,
    options: &'a UploadConfig,
    notifier: &'a Notifier,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(transport: &'a Transport, options: &'a UploadConfig, notifier: &'a Notifier) -> Self {
        Self {
            transport,
            options,
            notifier,
        }
    }

    pub async fn resolve(&self, server: &ServerDescriptor, chooser: &dyn Chooser) -> Resolution {
        let empty = UploadMetadata::empty(self.options.start_paused);

        let modes = match Modes::for_server(server, self.options) {
            Some(modes) => modes,
            None => return Resolution::Resolved(empty),
        };

        let listing = match self.fetch(server, modes).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(error = %e, "Label/directory lookup failed, uploading without");
                metrics::record_metadata_failure();
                self.notifier.metadata_failed(&e);
                return Resolution::Resolved(empty);
            }
        };

        let prompt = ChoicePrompt {
            labels: modes.labels.then(|| listing.labels.clone()),
            directories: modes.directories.then(|| listing.directory_choices()),
        };

        let choice = match chooser.choose(prompt).await {
            Some(choice) => choice,
            None => {
                tracing::info!("Label/directory prompt dismissed");
                return Resolution::Dismissed;
            }
        };
        tracing::debug!(label = ?choice.label, directory = ?choice.directory, "User choice");

        Resolution::Resolved(UploadMetadata {
            label: choice.label.filter(|l| !l.is_empty()),
            directory: choice
                .directory
                .filter(|d| !d.is_empty())
                .and_then(|d| listing.absolute_dir(&d)),
            start_paused: self.options.start_paused,
        })
    }

    async fn fetch(&self, server: &ServerDescriptor, modes: Modes) -> Result<Listing, MetadataError> {
        let url = info_url(&server.host, modes);
        tracing::debug!(url = %url, "Fetching labels/directories");

        let reply = self
            .transport
            .exchange("metadata", self.transport.get(server, &url))
            .await
            .map_err(MetadataError::Timeout)?
            .map_err(|e| MetadataError::Transport(e.without_url().to_string()))?;

        if !reply.status.is_success() {
            return Err(MetadataError::Status(reply.status));
        }

        let body = String::from_utf8_lossy(&reply.body);
        parse_listing(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::ClientType;

    fn server(client: ClientType) -> ServerDescriptor {
        ServerDescriptor {
            name: None,
            host: "http://x.example/seed".to_string(),
            user: "u".to_string(),
            pass: "p".to_string(),
            client,
        }
    }

    fn options(labels: bool, directories: bool) -> UploadConfig {
        UploadConfig {
            capture_labels: labels,
            capture_directories: directories,
            ..UploadConfig::default()
        }
    }

    #[test]
    fn test_modes_only_for_rutorrent() {
        let opts = options(true, true);
        assert!(Modes::for_server(&server(ClientType::RutorrentV2), &opts).is_some());
        assert!(Modes::for_server(&server(ClientType::RutorrentV3), &opts).is_some());
        for client in [ClientType::UTorrent, ClientType::TorrentFluxB4RT, ClientType::Deluge, ClientType::Generic] {
            assert!(Modes::for_server(&server(client), &opts).is_none());
        }
        assert!(Modes::for_server(&server(ClientType::RutorrentV3), &options(false, false)).is_none());
    }

    #[test]
    fn test_info_url() {
        let both = Modes::for_server(&server(ClientType::RutorrentV3), &options(true, true)).unwrap();
        assert_eq!(
            info_url("http://x.example/seed", both),
            "http://x.example/seed/plugins/_getdir/info.php?mode=dirlist;labels"
        );

        let labels = Modes::for_server(&server(ClientType::RutorrentV3), &options(true, false)).unwrap();
        assert_eq!(labels.query(), "labels");
    }
}
