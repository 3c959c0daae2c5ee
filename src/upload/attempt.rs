//! The per-attempt driver.
//!
//! ```text
//! Metadata ──▶ Download (skipped for accepted locators) ──▶ Submit ──▶ Complete
//! ```
//!
//! Every attempt reads one configuration snapshot, gets its own id and span,
//! and ends in exactly one outcome notification.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::backend::{adapter_for, HttpFetcher, Payload, SubmitContext, TorrentFetcher, Transport};
use crate::config::{ConfigStore, SeedboxConfig};
use crate::metadata::{Chooser, MetadataResolver, Resolution};
use crate::notification::{Notifier, Reporter, TracingReporter};
use crate::observability::metrics;
use crate::torrent::{ServerDescriptor, TorrentResource, UploadMetadata};
use crate::upload::{AttemptError, Phase, UploadFailure, UploadReport};

/// Entry point for uploads. Cheap to clone; clones share the client,
/// configuration and reporter.
#[derive(Clone)]
pub struct Uploader {
    client: reqwest::Client,
    config: ConfigStore,
    reporter: Arc<dyn Reporter>,
    fetcher: Option<Arc<dyn TorrentFetcher>>,
}

impl Uploader {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            reporter: Arc::new(TracingReporter),
            fetcher: None,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the default HTTP fetcher used for direct-file resources.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn TorrentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Run one upload attempt of `resource` to `server`.
    pub async fn upload(
        &self,
        resource: TorrentResource,
        server: ServerDescriptor,
        chooser: &dyn Chooser,
    ) -> UploadReport {
        let id = Uuid::new_v4();
        let span = tracing::info_span!(
            "upload",
            attempt_id = %id,
            client = %server.client,
            server = %server.display_name(),
        );

        let snapshot = self.config.snapshot();
        let fetcher: Arc<dyn TorrentFetcher> = match &self.fetcher {
            Some(fetcher) => fetcher.clone(),
            None => Arc::new(HttpFetcher::new(self.client.clone())),
        };
        let attempt = UploadAttempt {
            id,
            transport: Transport::new(self.client.clone(), Duration::from_secs(snapshot.upload.timeout_secs)),
            notifier: Notifier::new(self.reporter.clone(), snapshot.notifications.clone()),
            fetcher,
            config: snapshot,
            resource,
            server,
        };

        attempt.run(chooser).instrument(span).await
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("config", &self.config)
            .field("custom_fetcher", &self.fetcher.is_some())
            .finish_non_exhaustive()
    }
}

/// State of one attempt, owned by the task running it.
struct UploadAttempt {
    id: Uuid,
    config: Arc<SeedboxConfig>,
    transport: Transport,
    notifier: Notifier,
    fetcher: Arc<dyn TorrentFetcher>,
    resource: TorrentResource,
    server: ServerDescriptor,
}

impl UploadAttempt {
    async fn run(self, chooser: &dyn Chooser) -> UploadReport {
        tracing::info!(resource = %self.resource, "Upload started");

        let result = self.drive(chooser).await;
        match &result {
            Ok(()) => {
                tracing::info!("Upload complete");
                self.notifier.uploaded();
            }
            Err(e) if matches!(e.failure, UploadFailure::Cancelled) => {
                tracing::info!("Upload cancelled");
            }
            Err(e) => {
                tracing::warn!(phase = %e.phase, error = %e.failure, "Upload failed");
                self.notifier.failed(&e.failure);
            }
        }

        let report = UploadReport {
            attempt_id: self.id,
            client: self.server.client,
            result,
        };
        metrics::record_upload(report.client.as_str(), report.outcome_label());
        report
    }

    async fn drive(&self, chooser: &dyn Chooser) -> Result<(), AttemptError> {
        let metadata = self.resolve_metadata(chooser).await?;

        let adapter = adapter_for(self.server.client, &self.config.deluge);
        let payload = if adapter.accepts_locator(&self.resource) {
            tracing::debug!("Handing locator to backend");
            Payload::Locator(self.resource.locator().clone())
        } else {
            self.notifier.download_started();
            let file = self
                .fetcher
                .fetch(&self.resource, self.transport.timeout())
                .await
                .map_err(|e| AttemptError::new(Phase::Download, e))?;
            tracing::debug!(name = %file.name, bytes = file.bytes.len(), "Torrent downloaded");
            Payload::File(file)
        };

        self.notifier.upload_started();
        let ctx = SubmitContext {
            transport: &self.transport,
            server: &self.server,
            metadata: &metadata,
        };
        adapter.submit(ctx, payload).await
    }

    async fn resolve_metadata(&self, chooser: &dyn Chooser) -> Result<UploadMetadata, AttemptError> {
        let resolver = MetadataResolver::new(&self.transport, &self.config.upload, &self.notifier);
        match resolver.resolve(&self.server, chooser).await {
            Resolution::Resolved(metadata) => Ok(metadata),
            Resolution::Dismissed => Err(AttemptError::new(Phase::Metadata, UploadFailure::Cancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TorrentFile;
    use crate::metadata::PresetChooser;
    use crate::notification::ChannelReporter;
    use crate::torrent::ClientType;
    use crate::upload::DownloadError;
    use async_trait::async_trait;

    struct FailingFetcher;

    #[async_trait]
    impl TorrentFetcher for FailingFetcher {
        async fn fetch(&self, _resource: &TorrentResource, _limit: Duration) -> Result<TorrentFile, DownloadError> {
            Err(DownloadError::Transport("unreachable".to_string()))
        }
    }

    fn server(client: ClientType) -> ServerDescriptor {
        ServerDescriptor {
            name: None,
            host: "http://127.0.0.1:9/".to_string(),
            user: "u".to_string(),
            pass: "p".to_string(),
            client,
        }
    }

    #[tokio::test]
    async fn test_download_failure_stops_before_submit() {
        let (reporter, mut rx) = ChannelReporter::new();
        let uploader = Uploader::new(ConfigStore::default())
            .with_reporter(Arc::new(reporter))
            .with_fetcher(Arc::new(FailingFetcher));

        let resource = TorrentResource::parse("http://src.example/a.torrent").unwrap();
        let report = uploader
            .upload(resource, server(ClientType::UTorrent), &PresetChooser::default())
            .await;

        assert_eq!(report.phase(), Phase::Download);
        assert_eq!(report.outcome_label(), "download_failure");
        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.message, "Torrent download failed (connection error).");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_magnet_on_deluge_is_a_download_failure() {
        let (reporter, mut rx) = ChannelReporter::new();
        let uploader = Uploader::new(ConfigStore::default()).with_reporter(Arc::new(reporter));

        let resource = TorrentResource::parse("magnet:?xt=urn:btih:abc").unwrap();
        let report = uploader
            .upload(resource, server(ClientType::Deluge), &PresetChooser::default())
            .await;

        assert!(matches!(
            report.result,
            Err(AttemptError {
                phase: Phase::Download,
                failure: UploadFailure::Download(DownloadError::UnsupportedScheme(_)),
            })
        ));
        assert_eq!(rx.try_recv().unwrap().message, "Torrent download failed ('magnet' links cannot be downloaded).");
    }
}
