//! ruTorrent `addtorrent.php` submissions.
//!
//! Both magnet links and `.torrent` files go to the same endpoint; 3.x moved
//! it under `php/`.

use async_trait::async_trait;
use reqwest::multipart::Form;
use url::form_urlencoded;

use crate::backend::{in_submit_phase, torrent_part, BackendAdapter, Payload, SubmitContext};
use crate::torrent::{endpoint, ClientType, TorrentResource, UploadMetadata};
use crate::upload::AttemptError;

const ADD_TORRENT: &str = "addtorrent.php?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RutorrentVersion {
    V2,
    V3,
}

impl RutorrentVersion {
    /// Path segment inserted before the shared `addtorrent.php?` suffix.
    pub fn prefix(&self) -> &'static str {
        match self {
            RutorrentVersion::V2 => "",
            RutorrentVersion::V3 => "php/",
        }
    }
}

/// `{host}[php/]addtorrent.php?[torrents_start_stopped=1][&label=<label>]`
pub fn add_torrent_url(host: &str, version: RutorrentVersion, metadata: &UploadMetadata) -> String {
    let mut url = endpoint::join(host, &format!("{}{}", version.prefix(), ADD_TORRENT));

    let mut params = Vec::new();
    if metadata.start_paused {
        params.push("torrents_start_stopped=1".to_string());
    }
    if let Some(label) = non_empty(&metadata.label) {
        let encoded: String = form_urlencoded::byte_serialize(label.as_bytes()).collect();
        params.push(format!("label={}", encoded));
    }
    url.push_str(&params.join("&"));
    url
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Form fields shared by the magnet and file flows, in wire order.
fn base_form(form: Form, metadata: &UploadMetadata) -> Form {
    let mut form = form.text("dir_edit", non_empty(&metadata.directory).unwrap_or("").to_string());
    if metadata.start_paused {
        form = form.text("torrents_start_stopped", "on");
    }
    form.text("tadd_label", non_empty(&metadata.label).unwrap_or("").to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct RutorrentAdapter {
    version: RutorrentVersion,
}

impl RutorrentAdapter {
    pub fn new(version: RutorrentVersion) -> Self {
        Self { version }
    }
}

#[async_trait]
impl BackendAdapter for RutorrentAdapter {
    fn client_type(&self) -> ClientType {
        match self.version {
            RutorrentVersion::V2 => ClientType::RutorrentV2,
            RutorrentVersion::V3 => ClientType::RutorrentV3,
        }
    }

    fn accepts_locator(&self, resource: &TorrentResource) -> bool {
        resource.is_magnet()
    }

    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError> {
        let url = add_torrent_url(&ctx.server.host, self.version, ctx.metadata);

        let form = match payload {
            Payload::Locator(locator) => base_form(Form::new().text("url", locator.to_string()), ctx.metadata),
            Payload::File(file) => {
                base_form(Form::new(), ctx.metadata).part("torrent_file", in_submit_phase(torrent_part(file))?)
            }
        };

        tracing::debug!(url = %url, "Submitting to ruTorrent");
        let request = ctx.transport.post(ctx.server, &url).multipart(form);
        in_submit_phase(ctx.transport.execute("submit", request).await).map(|_| ())
    }
}
