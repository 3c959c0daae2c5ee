//! TorrentFlux-b4rt dispatcher upload.

use async_trait::async_trait;
use reqwest::multipart::Form;

use crate::backend::{in_submit_phase, torrent_part, BackendAdapter, Payload, SubmitContext};
use crate::torrent::{endpoint, ClientType};
use crate::upload::AttemptError;

pub fn file_upload_url(host: &str) -> String {
    endpoint::join(host, "dispatcher.php?action=fileUpload")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TorrentFluxAdapter;

#[async_trait]
impl BackendAdapter for TorrentFluxAdapter {
    fn client_type(&self) -> ClientType {
        ClientType::TorrentFluxB4RT
    }

    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError> {
        let file = in_submit_phase(payload.into_file())?;
        // aid=2 selects the "upload" admin action.
        let form = Form::new()
            .text("aid", "2")
            .text("client", "torrentflux-b4rt")
            .text("tadd_label", "")
            .part("upload_files[]", in_submit_phase(torrent_part(file))?);

        let request = ctx.transport.post(ctx.server, &file_upload_url(&ctx.server.host)).multipart(form);
        in_submit_phase(ctx.transport.execute("submit", request).await).map(|_| ())
    }
}
