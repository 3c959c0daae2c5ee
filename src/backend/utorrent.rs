//! uTorrent Web UI `add-file` action.

use async_trait::async_trait;
use reqwest::multipart::Form;

use crate::backend::{in_submit_phase, torrent_part, BackendAdapter, Payload, SubmitContext};
use crate::torrent::{endpoint, ClientType};
use crate::upload::AttemptError;

pub fn add_file_url(host: &str) -> String {
    endpoint::join(host, "?action=add-file")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UTorrentAdapter;

#[async_trait]
impl BackendAdapter for UTorrentAdapter {
    fn client_type(&self) -> ClientType {
        ClientType::UTorrent
    }

    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError> {
        let file = in_submit_phase(payload.into_file())?;
        let form = Form::new().part("torrent_file[]", in_submit_phase(torrent_part(file))?);

        let request = ctx.transport.post(ctx.server, &add_file_url(&ctx.server.host)).multipart(form);
        in_submit_phase(ctx.transport.execute("submit", request).await).map(|_| ())
    }
}
