//! Generic backends: the raw torrent bytes are POSTed to the host itself.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::backend::{in_submit_phase, BackendAdapter, Payload, SubmitContext, TORRENT_MIME};
use crate::torrent::{endpoint, ClientType};
use crate::upload::AttemptError;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericAdapter;

#[async_trait]
impl BackendAdapter for GenericAdapter {
    fn client_type(&self) -> ClientType {
        ClientType::Generic
    }

    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError> {
        let file = in_submit_phase(payload.into_file())?;

        let request = ctx
            .transport
            .post(ctx.server, &endpoint::base(&ctx.server.host))
            .header(CONTENT_TYPE, TORRENT_MIME)
            .body(file.bytes);
        in_submit_phase(ctx.transport.execute("submit", request).await).map(|_| ())
    }
}
