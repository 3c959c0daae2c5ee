//! Deluge Web UI backend.
//!
//! # Data Flow
//! ```text
//! torrent bytes (already downloaded)
//!     → session.rs Login       POST {host}json    auth.login
//!     → session.rs StageUpload POST {host}upload  multipart "file"
//!     → session.rs AddTorrent  POST {host}json    web.add_torrents
//! ```
//!
//! # Design Decisions
//! - Magnets are not special-cased: the bytes are always staged then added
//! - No rollback: a file staged before a failed AddTorrent stays staged
//! - Only the first failing phase is reported

pub mod rpc;
pub mod session;

pub use session::{DelugeSession, StagedTorrent};

use async_trait::async_trait;

use crate::backend::{BackendAdapter, Payload, SubmitContext};
use crate::config::DelugeConfig;
use crate::torrent::ClientType;
use crate::upload::{AttemptError, Phase};

#[derive(Debug, Clone)]
pub struct DelugeAdapter {
    config: DelugeConfig,
}

impl DelugeAdapter {
    pub fn new(config: DelugeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BackendAdapter for DelugeAdapter {
    fn client_type(&self) -> ClientType {
        ClientType::Deluge
    }

    async fn submit(&self, ctx: SubmitContext<'_>, payload: Payload) -> Result<(), AttemptError> {
        let file = payload
            .into_file()
            .map_err(|f| AttemptError::new(Phase::StageUpload, f))?;
        DelugeSession::new(ctx, &self.config).run(file).await
    }
}
