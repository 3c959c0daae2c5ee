//! The Deluge upload state machine.
//!
//! ```text
//! Login ──ok──▶ StageUpload ──ok──▶ AddTorrent ──ok──▶ Complete
//!   │               │                   │
//!   └──────fail─────┴───────fail────────┴──▶ abort (phase-tagged, no rollback)
//! ```
//!
//! Each transition is one network call under its own deadline. The Web UI
//! session cookie from `auth.login` is replayed on the later calls.

use reqwest::header::{HeaderMap, CONTENT_TYPE, COOKIE, REFERER, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::backend::{SubmitContext, TorrentFile, TORRENT_MIME};
use crate::config::DelugeConfig;
use crate::deluge::rpc::{self, AddOptions, LoginResponse, StageResponse};
use crate::torrent::endpoint;
use crate::upload::{AttemptError, Phase, UploadFailure};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Server-side path of a torrent uploaded to the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTorrent(pub String);

/// Next transition to run, carrying what it needs from the previous one.
#[derive(Debug)]
enum State {
    Login(TorrentFile),
    StageUpload(TorrentFile),
    AddTorrent(StagedTorrent),
    Complete,
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::Login(_) => Phase::Login,
            State::StageUpload(_) => Phase::StageUpload,
            State::AddTorrent(_) => Phase::AddTorrent,
            State::Complete => Phase::Complete,
        }
    }
}

/// One Web UI session, alive for a single upload attempt.
pub struct DelugeSession<'a> {
    ctx: SubmitContext<'a>,
    config: &'a DelugeConfig,
    cookie: Option<String>,
}

impl<'a> DelugeSession<'a> {
    pub fn new(ctx: SubmitContext<'a>, config: &'a DelugeConfig) -> Self {
        Self {
            ctx,
            config,
            cookie: None,
        }
    }

    /// Drive Login → StageUpload → AddTorrent, stopping at the first failure.
    pub async fn run(mut self, file: TorrentFile) -> Result<(), AttemptError> {
        let mut state = State::Login(file);
        loop {
            let phase = state.phase();
            tracing::debug!(%phase, "Deluge transition");
            state = match state {
                State::Login(file) => {
                    self.login().await.map_err(|f| AttemptError::new(phase, f))?;
                    State::StageUpload(file)
                }
                State::StageUpload(file) => {
                    let staged = self.stage(file).await.map_err(|f| AttemptError::new(phase, f))?;
                    State::AddTorrent(staged)
                }
                State::AddTorrent(staged) => {
                    self.add(&staged).await.map_err(|f| AttemptError::new(phase, f))?;
                    State::Complete
                }
                State::Complete => return Ok(()),
            };
        }
    }

    fn json_url(&self) -> String {
        endpoint::join(&self.ctx.server.host, "json")
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    fn rpc_request(&self, body: &Value) -> RequestBuilder {
        let request = self
            .ctx
            .transport
            .post(self.ctx.server, &self.json_url())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(REFERER, endpoint::base(&self.ctx.server.host))
            .body(body.to_string());
        self.with_session(request)
    }

    async fn login(&mut self) -> Result<(), UploadFailure> {
        let request = self.rpc_request(&rpc::login(&self.config.web_password));
        let reply = self.ctx.transport.execute("deluge_login", request).await?;

        // A wrong Web UI password still answers 200, with `result: false`.
        if let Ok(LoginResponse { result: Some(false) }) = serde_json::from_slice::<LoginResponse>(&reply.body) {
            return Err(UploadFailure::Credentials);
        }

        self.cookie = session_cookie(&reply.headers);
        Ok(())
    }

    async fn stage(&self, file: TorrentFile) -> Result<StagedTorrent, UploadFailure> {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(TORRENT_MIME)
            .map_err(|e| UploadFailure::Protocol(e.to_string()))?;
        let form = Form::new().part("file", part);

        let url = endpoint::join(&self.ctx.server.host, "upload");
        let request = self.with_session(self.ctx.transport.post(self.ctx.server, &url).multipart(form));
        let reply = self.ctx.transport.execute("deluge_stage", request).await?;

        let staged: StageResponse = serde_json::from_slice(&reply.body)
            .map_err(|e| UploadFailure::Protocol(format!("upload response: {}", e)))?;
        staged
            .files
            .into_iter()
            .next()
            .map(StagedTorrent)
            .ok_or_else(|| UploadFailure::Protocol("upload response lists no files".to_string()))
    }

    async fn add(&self, staged: &StagedTorrent) -> Result<(), UploadFailure> {
        let options = AddOptions {
            add_paused: self.ctx.metadata.start_paused,
            download_location: download_location(self.ctx, self.config),
        };
        let request = self.rpc_request(&rpc::add_torrents(&staged.0, &options));
        self.ctx.transport.execute("deluge_add", request).await?;
        Ok(())
    }
}

/// The chosen directory if there is one, else `<download_root>/<user>`.
pub fn download_location(ctx: SubmitContext<'_>, config: &DelugeConfig) -> String {
    match ctx.metadata.directory.as_deref().filter(|d| !d.is_empty()) {
        Some(dir) => dir.to_string(),
        None => endpoint::join_dir(&config.download_root, &ctx.server.user),
    }
}

/// `name=value` pairs of every `Set-Cookie`, ready for a `Cookie` header.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
