//! Shared utilities for integration tests: an in-process mock seedbox and
//! recording collaborators.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use seedbox_upload::backend::{TorrentFetcher, TorrentFile};
use seedbox_upload::config::{ConfigStore, SeedboxConfig};
use seedbox_upload::notification::{Notification, Reporter};
use seedbox_upload::torrent::{ClientType, ServerDescriptor, TorrentResource};
use seedbox_upload::upload::{DownloadError, Uploader};

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path plus query string.
    pub target: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok("")
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

/// A seedbox web interface bound to an ephemeral local port.
pub struct MockSeedbox {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockSeedbox {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = MockState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(handle).with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    /// Answers 200 with an empty body to everything.
    pub async fn accepting() -> Self {
        Self::start(|_| MockResponse::ok("")).await
    }

    /// Host as configured, without a trailing slash.
    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        target: uri.path_and_query().map(|p| p.to_string()).unwrap_or_default(),
        headers,
        body: body.to_vec(),
    };
    let reply = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut builder = Response::builder().status(reply.status);
    for (name, value) in &reply.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::from(reply.body)).unwrap()
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingReporter {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Hands out fixed torrent bytes and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingFetcher {
    calls: AtomicUsize,
}

pub const TORRENT_BYTES: &[u8] = b"d8:announce13:http://t.test4:infod4:name3:abcee";

impl CountingFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TorrentFetcher for CountingFetcher {
    async fn fetch(&self, resource: &TorrentResource, _limit: Duration) -> Result<TorrentFile, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TorrentFile {
            name: resource.file_name(),
            bytes: TORRENT_BYTES.to_vec(),
        })
    }
}

pub fn server(host: String, client: ClientType) -> ServerDescriptor {
    ServerDescriptor {
        name: None,
        host,
        user: "alice".to_string(),
        pass: "s3cret".to_string(),
        client,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// An uploader wired to the given collaborators.
pub fn uploader(
    config: SeedboxConfig,
    reporter: Arc<RecordingReporter>,
    fetcher: Option<Arc<CountingFetcher>>,
) -> Uploader {
    let uploader = Uploader::new(ConfigStore::new(config))
        .with_client(http_client())
        .with_reporter(reporter);
    match fetcher {
        Some(fetcher) => uploader.with_fetcher(fetcher),
        None => uploader,
    }
}

pub fn torrent_link() -> TorrentResource {
    TorrentResource::parse("http://source.test/files/ubuntu.torrent").unwrap()
}

pub fn magnet_link() -> TorrentResource {
    TorrentResource::parse("magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=ubuntu").unwrap()
}
