//! Timeout-guarded HTTP exchanges with a seedbox.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::resilience::{guard, TimeoutError};
use crate::torrent::ServerDescriptor;
use crate::upload::UploadFailure;

/// A fully read response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Shared client plus the per-step deadline of one attempt.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    timeout: Duration,
}

impl Transport {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A GET carrying the server's basic credentials.
    pub fn get(&self, server: &ServerDescriptor, url: &str) -> RequestBuilder {
        self.client.get(url).basic_auth(&server.user, Some(&server.pass))
    }

    /// A POST carrying the server's basic credentials.
    pub fn post(&self, server: &ServerDescriptor, url: &str) -> RequestBuilder {
        self.client.post(url).basic_auth(&server.user, Some(&server.pass))
    }

    /// Send `request` and read its whole body under one deadline, without
    /// interpreting the status.
    pub async fn exchange(
        &self,
        step: &'static str,
        request: RequestBuilder,
    ) -> Result<Result<Reply, reqwest::Error>, TimeoutError> {
        guard(step, self.timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(Reply { status, headers, body })
        })
        .await
    }

    /// Like [`Transport::exchange`], classifying the outcome for an upload step:
    /// 2xx succeeds, 401/403/407 is an auth failure, anything else a generic one.
    pub async fn execute(&self, step: &'static str, request: RequestBuilder) -> Result<Reply, UploadFailure> {
        let reply = self
            .exchange(step, request)
            .await?
            .map_err(|e| UploadFailure::Transport(e.without_url().to_string()))?;

        tracing::debug!(step, status = %reply.status, bytes = reply.body.len(), "Seedbox replied");

        if reply.status.is_success() {
            Ok(reply)
        } else {
            Err(UploadFailure::from_status(reply.status))
        }
    }
}
