use std::time::Duration;

use async_trait::async_trait;

use super::client::build_client;
use super::identity::Identity;
use crate::error::Result;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Raw upstream answer before any status or envelope interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Seam between the retry loop and the wire. The production implementation
/// speaks emulated TLS through rquest; tests substitute a scripted mock.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, identity: &Identity, url: &str) -> Result<TransportResponse>;
}

/// GET through a per-identity rquest client with the identity's header set.
#[derive(Debug, Clone)]
pub struct RquestTransport {
    timeout: Duration,
}

impl RquestTransport {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl Default for RquestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RquestTransport {
    async fn execute(&self, identity: &Identity, url: &str) -> Result<TransportResponse> {
        let client = build_client(identity, self.timeout)?;
        let response = client
            .get(url)
            .headers(identity.headers.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}
