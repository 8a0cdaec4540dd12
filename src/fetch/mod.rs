//! Outbound fetch core: identity rotation plus bounded anti-bot retry.

mod client;
mod identity;
mod retry;
mod transport;
mod user_agent;

#[cfg(test)]
pub(crate) mod testing;

pub use identity::{BrowserFamily, Identity, IdentityRotator, Os};
pub use retry::RetryPolicy;
pub use transport::{RquestTransport, Transport, TransportResponse};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RelayError, Result};

/// Fetches a JSON document from the provider, rotating to a fresh browser
/// identity on every attempt. A 403 discards the identity and retries with
/// backoff up to the policy cap; every other failure is terminal.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    rotator: IdentityRotator,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(rotator: IdentityRotator, retry: RetryPolicy) -> Self {
        Self::with_transport(Arc::new(RquestTransport::new()), rotator, retry)
    }

    /// Inject a transport; used by tests to script upstream behavior.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        rotator: IdentityRotator,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            rotator,
            retry,
        }
    }

    /// GET `url` and return the decoded body's `data` field.
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        for attempt in 1..=self.retry.max_attempts {
            let identity = self.rotator.next();
            debug!(
                identifier = identity.tls_identifier,
                os = ?identity.os,
                attempt,
                "outbound fetch"
            );

            let response = self.transport.execute(&identity, url).await?;
            match check_status(response.status) {
                Ok(()) => return decode_payload(&response.body),
                Err(RelayError::AntiBotBlocked { status }) => {
                    warn!(
                        identifier = identity.tls_identifier,
                        status, attempt, "anti-bot block, rotating identity"
                    );
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Err(RelayError::RetryExhausted {
            attempts: self.retry.max_attempts,
        })
    }
}

fn check_status(status: u16) -> Result<()> {
    if status == 403 {
        return Err(RelayError::AntiBotBlocked { status });
    }
    if !(200..300).contains(&status) {
        return Err(RelayError::UpstreamStatus { status });
    }
    Ok(())
}

fn decode_payload(body: &str) -> Result<Value> {
    let envelope: Value = serde_json::from_str(body)?;
    envelope
        .get("data")
        .cloned()
        .ok_or(RelayError::MalformedResponse("`data` envelope"))
}
