//! Scripted transport shared by the fetch and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::identity::Identity;
use super::transport::{Transport, TransportResponse};
use crate::error::Result;

/// Replays a fixed script of responses, then repeats the final one forever.
/// Records each attempt's identity so tests can assert rotation happened.
pub(crate) struct MockTransport {
    script: Mutex<VecDeque<TransportResponse>>,
    repeat: TransportResponse,
    calls: AtomicUsize,
    pub(crate) seen_identifiers: Mutex<Vec<String>>,
    pub(crate) seen_user_agents: Mutex<Vec<String>>,
}

impl MockTransport {
    pub(crate) fn new(script: Vec<TransportResponse>, repeat: TransportResponse) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            repeat,
            calls: AtomicUsize::new(0),
            seen_identifiers: Mutex::new(Vec::new()),
            seen_user_agents: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with `response`.
    pub(crate) fn always(response: TransportResponse) -> Arc<Self> {
        Self::new(Vec::new(), response)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn ok(body: &str) -> TransportResponse {
    TransportResponse {
        status: 200,
        body: body.to_string(),
    }
}

pub(crate) fn blocked() -> TransportResponse {
    TransportResponse {
        status: 403,
        body: "blocked".to_string(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, identity: &Identity, _url: &str) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_identifiers
            .lock()
            .unwrap()
            .push(identity.tls_identifier.to_string());
        self.seen_user_agents
            .lock()
            .unwrap()
            .push(identity.user_agent.to_string());
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.repeat.clone()))
    }
}
