//! Canned implementations of the collector's capabilities for unit tests.

use crate::{
    error::{
        Result,
        SyncCheckError,
    },
    http::HttpClient,
    sources::execution::{
        ExecutionClient,
        SyncProgress,
    },
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    time::Duration,
};
use url::Url;

/// Serves fixed JSON bodies and status codes keyed by full URL. Unknown URLs
/// behave like a refused connection.
#[derive(Debug, Default)]
pub struct StaticHttpClient {
    json: HashMap<String, serde_json::Value>,
    status: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
}

impl StaticHttpClient {
    pub fn with_json(mut self, url: &str, body: serde_json::Value) -> Self {
        self.json.insert(url.to_string(), body);
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.status.insert(url.to_string(), status);
        self
    }

    /// Stall every GET of `url` for `delay` before answering.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

fn refused(url: &Url) -> SyncCheckError {
    SyncCheckError::Connectivity(format!("connection refused: {url}"))
}

#[async_trait]
impl HttpClient for StaticHttpClient {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.json.get(url.as_str()).cloned().ok_or_else(|| refused(url))
    }

    async fn get_status_code(&self, url: &Url) -> Result<u16> {
        self.status.get(url.as_str()).copied().ok_or_else(|| refused(url))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeExecutionClient {
    /// `None` makes every header request fail.
    latest: Option<u64>,
    highest: Option<u64>,
    broken_sync_progress: bool,
    /// Delay applied to header requests.
    delay: Option<Duration>,
}

impl FakeExecutionClient {
    pub fn at(latest: u64) -> Self {
        Self {
            latest: Some(latest),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn syncing_to(mut self, highest: u64) -> Self {
        self.highest = Some(highest);
        self
    }

    pub fn with_broken_sync_progress(mut self) -> Self {
        self.broken_sync_progress = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ExecutionClient for FakeExecutionClient {
    async fn latest_block_number(&self) -> Result<u64> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.latest
            .ok_or_else(|| SyncCheckError::Connectivity("dial unix /tmp/geth.ipc".to_string()))
    }

    async fn sync_progress(&self) -> Result<Option<SyncProgress>> {
        if self.broken_sync_progress {
            return Err(SyncCheckError::Upstream("code -32601: method not found".to_string()));
        }
        Ok(self.highest.map(|highest_block| SyncProgress { highest_block }))
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(1)
    }
}
