//! Heimdall (Tendermint `/status`) adapter for Polygon PoS chains.
//!
//! Heimdall has no slot distance, optimistic sync or health endpoint. Its
//! sync distance is the wall-clock age of the latest block in seconds.

use super::parse_decimal;
use crate::{
    error::{
        Result,
        SyncCheckError,
    },
    http::{
        HttpClient,
        endpoint_url,
    },
    snapshot::HeimdallSyncState,
};
use chrono::{
    DateTime,
    Utc,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::trace;
use url::Url;

const STATUS_PATH: &str = "/status";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    result: StatusResult,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    latest_block_height: String,
    latest_block_time: String,
    catching_up: bool,
}

pub struct HeimdallSource<H> {
    http: Arc<H>,
    status_url: Url,
    clock: fn() -> DateTime<Utc>,
}

impl<H: HttpClient> HeimdallSource<H> {
    pub fn new(http: Arc<H>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            http,
            status_url: endpoint_url(endpoint, STATUS_PATH)?,
            clock: Utc::now,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn collect(&self) -> Result<HeimdallSyncState> {
        let body = self
            .http
            .get_json(&self.status_url)
            .await
            .map_err(|e| e.context("failed to get heimdall status"))?;
        let response: StatusResponse = serde_json::from_value(body)
            .map_err(|e| SyncCheckError::from(e).context("failed to get heimdall status"))?;
        let info = response.result.sync_info;

        let current_slot = parse_decimal("latest_block_height", &info.latest_block_height)?;
        let latest_block_time = DateTime::parse_from_rfc3339(&info.latest_block_time)
            .map_err(|e| {
                SyncCheckError::Parse(format!(
                    "latest_block_time {:?}: {e}",
                    info.latest_block_time
                ))
            })?
            .with_timezone(&Utc);

        let sync_distance = seconds_since(latest_block_time, (self.clock)());

        trace!(
            current_slot,
            sync_distance,
            is_syncing = info.catching_up,
            "Collected heimdall sync state"
        );

        Ok(HeimdallSyncState {
            current_slot,
            sync_distance,
            is_syncing: info.catching_up,
        })
    }
}

/// Seconds between `then` and `now`, zero if `then` is in the future.
#[allow(clippy::cast_precision_loss)]
fn seconds_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed = (now - then).num_milliseconds().max(0);
    elapsed as f64 / 1000.0
}
