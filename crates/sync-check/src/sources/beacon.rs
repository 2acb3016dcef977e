//! Beacon node API adapter for chains with an Ethereum-style consensus client.

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
    snapshot::BeaconSyncState,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::trace;
use url::Url;

const SYNCING_PATH: &str = "/eth/v1/node/syncing";
const HEALTH_PATH: &str = "/eth/v1/node/health";

#[derive(Debug, Deserialize)]
struct SyncingResponse {
    data: SyncingData,
}

/// Slot quantities arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct SyncingData {
    head_slot: String,
    sync_distance: String,
    is_syncing: bool,
    #[serde(default)]
    is_optimistic: bool,
}

pub struct BeaconSource<H> {
    http: Arc<H>,
    syncing_url: Url,
    health_url: Url,
}

impl<H: HttpClient> BeaconSource<H> {
    pub fn new(http: Arc<H>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            http,
            syncing_url: endpoint_url(endpoint, SYNCING_PATH)?,
            health_url: endpoint_url(endpoint, HEALTH_PATH)?,
        })
    }

    pub async fn collect(&self) -> Result<BeaconSyncState> {
        let body = self
            .http
            .get_json(&self.syncing_url)
            .await
            .map_err(|e| e.context("failed to get consensus syncing data"))?;
        let response: SyncingResponse = serde_json::from_value(body).map_err(|e| {
            SyncCheckError::from(e).context("failed to get consensus syncing data")
        })?;
        let data = response.data;

        let current_slot = parse_decimal("head_slot", &data.head_slot)?;
        let sync_distance = parse_decimal("sync_distance", &data.sync_distance)?;

        let health_status = self
            .http
            .get_status_code(&self.health_url)
            .await
            .map_err(|e| e.context("failed to get consensus status"))?;

        trace!(
            current_slot,
            sync_distance,
            health_status,
            is_syncing = data.is_syncing,
            is_optimistic = data.is_optimistic,
            "Collected beacon sync state"
        );

        Ok(BeaconSyncState {
            current_slot,
            sync_distance,
            is_syncing: data.is_syncing,
            is_optimistic: data.is_optimistic,
            health_status,
        })
    }
}
