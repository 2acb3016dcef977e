//! Execution client adapter.

use super::{
    etherscan::Etherscan,
    with_timeout,
};
use crate::{
    error::{
        Result,
        SyncCheckError,
    },
    http::HttpClient,
    snapshot::ExecutionSyncState,
};
use alloy::{
    providers::{
        Provider,
        ProviderBuilder,
        RootProvider,
    },
    rpc::types::{
        BlockNumberOrTag,
        SyncStatus,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{
    debug,
    info,
    warn,
};

/// Sync progress reported by `eth_syncing` while a sync is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncProgress {
    pub highest_block: u64,
}

/// The subset of the execution JSON-RPC API the collector needs.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Height of the latest header.
    async fn latest_block_number(&self) -> Result<u64>;

    /// `None` when the node reports it is not syncing.
    async fn sync_progress(&self) -> Result<Option<SyncProgress>>;

    async fn chain_id(&self) -> Result<u64>;
}

pub struct AlloyExecutionClient {
    provider: RootProvider,
}

impl AlloyExecutionClient {
    pub fn new(provider: RootProvider) -> Self {
        Self { provider }
    }

    /// Connect over IPC when a path is configured, otherwise (or if dialing
    /// the socket fails) over HTTP.
    pub async fn connect(ipc_path: Option<&str>, http_url: &str) -> Result<Self> {
        if let Some(ipc_path) = ipc_path.filter(|path| !path.is_empty()) {
            match ProviderBuilder::new().connect(ipc_path).await {
                Ok(provider) => {
                    info!(ipc_path, "Connected to execution client over IPC");
                    return Ok(Self::new(provider.root().clone()));
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        ipc_path,
                        http_url,
                        "Failed to connect to IPC, falling back to HTTP"
                    );
                }
            }
        }

        let provider = ProviderBuilder::new()
            .connect(http_url)
            .await
            .map_err(|e| SyncCheckError::from(e).context("failed to connect to execution client"))?;
        info!(http_url, "Connected to execution client over HTTP");

        Ok(Self::new(provider.root().clone()))
    }
}

#[async_trait]
impl ExecutionClient for AlloyExecutionClient {
    async fn latest_block_number(&self) -> Result<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| SyncCheckError::Upstream("latest block not found".to_string()))?;

        Ok(block.header.number)
    }

    async fn sync_progress(&self) -> Result<Option<SyncProgress>> {
        match self.provider.syncing().await? {
            SyncStatus::None => Ok(None),
            SyncStatus::Info(info) => Ok(Some(SyncProgress {
                highest_block: info.highest_block.saturating_to(),
            })),
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }
}

/// Execution-layer half of a collection cycle.
///
/// Each call is bounded by `call_timeout` on its own. Only the execution RPC
/// calls fail the cycle when they expire.
pub struct ExecutionSource<E, H> {
    client: E,
    explorer: Etherscan<H>,
    chain_id: u64,
    call_timeout: Duration,
}

impl<E, H> ExecutionSource<E, H>
where
    E: ExecutionClient,
    H: HttpClient,
{
    pub fn new(client: E, explorer: Etherscan<H>, chain_id: u64, call_timeout: Duration) -> Self {
        Self {
            client,
            explorer,
            chain_id,
            call_timeout,
        }
    }

    pub async fn collect(&self) -> Result<ExecutionSyncState> {
        let current_block =
            with_timeout(self.call_timeout, "request", self.client.latest_block_number())
                .await
                .map_err(|e| e.context("failed to get latest block header"))?;

        let progress = with_timeout(self.call_timeout, "request", self.client.sync_progress())
            .await
            .map_err(|e| e.context("failed to check sync progress"))?;

        let network_highest_block = self.network_highest_block().await;

        Ok(ExecutionSyncState::new(
            current_block,
            progress.map(|p| p.highest_block),
            network_highest_block,
        ))
    }

    /// Explorer height, or the 0 sentinel when the explorer cannot answer.
    async fn network_highest_block(&self) -> u64 {
        let lookup = self.explorer.current_block_number(self.chain_id);
        match with_timeout(self.call_timeout, "explorer request", lookup).await {
            Ok(height) => height,
            Err(e) if e.is_unsupported_chain() => {
                debug!(
                    chain_id = self.chain_id,
                    "Explorer does not support chain, skipping network height"
                );
                0
            }
            Err(e) => {
                warn!(
                    error = %e,
                    chain_id = self.chain_id,
                    "Failed to get network highest block from explorer"
                );
                0
            }
        }
    }
}
