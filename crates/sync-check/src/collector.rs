//! Reconciles the execution and consensus adapters into one [`SyncSnapshot`].
//!
//! The explorer feeding the execution state is the only source allowed to
//! fail without failing the cycle; it degrades to a network height of 0. Any
//! error from the execution client or the consensus client aborts the cycle
//! and no partial snapshot is produced.

use crate::{
    chain::ChainProfile,
    error::Result,
    http::HttpClient,
    snapshot::SyncSnapshot,
    sources::{
        ConsensusSource,
        etherscan::Etherscan,
        execution::{
            ExecutionClient,
            ExecutionSource,
        },
        with_timeout,
    },
};
use std::{
    sync::Arc,
    time::Duration,
};
use tracing::debug;

/// Upper bound for a single adapter call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints and credentials needed to build a [`Collector`].
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub consensus_endpoint: String,
    pub etherscan_api_key: String,
    /// Replaces the per-chain Etherscan backend, used in tests.
    pub etherscan_base_url: Option<String>,
    pub call_timeout: Duration,
}

pub struct Collector<E, H> {
    profile: ChainProfile,
    execution: ExecutionSource<E, H>,
    consensus: ConsensusSource<H>,
    call_timeout: Duration,
}

impl<E, H> Collector<E, H>
where
    E: ExecutionClient,
    H: HttpClient,
{
    pub fn new(
        profile: ChainProfile,
        execution_client: E,
        http: Arc<H>,
        config: &CollectorConfig,
    ) -> Result<Self> {
        let mut explorer = Etherscan::new(http.clone(), config.etherscan_api_key.clone());
        if let Some(base_url) = &config.etherscan_base_url {
            explorer = explorer.with_base_url(base_url.clone());
        }

        let execution = ExecutionSource::new(
            execution_client,
            explorer,
            profile.chain_id(),
            config.call_timeout,
        );
        let consensus = ConsensusSource::for_profile(&profile, &config.consensus_endpoint, http)?;

        debug!(
            chain_id = profile.chain_id(),
            consensus = %consensus.kind(),
            consensus_endpoint = %config.consensus_endpoint,
            "Initialized collector"
        );

        Ok(Self {
            profile,
            execution,
            consensus,
            call_timeout: config.call_timeout,
        })
    }

    pub fn profile(&self) -> &ChainProfile {
        &self.profile
    }

    /// Run one collection cycle: execution first, then consensus.
    pub async fn collect(&self) -> Result<SyncSnapshot> {
        // The execution adapter bounds its own calls so a slow explorer only
        // costs the network height.
        let execution = self.execution.collect().await?;
        let consensus =
            with_timeout(self.call_timeout, "consensus source", self.consensus.collect()).await?;

        debug!(
            current_block = execution.current_block(),
            local_lag = execution.local_lag(),
            network_lag = execution.network_lag(),
            current_slot = consensus.current_slot(),
            sync_distance = consensus.sync_distance_value(),
            consensus_syncing = consensus.is_syncing(),
            "Collected sync snapshot"
        );

        Ok(SyncSnapshot {
            profile: self.profile,
            execution,
            consensus,
        })
    }
}
