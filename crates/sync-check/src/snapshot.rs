//! Typed records produced by the source adapters and merged by the collector.

use crate::chain::ChainProfile;

/// Execution-layer view of the local node against the explorer.
///
/// `local_highest_block >= current_block` holds for every constructed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSyncState {
    current_block: u64,
    local_highest_block: u64,
    network_highest_block: u64,
}

impl ExecutionSyncState {
    /// `reported_highest` is `None` when the node reports no sync in progress.
    /// `network_highest_block` is 0 when the explorer was unavailable.
    pub fn new(
        current_block: u64,
        reported_highest: Option<u64>,
        network_highest_block: u64,
    ) -> Self {
        // A node that has just passed its sync target can report a stale
        // highest block below its head.
        let local_highest_block = reported_highest.map_or(current_block, |highest| {
            highest.max(current_block)
        });

        Self {
            current_block,
            local_highest_block,
            network_highest_block,
        }
    }

    pub fn current_block(&self) -> u64 {
        self.current_block
    }

    pub fn local_highest_block(&self) -> u64 {
        self.local_highest_block
    }

    pub fn network_highest_block(&self) -> u64 {
        self.network_highest_block
    }

    pub fn local_lag(&self) -> u64 {
        self.local_highest_block - self.current_block
    }

    /// Zero when the explorer is at or below the local head, including the
    /// unavailable sentinel.
    pub fn network_lag(&self) -> u64 {
        self.network_highest_block.saturating_sub(self.current_block)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconSyncState {
    pub current_slot: u64,
    /// Slots behind the network head.
    pub sync_distance: u64,
    pub is_syncing: bool,
    pub is_optimistic: bool,
    /// Status code of the `/eth/v1/node/health` probe.
    pub health_status: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeimdallSyncState {
    /// Latest Heimdall block height.
    pub current_slot: u64,
    /// Seconds elapsed since the latest block.
    pub sync_distance: f64,
    pub is_syncing: bool,
}

/// Consensus-layer view, tagged by API shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsensusSyncState {
    Beacon(BeaconSyncState),
    Heimdall(HeimdallSyncState),
}

impl ConsensusSyncState {
    pub fn current_slot(&self) -> u64 {
        match self {
            Self::Beacon(state) => state.current_slot,
            Self::Heimdall(state) => state.current_slot,
        }
    }

    pub fn is_syncing(&self) -> bool {
        match self {
            Self::Beacon(state) => state.is_syncing,
            Self::Heimdall(state) => state.is_syncing,
        }
    }

    /// Sync distance as a gauge value: slots on beacon chains, seconds on
    /// Heimdall chains.
    #[allow(clippy::cast_precision_loss)]
    pub fn sync_distance_value(&self) -> f64 {
        match self {
            Self::Beacon(state) => state.sync_distance as f64,
            Self::Heimdall(state) => state.sync_distance,
        }
    }
}

/// One reconciled collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSnapshot {
    pub profile: ChainProfile,
    pub execution: ExecutionSyncState,
    pub consensus: ConsensusSyncState,
}
