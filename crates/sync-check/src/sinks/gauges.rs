//! Prometheus gauges updated from each snapshot in daemon mode.
//!
//! ## Metrics recorded
//!
//! ### Gauges (latest snapshot)
//! - `sync_execution_current_block`: Current block number in the execution node
//! - `sync_execution_local_highest_block`: Highest block known to the execution node
//! - `sync_execution_network_highest_block`: Highest block reported by the explorer, 0 if unavailable
//! - `sync_execution_local_diff`: Local highest block minus current block
//! - `sync_execution_network_diff`: Explorer block minus current block, floored at 0
//! - `sync_consensus_current_slot`: Head slot (Heimdall: latest block height)
//! - `sync_consensus_sync_distance`: Slots behind head (Heimdall: seconds since latest block)
//!
//! ### Counters
//! - `sync_check_collections_total{status}`: Collection cycles by outcome
//!
//! Consensus booleans and the health status are shown by the table sink only.

#![allow(clippy::cast_precision_loss)]

use crate::{
    chain::{
        ChainProfile,
        ConsensusKind,
    },
    snapshot::SyncSnapshot,
};
use metrics::{
    Counter,
    Gauge,
    Recorder,
    Unit,
    counter,
    describe_counter,
    describe_gauge,
    gauge,
};

/// Handles to the pre-declared gauges of one recorder.
///
/// Handles are atomics shared with the recorder, so a scrape running
/// concurrently with [`SyncGauges::update`] observes the last write.
#[derive(Clone)]
pub struct SyncGauges {
    execution_current_block: Gauge,
    execution_local_highest_block: Gauge,
    execution_network_highest_block: Gauge,
    execution_local_diff: Gauge,
    execution_network_diff: Gauge,
    consensus_current_slot: Gauge,
    consensus_sync_distance: Gauge,
    collections_succeeded: Counter,
    collections_failed: Counter,
}

impl SyncGauges {
    /// Declare every gauge against `recorder`. The global recorder is never
    /// touched.
    pub fn register(recorder: &dyn Recorder, profile: &ChainProfile) -> Self {
        metrics::with_local_recorder(recorder, || {
            describe_gauge!(
                "sync_execution_current_block",
                "Current block number in the execution node"
            );
            describe_gauge!(
                "sync_execution_local_highest_block",
                "Local highest block number in the execution node"
            );
            describe_gauge!(
                "sync_execution_network_highest_block",
                "Network highest block number according to the block explorer"
            );
            describe_gauge!(
                "sync_execution_local_diff",
                "Difference between current block vs node's highest known block"
            );
            describe_gauge!(
                "sync_execution_network_diff",
                "Difference between current block and the block explorer's block"
            );
            describe_gauge!(
                "sync_consensus_current_slot",
                "Current slot number in the consensus node"
            );
            match profile.consensus_kind() {
                ConsensusKind::Beacon => describe_gauge!(
                    "sync_consensus_sync_distance",
                    "Sync distance in the consensus node, in slots"
                ),
                ConsensusKind::Heimdall => describe_gauge!(
                    "sync_consensus_sync_distance",
                    Unit::Seconds,
                    "Sync distance in the consensus node, in seconds since the latest block"
                ),
            }
            describe_counter!(
                "sync_check_collections_total",
                "Number of collection cycles by outcome"
            );

            Self {
                execution_current_block: gauge!("sync_execution_current_block"),
                execution_local_highest_block: gauge!("sync_execution_local_highest_block"),
                execution_network_highest_block: gauge!("sync_execution_network_highest_block"),
                execution_local_diff: gauge!("sync_execution_local_diff"),
                execution_network_diff: gauge!("sync_execution_network_diff"),
                consensus_current_slot: gauge!("sync_consensus_current_slot"),
                consensus_sync_distance: gauge!("sync_consensus_sync_distance"),
                collections_succeeded: counter!("sync_check_collections_total", "status" => "success"),
                collections_failed: counter!("sync_check_collections_total", "status" => "failure"),
            }
        })
    }

    pub fn update(&self, snapshot: &SyncSnapshot) {
        let execution = &snapshot.execution;
        self.execution_current_block
            .set(execution.current_block() as f64);
        self.execution_local_highest_block
            .set(execution.local_highest_block() as f64);
        self.execution_network_highest_block
            .set(execution.network_highest_block() as f64);
        self.execution_local_diff.set(execution.local_lag() as f64);
        self.execution_network_diff
            .set(execution.network_lag() as f64);

        let consensus = &snapshot.consensus;
        self.consensus_current_slot
            .set(consensus.current_slot() as f64);
        self.consensus_sync_distance
            .set(consensus.sync_distance_value());
    }

    pub fn record_collection(&self, succeeded: bool) {
        if succeeded {
            self.collections_succeeded.increment(1);
        } else {
            self.collections_failed.increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{
        BeaconSyncState,
        ConsensusSyncState,
        ExecutionSyncState,
        HeimdallSyncState,
    };
    use metrics_util::{
        MetricKind,
        debugging::{
            DebugValue,
            DebuggingRecorder,
        },
    };
    use std::collections::BTreeMap;

    fn gauge_values(recorder: &DebuggingRecorder) -> BTreeMap<String, f64> {
        recorder
            .snapshotter()
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(composite_key, _, _, value)| {
                match (composite_key.kind(), value) {
                    (MetricKind::Gauge, DebugValue::Gauge(value)) => {
                        Some((composite_key.key().name().to_string(), value.into_inner()))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn beacon_snapshot_sets_every_gauge() {
        let recorder = DebuggingRecorder::new();
        let profile = ChainProfile::from_chain_id(1);
        let gauges = SyncGauges::register(&recorder, &profile);

        gauges.update(&SyncSnapshot {
            profile,
            execution: ExecutionSyncState::new(100, Some(150), 170),
            consensus: ConsensusSyncState::Beacon(BeaconSyncState {
                current_slot: 123,
                sync_distance: 4,
                is_syncing: true,
                is_optimistic: true,
                health_status: 206,
            }),
        });

        let expected: BTreeMap<String, f64> = [
            ("sync_execution_current_block", 100.0),
            ("sync_execution_local_highest_block", 150.0),
            ("sync_execution_network_highest_block", 170.0),
            ("sync_execution_local_diff", 50.0),
            ("sync_execution_network_diff", 70.0),
            ("sync_consensus_current_slot", 123.0),
            ("sync_consensus_sync_distance", 4.0),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        // Exactly the seven numeric gauges: no booleans, no health status.
        assert_eq!(gauge_values(&recorder), expected);
    }

    #[test]
    fn heimdall_sync_distance_is_seconds() {
        let recorder = DebuggingRecorder::new();
        let profile = ChainProfile::from_chain_id(137);
        let gauges = SyncGauges::register(&recorder, &profile);

        gauges.update(&SyncSnapshot {
            profile,
            execution: ExecutionSyncState::new(10, None, 0),
            consensus: ConsensusSyncState::Heimdall(HeimdallSyncState {
                current_slot: 42,
                sync_distance: 3.5,
                is_syncing: false,
            }),
        });

        let values = gauge_values(&recorder);
        assert_eq!(values["sync_consensus_sync_distance"], 3.5);
        assert_eq!(values["sync_execution_network_highest_block"], 0.0);
        assert_eq!(values["sync_execution_network_diff"], 0.0);
    }

    #[test]
    fn later_update_overwrites_earlier_one() {
        let recorder = DebuggingRecorder::new();
        let profile = ChainProfile::from_chain_id(1);
        let gauges = SyncGauges::register(&recorder, &profile);

        let snapshot = |current| SyncSnapshot {
            profile,
            execution: ExecutionSyncState::new(current, None, 0),
            consensus: ConsensusSyncState::Beacon(BeaconSyncState {
                current_slot: current,
                sync_distance: 0,
                is_syncing: false,
                is_optimistic: false,
                health_status: 200,
            }),
        };
        gauges.update(&snapshot(1));
        gauges.update(&snapshot(2));

        assert_eq!(gauge_values(&recorder)["sync_execution_current_block"], 2.0);
    }

    #[test]
    fn collections_are_counted_by_status() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let gauges = SyncGauges::register(&recorder, &ChainProfile::from_chain_id(1));

        gauges.record_collection(true);
        gauges.record_collection(true);
        gauges.record_collection(false);

        let counters: BTreeMap<String, u64> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(composite_key, _, _, value)| match value {
                DebugValue::Counter(count) => {
                    let status = composite_key
                        .key()
                        .labels()
                        .find(|label| label.key() == "status")?
                        .value()
                        .to_string();
                    Some((status, count))
                }
                _ => None,
            })
            .collect();

        assert_eq!(counters["success"], 2);
        assert_eq!(counters["failure"], 1);
    }
}
