#![doc = include_str!("../README.md")]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod chain;
pub mod cli;
pub mod collector;
pub mod error;
pub mod http;
pub mod runner;
pub mod sinks;
pub mod snapshot;
pub mod sources;
#[cfg(test)]
mod test_utils;

pub use chain::{
    ChainProfile,
    ConsensusKind,
};
pub use collector::{
    Collector,
    CollectorConfig,
};
pub use error::{
    Result,
    SyncCheckError,
};
pub use snapshot::{
    BeaconSyncState,
    ConsensusSyncState,
    ExecutionSyncState,
    HeimdallSyncState,
    SyncSnapshot,
};
