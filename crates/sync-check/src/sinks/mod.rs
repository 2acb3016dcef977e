//! Consumers of a [`SyncSnapshot`](crate::snapshot::SyncSnapshot): a table
//! for one-shot runs and gauges for daemon mode.

pub mod gauges;
pub mod table;

pub use gauges::SyncGauges;
