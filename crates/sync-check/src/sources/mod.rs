//! Source adapters. Each turns one network call (or a pair of them) into a
//! typed record or a [`SyncCheckError`].

pub mod beacon;
pub mod etherscan;
pub mod execution;
pub mod heimdall;

use crate::{
    chain::{
        ChainProfile,
        ConsensusKind,
    },
    error::{
        Result,
        SyncCheckError,
    },
    http::HttpClient,
    snapshot::ConsensusSyncState,
};
use beacon::BeaconSource;
use heimdall::HeimdallSource;
use std::{
    future::Future,
    sync::Arc,
    time::Duration,
};

/// Parse a base-10 quantity delivered as a JSON string.
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<u64> {
    // `u64::from_str` tolerates a leading '+'.
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SyncCheckError::Parse(format!(
            "{field} {value:?}: not a decimal number"
        )));
    }

    value
        .parse::<u64>()
        .map_err(|e| SyncCheckError::Parse(format!("{field} {value:?}: {e}")))
}

/// Bound `future` by `timeout`; expiry is a [`SyncCheckError::Connectivity`].
pub(crate) async fn with_timeout<T, F>(timeout: Duration, what: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_elapsed) => Err(SyncCheckError::Connectivity(format!(
            "{what} timed out after {timeout:?}"
        ))),
    }
}

/// Consensus-layer adapter, chosen once from the [`ChainProfile`].
pub enum ConsensusSource<H> {
    Beacon(BeaconSource<H>),
    Heimdall(HeimdallSource<H>),
}

impl<H: HttpClient> ConsensusSource<H> {
    pub fn for_profile(profile: &ChainProfile, endpoint: &str, http: Arc<H>) -> Result<Self> {
        Ok(match profile.consensus_kind() {
            ConsensusKind::Beacon => Self::Beacon(BeaconSource::new(http, endpoint)?),
            ConsensusKind::Heimdall => Self::Heimdall(HeimdallSource::new(http, endpoint)?),
        })
    }

    pub fn kind(&self) -> ConsensusKind {
        match self {
            Self::Beacon(_) => ConsensusKind::Beacon,
            Self::Heimdall(_) => ConsensusKind::Heimdall,
        }
    }

    pub async fn collect(&self) -> Result<ConsensusSyncState> {
        match self {
            Self::Beacon(source) => source.collect().await.map(ConsensusSyncState::Beacon),
            Self::Heimdall(source) => source.collect().await.map(ConsensusSyncState::Heimdall),
        }
    }
}
