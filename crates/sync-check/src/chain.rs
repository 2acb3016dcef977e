//! Per-run chain classification.

use std::fmt;

/// Polygon PoS mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;
/// Polygon Mumbai testnet.
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// Shape of the consensus client API exposed by the local node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusKind {
    /// Ethereum beacon node API, sync distance in slots.
    Beacon,
    /// Heimdall/Tendermint status API, sync distance in seconds.
    Heimdall,
}

impl fmt::Display for ConsensusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beacon => f.write_str("beacon"),
            Self::Heimdall => f.write_str("heimdall"),
        }
    }
}

/// Immutable classification of the chain, derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainProfile {
    chain_id: u64,
    consensus: ConsensusKind,
}

impl ChainProfile {
    pub fn from_chain_id(chain_id: u64) -> Self {
        let consensus = match chain_id {
            POLYGON_CHAIN_ID | MUMBAI_CHAIN_ID => ConsensusKind::Heimdall,
            _ => ConsensusKind::Beacon,
        };

        Self {
            chain_id,
            consensus,
        }
    }

    /// Profile used when the chain id lookup failed. Chain id 0 is not served
    /// by any explorer backend, so the network height degrades to the sentinel.
    pub fn unknown() -> Self {
        Self::from_chain_id(0)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn consensus_kind(&self) -> ConsensusKind {
        self.consensus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_chains_use_heimdall() {
        for chain_id in [POLYGON_CHAIN_ID, MUMBAI_CHAIN_ID] {
            assert_eq!(
                ChainProfile::from_chain_id(chain_id).consensus_kind(),
                ConsensusKind::Heimdall
            );
        }
    }

    #[test]
    fn other_chains_use_beacon() {
        for chain_id in [1, 5, 11_155_111, 10, 999] {
            let profile = ChainProfile::from_chain_id(chain_id);
            assert_eq!(profile.consensus_kind(), ConsensusKind::Beacon);
            assert_eq!(profile.chain_id(), chain_id);
        }
    }

    #[test]
    fn unknown_chain_is_standard() {
        let profile = ChainProfile::unknown();
        assert_eq!(profile.chain_id(), 0);
        assert_eq!(profile.consensus_kind(), ConsensusKind::Beacon);
    }
}
