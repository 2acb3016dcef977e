//! Error taxonomy shared by every source adapter.
//!
//! Only [`SyncCheckError::UnsupportedChain`] is recoverable within a cycle. The
//! remaining kinds abort the cycle and are surfaced to the scheduler.

use alloy::transports::{
    RpcError,
    TransportError,
};

pub type Result<T, E = SyncCheckError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SyncCheckError {
    /// Dial, transport or timeout failure while talking to a source.
    #[error("connectivity error: {0}")]
    Connectivity(String),
    /// The source answered but the body or one of its fields was malformed.
    #[error("parse error: {0}")]
    Parse(String),
    /// The block explorer has no backend for this chain.
    #[error("unsupported chainID: {0}")]
    UnsupportedChain(u64),
    /// Non-2xx status or an error-shaped body from the source.
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SyncCheckError {
    /// Prefix the message with what the adapter was doing when it failed.
    #[must_use]
    pub fn context(self, what: &str) -> Self {
        match self {
            Self::Connectivity(msg) => Self::Connectivity(format!("{what}: {msg}")),
            Self::Parse(msg) => Self::Parse(format!("{what}: {msg}")),
            Self::Upstream(msg) => Self::Upstream(format!("{what}: {msg}")),
            other => other,
        }
    }

    pub fn is_unsupported_chain(&self) -> bool {
        matches!(self, Self::UnsupportedChain(_))
    }
}

impl From<reqwest::Error> for SyncCheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else if err.is_status() {
            Self::Upstream(err.to_string())
        } else {
            Self::Connectivity(err.to_string())
        }
    }
}

impl From<TransportError> for SyncCheckError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                Self::Upstream(format!("code {}: {}", payload.code, payload.message))
            }
            RpcError::DeserError { err, .. } => Self::Parse(err.to_string()),
            RpcError::NullResp => Self::Parse("null response".to_string()),
            other => Self::Connectivity(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
