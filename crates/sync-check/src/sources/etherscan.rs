//! Etherscan `eth_blockNumber` proxy, used as the external view of the chain tip.

use crate::{
    error::{
        Result,
        SyncCheckError,
    },
    http::HttpClient,
};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Etherscan backend for the given chain, if one exists.
pub fn explorer_base_url(chain_id: u64) -> Result<&'static str> {
    match chain_id {
        1 => Ok("https://api.etherscan.io"),
        5 => Ok("https://api-goerli.etherscan.io"),
        11_155_111 => Ok("https://api-sepolia.etherscan.io"),
        other => Err(SyncCheckError::UnsupportedChain(other)),
    }
}

/// Parse an Ethereum hex quantity such as `0x12a05f200`.
pub fn parse_hex_quantity(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| SyncCheckError::Parse(format!("missing 0x prefix in {value:?}")))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SyncCheckError::Parse(format!(
            "invalid hex quantity {value:?}"
        )));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| SyncCheckError::Parse(format!("invalid hex quantity {value:?}: {e}")))
}

/// Both the proxy success body (`{"jsonrpc", "id", "result"}`) and the error
/// envelope (`{"status": "0", "message", "result"}`) share this shape.
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: Option<String>,
    message: Option<String>,
    result: Option<String>,
}

pub struct Etherscan<H> {
    http: Arc<H>,
    api_key: String,
    base_url_override: Option<String>,
}

impl<H: HttpClient> Etherscan<H> {
    pub fn new(http: Arc<H>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url_override: None,
        }
    }

    /// Send every supported chain to `base_url` instead of the public backends.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn query_url(&self, chain_id: u64) -> Result<Url> {
        let base = explorer_base_url(chain_id)?;
        let base = self
            .base_url_override
            .as_deref()
            .unwrap_or(base)
            .trim_end_matches('/');

        Ok(Url::parse_with_params(
            &format!("{base}/api"),
            [
                ("module", "proxy"),
                ("action", "eth_blockNumber"),
                ("apikey", self.api_key.as_str()),
            ],
        )?)
    }

    /// Current block number of `chain_id` according to Etherscan.
    pub async fn current_block_number(&self, chain_id: u64) -> Result<u64> {
        let url = self.query_url(chain_id)?;
        let body = self.http.get_json(&url).await?;
        let response: EtherscanResponse = serde_json::from_value(body)?;

        let result = response
            .result
            .ok_or_else(|| SyncCheckError::Parse("missing result field".to_string()))?;

        if !result.starts_with("0x") && response.status.as_deref() == Some("0") {
            let message = response.message.unwrap_or_default();
            return Err(SyncCheckError::Upstream(format!("{message}: {result}")));
        }

        parse_hex_quantity(&result)
    }
}
