//! Command-line configuration for sync-check.

use crate::{
    collector::{
        CollectorConfig,
        DEFAULT_CALL_TIMEOUT,
    },
    http::DEFAULT_REQUEST_TIMEOUT,
};
use clap::Parser;
use std::{
    net::{
        Ipv4Addr,
        SocketAddr,
    },
    time::Duration,
};

/// Runtime configuration flags for sync-check.
///
/// Every parameter is exposed as both a long-form CLI flag and an env var so
/// the daemon can be configured through deployment manifests without shell args.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sync-check",
    author,
    version,
    about = "Sync-check is a tool for checking the synchronization of a blockchain node",
    long_about = None
)]
pub struct Args {
    /// Execution IPC endpoint, preferred over HTTP when set
    #[arg(long, env = "SYNC_CHECK_EXECUTION_IPC")]
    pub execution_ipc: Option<String>,

    /// Execution HTTP endpoint
    #[arg(
        long,
        env = "SYNC_CHECK_EXECUTION_HTTP",
        default_value = "http://localhost:8545"
    )]
    pub execution_http: String,

    /// Consensus HTTP endpoint
    #[arg(
        long,
        env = "SYNC_CHECK_CONSENSUS_HTTP",
        default_value = "http://localhost:5052"
    )]
    pub consensus_http: String,

    /// Etherscan API key
    #[arg(long, env = "SYNC_CHECK_ETHERSCAN_API_KEY", default_value = "")]
    pub etherscan_api_key: String,

    /// Continuously collect and expose metrics via Prometheus
    #[arg(long, env = "SYNC_CHECK_DAEMON")]
    pub daemon: bool,

    /// Prometheus port
    #[arg(long, env = "SYNC_CHECK_METRICS_PORT", default_value = "3737")]
    pub metrics_port: u16,

    /// Timeout applied to every upstream request, in seconds
    #[arg(long, env = "SYNC_CHECK_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,
}

impl Args {
    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.metrics_port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            consensus_endpoint: self.consensus_http.clone(),
            etherscan_api_key: self.etherscan_api_key.clone(),
            etherscan_base_url: None,
            // Leave headroom over the transport timeout so the transport error
            // is the one reported.
            call_timeout: self.request_timeout().max(DEFAULT_CALL_TIMEOUT) + Duration::from_secs(1),
        }
    }
}
