use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use rust_tracing::trace;
use std::sync::Arc;
use sync_check::{
    ChainProfile,
    Collector,
    cli::Args,
    http::ReqwestHttpClient,
    runner,
    sources::execution::{
        AlloyExecutionClient,
        ExecutionClient,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{
    info,
    warn,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Install the shared tracing subscriber used across Credible services.
    let _guard = trace();

    let args = Args::parse();

    let execution =
        AlloyExecutionClient::connect(args.execution_ipc.as_deref(), &args.execution_http)
            .await
            .context("failed to connect to execution client")?;

    let profile = match execution.chain_id().await {
        Ok(chain_id) => ChainProfile::from_chain_id(chain_id),
        Err(e) => {
            warn!(error = %e, "Failed to get chain id");
            ChainProfile::unknown()
        }
    };
    info!(
        chain_id = profile.chain_id(),
        consensus = %profile.consensus_kind(),
        "Detected chain profile"
    );

    let http = Arc::new(
        ReqwestHttpClient::new(args.request_timeout()).context("failed to build HTTP client")?,
    );
    let collector = Collector::new(profile, execution, http, &args.collector_config())
        .context("invalid consensus endpoint")?;

    if !args.daemon {
        return runner::run_once(&collector, &mut std::io::stdout().lock()).await;
    }

    let shutdown = CancellationToken::new();
    let shutdown_on_signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = runner::shutdown_signal().await {
            warn!("Error setting up signal handler: {}", e);
        } else {
            info!("Shutdown signal received, initiating graceful shutdown...");
            shutdown_on_signal.cancel();
        }
    });

    runner::run_daemon(collector, args.metrics_addr(), shutdown).await
}
