//! Scheduling of collection cycles for the one-shot and daemon modes.
//!
//! Daemon mode runs one cycle at a time on a spawned task and waits a fixed
//! [`COLLECTION_INTERVAL`] after each cycle completes. Failed cycles are logged
//! and the loop continues.

use crate::{
    collector::Collector,
    http::HttpClient,
    sinks::{
        SyncGauges,
        table,
    },
    sources::execution::ExecutionClient,
};
use anyhow::{
    Context,
    Result,
    anyhow,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{
    io::Write,
    net::SocketAddr,
    time::Duration,
};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{
    info,
    warn,
};

/// Delay between the end of one cycle and the start of the next.
pub const COLLECTION_INTERVAL: Duration = Duration::from_secs(2);

/// Run a single cycle and print the snapshot as a table.
pub async fn run_once<E, H, W>(collector: &Collector<E, H>, out: &mut W) -> Result<()>
where
    E: ExecutionClient,
    H: HttpClient,
    W: Write,
{
    let snapshot = collector
        .collect()
        .await
        .context("failed collecting metrics")?;

    table::render(&snapshot, out).context("failed to write sync table")?;
    Ok(())
}

/// Collect forever, publishing each snapshot to `gauges`, until `shutdown` is
/// cancelled.
pub async fn run_collection_loop<E, H>(
    collector: Collector<E, H>,
    gauges: SyncGauges,
    interval: Duration,
    shutdown: CancellationToken,
) where
    E: ExecutionClient,
    H: HttpClient,
{
    loop {
        let outcome = tokio::select! {
            () = shutdown.cancelled() => return,
            outcome = collector.collect() => outcome,
        };

        match outcome {
            Ok(snapshot) => {
                gauges.update(&snapshot);
                gauges.record_collection(true);
            }
            Err(e) => {
                warn!(error = %e, "Encountered error when collecting metrics");
                gauges.record_collection(false);
            }
        }

        tokio::select! {
            () = shutdown.cancelled() => return,
            () = time::sleep(interval) => {}
        }
    }
}

/// Serve `/metrics` on `metrics_addr` and run the collection loop until
/// `shutdown` is cancelled or the exporter stops.
pub async fn run_daemon<E, H>(
    collector: Collector<E, H>,
    metrics_addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()>
where
    E: ExecutionClient + 'static,
    H: HttpClient + 'static,
{
    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .build()
        .context("failed to build prometheus exporter")?;
    let gauges = SyncGauges::register(&recorder, collector.profile());

    info!(%metrics_addr, "Starting prometheus server");
    let mut exporter = tokio::spawn(exporter);
    let mut collection = tokio::spawn(run_collection_loop(
        collector,
        gauges,
        COLLECTION_INTERVAL,
        shutdown.clone(),
    ));

    tokio::select! {
        result = &mut exporter => {
            shutdown.cancel();
            if let Err(e) = collection.await {
                warn!(error = %e, "Collection loop panicked during shutdown");
            }
            match result {
                Ok(Ok(())) => Err(anyhow!("prometheus exporter stopped unexpectedly")),
                Ok(Err(e)) => Err(anyhow!("prometheus exporter failed: {e:?}")),
                Err(e) => Err(e).context("prometheus exporter task panicked"),
            }
        }
        result = &mut collection => {
            exporter.abort();
            result.context("collection loop panicked")?;
            info!("Collection loop stopped");
            Ok(())
        }
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C)
pub async fn shutdown_signal() -> Result<()> {
    use tokio::signal;

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .context("failed to install SIGINT handler")?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .context("failed to listen for ctrl-c")?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
