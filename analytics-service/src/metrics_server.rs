//! Prometheus exposition of the service counters and histograms.
//!
//! The recorder is process-global. `/metrics` is always mounted on the API
//! router and can additionally be served on its own listener.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Calls after the first are no-ops.
pub fn install() -> anyhow::Result<()> {
    PROM_HANDLE
        .get_or_try_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))
        })
        .map(|_| ())
}

/// Current exposition text; empty while no recorder is installed.
pub fn render() -> String {
    PROM_HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}

/// `/metrics` route, mergeable into any router regardless of its state.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(|| async { render() }))
}

/// Serve `/metrics` on a dedicated listener at `bind_addr`.
pub fn spawn_listener(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics.bind_addr: {e}"))?;

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                tracing::info!(%addr, "metrics listener started");
                if let Err(e) = axum::serve(listener, routes::<()>().into_make_service()).await {
                    tracing::error!(error = %e, "metrics server error");
                }
            }
            Err(e) => tracing::error!(error = %e, %addr, "failed to bind metrics listener"),
        }
    });

    Ok(())
}
