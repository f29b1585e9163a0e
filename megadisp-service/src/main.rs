use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use megadisp_client::db::PgTelemetryStore;
use megadisp_service::{config::AppConfig, metrics_server, observability, routes, AppState};
use sqlx::postgres::PgPoolOptions;
use time::UtcOffset;

fn main() -> Result<()> {
    observability::init_tracing();

    // The local offset can only be read while the process is single threaded.
    let utc_offset = UtcOffset::current_local_offset().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "local UTC offset unavailable, stamping readings in UTC");
        UtcOffset::UTC
    });

    let cfg = AppConfig::load()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run(cfg, utc_offset))
}

async fn run(cfg: AppConfig, utc_offset: UtcOffset) -> Result<()> {
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Lazy: an unreachable database shows up per request, not at startup.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_lazy_with(cfg.database.connect_options()?);

    let state = Arc::new(AppState::new(PgTelemetryStore::new(pool), utc_offset));

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .with_context(|| format!("invalid http.bind_addr {}", cfg.http.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, ?utc_offset, "megadisp service listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
