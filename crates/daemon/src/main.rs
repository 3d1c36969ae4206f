// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! abacusd: the Abacus orchestrator daemon.

use abacus_bus::{Bus, InMemoryBus};
use abacus_core::{SystemClock, UuidIdGen};
use abacus_daemon::auth::TokenTable;
use abacus_daemon::{Listener, Settings};
use abacus_engine::Orchestrator;
use abacus_storage::Store;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] abacus_daemon::config::ConfigError),

    #[error("failed to bind RPC port: {0}")]
    Bind(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    info!(port = settings.orchestrator.rpc_port, "starting abacusd");

    let (store, ready) = Store::new();
    let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::new());
    let orchestrator = Arc::new(Orchestrator::new(
        store,
        bus,
        settings.orchestrator.clone(),
        SystemClock,
        Arc::new(UuidIdGen),
    ));

    let shutdown = CancellationToken::new();
    let workers = orchestrator.spawn(ready, shutdown.clone());

    let addr = ("0.0.0.0", settings.orchestrator.rpc_port);
    let tcp = TcpListener::bind(addr).await?;
    info!(addr = %tcp.local_addr()?, "rpc surface listening");

    let listener = Arc::new(Listener::new(
        Arc::clone(&orchestrator),
        Arc::new(TokenTable::new(&settings.auth)),
    ));
    let listener_task = tokio::spawn(listener.run(tcp, shutdown.clone()));

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "shutdown signal listener failed");
    }
    info!("shutting down");
    shutdown.cancel();

    for worker in workers {
        let _ = worker.await;
    }
    let _ = listener_task.await;
    info!("stopped");
    Ok(())
}
