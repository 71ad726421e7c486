// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application Instance Manager daemon (aimd)
//!
//! Per-node process that starts, health-probes, registers, and reaps
//! app server instances on behalf of the cluster's control plane.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bootstrap;
mod config;
mod json;
mod logging;
mod respond;
mod routes;
mod wire;

use clap::Parser;
use config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let _log_guard = logging::init(config.log_dir.as_deref())?;

    info!(port = config.port, "starting aimd");

    let context = bootstrap::build(&config).map_err(|error| {
        error!(%error, "failed to build lifecycle context");
        error
    })?;

    let app = routes::router(context);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "aimd listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("aimd stopped");
    Ok(())
}

/// Waits for SIGTERM or SIGINT, whichever arrives first.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut handler) => {
                handler.recv().await;
            }
            Err(error) => {
                error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
