//! Server bootstrap

use std::{future::IntoFuture, sync::Arc};

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use weather_core::{Config, Publisher, TokioScheduler, provider_from_config};

use crate::{routes::create_router, state::AppState};

/// Build the provider and publisher from `config` and serve until Ctrl-C.
///
/// SSE connections never finish on their own, so shutdown drops them instead
/// of waiting for them to drain.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let provider = provider_from_config(&config.provider)?;
    let publisher = Publisher::new(
        Arc::clone(&provider),
        Arc::new(TokioScheduler),
        config.server.refresh_interval(),
    );
    let state = AppState::new(provider, publisher, config.server.default_city.clone());
    let app = create_router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        addr = %listener.local_addr()?,
        default_city = %config.server.default_city,
        interval_secs = config.server.refresh_interval_secs,
        "Weather server listening"
    );

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("HTTP server failed")?;
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received, stopping server");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
