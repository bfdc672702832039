// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::handlers::{metrics_handler, SharedState};
use crate::cli::Cli;
use crate::collector::Collector;
use crate::common::config::AppConfig;
use crate::error::{Error, Result};

/// Install the global tracing subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_tracing(log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.unwrap_or(AppConfig::DEFAULT_LOG_FILTER).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the HTTP router around a collector.
pub fn router(collector: SharedState) -> Router {
    Router::new()
        .route(AppConfig::METRICS_PATH, get(metrics_handler))
        .with_state(collector)
        .layer(TraceLayer::new_for_http())
}

/// Run the exporter until Ctrl+C or SIGTERM.
pub async fn run_api_mode(cli: &Cli) -> Result<()> {
    init_tracing(cli.log_level.as_deref());

    let collector = Arc::new(Collector::new(cli.scrape_config()));
    tracing::info!(
        root = %collector.discoverer().root().display(),
        "reading bcachefs accounting from sysfs"
    );
    let app = router(collector);

    let listener = TcpListener::bind(cli.listen).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener on {}: {e}", cli.listen);
        Error::Server(format!("failed to bind {}: {e}", cli.listen))
    })?;
    tracing::info!(
        "API server listening on {}",
        listener.local_addr().unwrap_or(cli.listen)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
