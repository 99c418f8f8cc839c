//! Query gateway binary.
//!
//! Exposes the ledger's query subsystem over HTTP:
//!
//! - `GET /health`
//! - `POST /queries/json`
//! - `POST /queries/binary`
//! - `GET /metrics`
//!
//! Unlike the teacher's `api-gateway`, this gateway never mutates ledger
//! state: there is no transaction pool and no block producer loop, since
//! mutation of ledger state is out of scope. The block store and state
//! view are rebuilt once at startup; `ledger-node` and `ledger-cli` are
//! the processes that see newly appended blocks.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::signal;

use ledger::config::LedgerConfig;
use ledger::metrics::MetricsRegistry;
use ledger::query::InMemoryStateView;
use ledger::store::{BlockStore, FlatFileBlockStore};

use config::GatewayConfig;
use routes::{health, metrics as metrics_route, query};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "query_gateway=info,ledger=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let gateway_cfg = GatewayConfig::default();
    let ledger_cfg = LedgerConfig::default();

    let metrics = Arc::new(
        MetricsRegistry::new().map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    let store = FlatFileBlockStore::new(ledger_cfg.storage.path.clone());
    let blocks = store.blocks_from(1).collect::<Result<Vec<_>, _>>().map_err(|e| {
        format!(
            "failed to read block store at {}: {e}",
            ledger_cfg.storage.path.display()
        )
    })?;
    tracing::info!(blocks = blocks.len(), "loaded block store");
    let state_view = InMemoryStateView::from_blocks(&blocks);

    let app_state: SharedState = Arc::new(AppState {
        store,
        state_view,
        metrics,
    });

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/queries/json", post(query::query_json))
        .route("/queries/binary", post(query::query_binary))
        .route("/metrics", get(metrics_route::metrics))
        .with_state(app_state);

    tracing::info!(
        "query gateway listening on http://{}",
        gateway_cfg.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(gateway_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", gateway_cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("gateway server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
