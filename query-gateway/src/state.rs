//! Shared application state.

use std::sync::Arc;

use ledger::metrics::MetricsRegistry;
use ledger::query::InMemoryStateView;
use ledger::store::FlatFileBlockStore;

/// Shared state held by request handlers.
///
/// The block store and state-view projection are built once at startup
/// and held read-only thereafter: this gateway only serves queries, so
/// nothing here ever mutates.
pub struct AppState {
    pub store: FlatFileBlockStore,
    pub state_view: InMemoryStateView,
    pub metrics: Arc<MetricsRegistry>,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
