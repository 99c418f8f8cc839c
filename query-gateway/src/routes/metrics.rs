use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::state::SharedState;

/// `GET /metrics`: Prometheus text exposition format.
///
/// Served over the gateway's own listener rather than a dedicated
/// exporter process, so there is only one port to operate.
pub async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    let body = state.metrics.gather_text();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
