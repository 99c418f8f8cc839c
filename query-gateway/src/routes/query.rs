//! `POST /queries/json` and `POST /queries/binary`: decode a signed
//! query, evaluate it against the gateway's block store and state view,
//! and return the result.
//!
//! This is a thin HTTP skin over `ledger::query::evaluate`, matching the
//! teacher's `models::register_model` handler shape (extract, translate,
//! respond) rather than introducing a parallel DTO layer for the request
//! side — the request bodies are exactly the wire forms `ledger::codec`
//! already defines.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use ledger::codec::{decode_binary, decode_json, CodecError};
use ledger::crypto::signature::{verify, SignatureError};
use ledger::query::{evaluate, QueryResult};

use crate::state::SharedState;

/// JSON-serializable projection of a [`QueryResult`].
///
/// `QueryResult` itself doesn't derive `Serialize` (it carries a
/// `Transaction`, whose signature bytes have no canonical JSON shape of
/// their own outside the codec), so the gateway maps each variant onto a
/// small response document instead of exposing the internal type
/// directly.
#[derive(Serialize)]
#[serde(tag = "result_type")]
pub enum QueryResponse {
    Account {
        account_id: String,
        roles: Vec<String>,
        signatories: Vec<String>,
    },
    AccountAssetBalance {
        balance: u64,
    },
    Signatories {
        signatories: Vec<String>,
    },
    Roles {
        roles: Vec<String>,
    },
    RolePermissions {
        permissions: Vec<String>,
    },
    AssetInfo {
        asset_id: String,
        precision: u8,
    },
    Transactions {
        hashes: Vec<String>,
    },
    NotFound,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        match result {
            QueryResult::Account(info) => QueryResponse::Account {
                account_id: info.account_id.to_string(),
                roles: info.roles.iter().map(|r| r.to_string()).collect(),
                signatories: info.signatories.iter().map(|k| k.to_hex()).collect(),
            },
            QueryResult::AccountAssetBalance(balance) => {
                QueryResponse::AccountAssetBalance { balance }
            }
            QueryResult::Signatories(keys) => QueryResponse::Signatories {
                signatories: keys.iter().map(|k| k.to_hex()).collect(),
            },
            QueryResult::Roles(roles) => QueryResponse::Roles {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
            QueryResult::RolePermissions(permissions) => {
                QueryResponse::RolePermissions { permissions }
            }
            QueryResult::AssetInfo(info) => QueryResponse::AssetInfo {
                asset_id: info.asset_id.to_string(),
                precision: info.precision,
            },
            QueryResult::Transactions(txs) => QueryResponse::Transactions {
                hashes: txs.iter().map(|t| t.compute_hash().to_hex()).collect(),
            },
            QueryResult::NotFound => QueryResponse::NotFound,
        }
    }
}

/// `POST /queries/json`: body is a JSON-encoded signed query.
pub async fn query_json(
    State(state): State<SharedState>,
    body: String,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    let query = decode_json(&body).map_err(|e| record_decode_failure(&state, "json", e))?;
    verify_signature(&state, &query)?;

    let start = Instant::now();
    let result = evaluate(&query, &state.store, &state.state_view)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    record_success(&state, query.payload.variant_name(), start);

    Ok(Json(result.into()))
}

/// `POST /queries/binary`: body is the binary-wire-encoded signed query.
pub async fn query_binary(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    let query = decode_binary(&body).map_err(|e| record_decode_failure(&state, "binary", e))?;
    verify_signature(&state, &query)?;

    let start = Instant::now();
    let result = evaluate(&query, &state.store, &state.state_view)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    record_success(&state, query.payload.variant_name(), start);

    Ok(Json(result.into()))
}

/// Rejects a query whose signature doesn't verify against its own hash
/// and the pubkey it carries, before the evaluator ever sees it.
fn verify_signature(
    state: &SharedState,
    query: &ledger::model::Query,
) -> Result<(), (StatusCode, String)> {
    verify(&query.hash(), &query.signature.pubkey, &query.signature.signature).map_err(|e| {
        state
            .metrics
            .query
            .decode_failures_total
            .with_label_values(&["signature"])
            .inc();
        let status = match e {
            SignatureError::BadPublicKey => StatusCode::BAD_REQUEST,
            SignatureError::Invalid => StatusCode::UNAUTHORIZED,
        };
        (status, e.to_string())
    })
}

fn record_decode_failure(state: &SharedState, codec: &str, e: CodecError) -> (StatusCode, String) {
    state
        .metrics
        .query
        .decode_failures_total
        .with_label_values(&[codec])
        .inc();
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn record_success(state: &SharedState, variant: &str, start: Instant) {
    state
        .metrics
        .query
        .queries_total
        .with_label_values(&[variant])
        .inc();
    state
        .metrics
        .query
        .eval_seconds
        .observe(start.elapsed().as_secs_f64());
}
