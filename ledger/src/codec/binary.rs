//! Binary wire form: a length-prefixed record with an envelope, a payload
//! whose case identifies the variant, and a top-level signature. Wire
//! fixed-size byte fields (`tx_hash`, `pubkey`, `signature`) travel as hex
//! strings; everything else is the model's own scalar types.
//!
//! Grounded on the original protobuf-era `PbQueryFactory`: the field
//! names below (`creator_account_id`, `created_time`, `query_counter`,
//! per-variant `account_id`/`asset_id`/`role_id`/`assets_id`/`pager`) are
//! carried over unchanged so the wire shape stays recognizable.

use serde::{Deserialize, Serialize};

use super::CodecError;
use crate::model::hash::{decode_hex, encode_hex, HASH_LEN, PUBKEY_LEN, SIGNATURE_LEN};
use crate::model::{AccountId, AssetId, Hash256, Pager, PubKey, Query, QueryPayload, QuerySignature, RoleId, SigBytes};

#[derive(Serialize, Deserialize)]
struct WirePager {
    tx_hash: String,
    limit: u32,
}

#[derive(Serialize, Deserialize)]
enum WirePayload {
    GetAccount {
        account_id: String,
    },
    GetAccountAssets {
        account_id: String,
        asset_id: String,
    },
    GetSignatories {
        account_id: String,
    },
    GetAccountTransactions {
        account_id: String,
        pager: WirePager,
    },
    GetAccountAssetTransactions {
        account_id: String,
        assets_id: Vec<String>,
        pager: WirePager,
    },
    GetRoles,
    GetRolePermissions {
        role_id: String,
    },
    GetAssetInfo {
        asset_id: String,
    },
}

#[derive(Serialize, Deserialize)]
struct WireSignature {
    pubkey: String,
    signature: String,
}

#[derive(Serialize, Deserialize)]
struct WireQuery {
    creator_account_id: String,
    created_time: u64,
    query_counter: u64,
    payload: WirePayload,
    signature: WireSignature,
}

fn to_wire_pager(pager: &Pager) -> WirePager {
    WirePager {
        tx_hash: pager.tx_hash.to_hex(),
        limit: pager.limit,
    }
}

/// Decodes a pager's hex `tx_hash`. Per the documented loose-path
/// behavior, an empty or invalid hex string zero-fills `tx_hash` rather
/// than failing decode: the pager silently becomes "from newest".
fn from_wire_pager(wire: WirePager) -> Pager {
    let tx_hash = decode_hex::<HASH_LEN>(&wire.tx_hash)
        .map(Hash256)
        .unwrap_or(Hash256::ZERO);
    Pager {
        tx_hash,
        limit: wire.limit,
    }
}

fn to_wire_payload(payload: &QueryPayload) -> WirePayload {
    match payload {
        QueryPayload::GetAccount { account_id } => WirePayload::GetAccount {
            account_id: account_id.as_str().to_string(),
        },
        QueryPayload::GetAccountAssets {
            account_id,
            asset_id,
        } => WirePayload::GetAccountAssets {
            account_id: account_id.as_str().to_string(),
            asset_id: asset_id.as_str().to_string(),
        },
        QueryPayload::GetSignatories { account_id } => WirePayload::GetSignatories {
            account_id: account_id.as_str().to_string(),
        },
        QueryPayload::GetAccountTransactions { account_id, pager } => {
            WirePayload::GetAccountTransactions {
                account_id: account_id.as_str().to_string(),
                pager: to_wire_pager(pager),
            }
        }
        QueryPayload::GetAccountAssetTransactions {
            account_id,
            assets_id,
            pager,
        } => WirePayload::GetAccountAssetTransactions {
            account_id: account_id.as_str().to_string(),
            assets_id: assets_id.iter().map(|a| a.as_str().to_string()).collect(),
            pager: to_wire_pager(pager),
        },
        QueryPayload::GetRoles => WirePayload::GetRoles,
        QueryPayload::GetRolePermissions { role_id } => WirePayload::GetRolePermissions {
            role_id: role_id.as_str().to_string(),
        },
        QueryPayload::GetAssetInfo { asset_id } => WirePayload::GetAssetInfo {
            asset_id: asset_id.as_str().to_string(),
        },
    }
}

fn from_wire_payload(wire: WirePayload) -> Result<QueryPayload, CodecError> {
    let payload = match wire {
        WirePayload::GetAccount { account_id } => QueryPayload::GetAccount {
            account_id: AccountId::new(account_id).ok_or(CodecError::MalformedWire)?,
        },
        WirePayload::GetAccountAssets {
            account_id,
            asset_id,
        } => QueryPayload::GetAccountAssets {
            account_id: AccountId::new(account_id).ok_or(CodecError::MalformedWire)?,
            asset_id: AssetId::new(asset_id).ok_or(CodecError::MalformedWire)?,
        },
        WirePayload::GetSignatories { account_id } => QueryPayload::GetSignatories {
            account_id: AccountId::new(account_id).ok_or(CodecError::MalformedWire)?,
        },
        WirePayload::GetAccountTransactions { account_id, pager } => {
            QueryPayload::GetAccountTransactions {
                account_id: AccountId::new(account_id).ok_or(CodecError::MalformedWire)?,
                pager: from_wire_pager(pager),
            }
        }
        WirePayload::GetAccountAssetTransactions {
            account_id,
            assets_id,
            pager,
        } => {
            let mut ids = Vec::with_capacity(assets_id.len());
            for raw in assets_id {
                ids.push(AssetId::new(raw).ok_or(CodecError::MalformedWire)?);
            }
            let mut payload = QueryPayload::GetAccountAssetTransactions {
                account_id: AccountId::new(account_id).ok_or(CodecError::MalformedWire)?,
                assets_id: ids,
                pager: from_wire_pager(pager),
            };
            payload.dedup_assets_id();
            payload
        }
        WirePayload::GetRoles => QueryPayload::GetRoles,
        WirePayload::GetRolePermissions { role_id } => QueryPayload::GetRolePermissions {
            role_id: RoleId::new(role_id).ok_or(CodecError::MalformedWire)?,
        },
        WirePayload::GetAssetInfo { asset_id } => QueryPayload::GetAssetInfo {
            asset_id: AssetId::new(asset_id).ok_or(CodecError::MalformedWire)?,
        },
    };
    Ok(payload)
}

/// Encodes a query to its binary wire form. Total on any well-formed
/// model value.
pub fn encode_binary(query: &Query) -> Vec<u8> {
    let wire = WireQuery {
        creator_account_id: query.creator_account_id.clone(),
        created_time: query.created_ts,
        query_counter: query.query_counter,
        payload: to_wire_payload(&query.payload),
        signature: WireSignature {
            pubkey: encode_hex(query.signature.pubkey.as_bytes()),
            signature: encode_hex(query.signature.signature.as_bytes()),
        },
    };
    bincode::serde::encode_to_vec(&wire, bincode::config::standard())
        .expect("wire query serialization cannot fail")
}

/// Decodes a query from its binary wire form.
///
/// Fails with [`CodecError::MalformedWire`] when the variant tag is
/// unknown, a required field is absent, a fixed-size byte array has the
/// wrong length, or a hex-encoded field (other than the pager's
/// `tx_hash`, which has its own loose-path fallback) does not decode.
pub fn decode_binary(bytes: &[u8]) -> Result<Query, CodecError> {
    let (wire, _): (WireQuery, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|_| CodecError::MalformedWire)?;

    let pubkey = decode_hex::<PUBKEY_LEN>(&wire.signature.pubkey)
        .map(PubKey)
        .ok_or(CodecError::MalformedWire)?;
    let signature = decode_hex::<SIGNATURE_LEN>(&wire.signature.signature)
        .map(SigBytes)
        .ok_or(CodecError::MalformedWire)?;

    if !crate::model::ids::is_valid_identifier(&wire.creator_account_id) {
        return Err(CodecError::MalformedWire);
    }
    let creator_account_id = wire.creator_account_id;
    let payload = from_wire_payload(wire.payload)?;

    Ok(Query {
        creator_account_id,
        created_ts: wire.created_time,
        query_counter: wire.query_counter,
        payload,
        signature: QuerySignature { pubkey, signature },
    })
}
