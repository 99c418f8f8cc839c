//! JSON text form: a string-keyed document with a `query_type`
//! discriminator and envelope/payload siblings.
//!
//! Grounded on the original `JsonQueryFactory`: rather than a blind
//! serde-derive tagged enum, fields are pulled out of a `serde_json::Value`
//! by hand so `MalformedJson` (bad shape) and `UnknownQueryType`
//! (unrecognized discriminator) stay distinguishable, and so a missing
//! `signature` object is caught explicitly rather than defaulting away.

use serde_json::{json, Value};

use super::CodecError;
use crate::model::hash::{decode_hex, encode_hex, HASH_LEN, PUBKEY_LEN, SIGNATURE_LEN};
use crate::model::{
    AccountId, AssetId, Hash256, Pager, PubKey, Query, QueryPayload, QuerySignature, RoleId,
    SigBytes,
};

fn get_str<'a>(obj: &'a Value, key: &str) -> Result<&'a str, CodecError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or(CodecError::MalformedJson)
}

fn get_u64(obj: &Value, key: &str) -> Result<u64, CodecError> {
    obj.get(key).and_then(Value::as_u64).ok_or(CodecError::MalformedJson)
}

fn get_account_id(obj: &Value, key: &str) -> Result<AccountId, CodecError> {
    AccountId::new(get_str(obj, key)?).ok_or(CodecError::MalformedJson)
}

fn get_asset_id(obj: &Value, key: &str) -> Result<AssetId, CodecError> {
    AssetId::new(get_str(obj, key)?).ok_or(CodecError::MalformedJson)
}

fn get_role_id(obj: &Value, key: &str) -> Result<RoleId, CodecError> {
    RoleId::new(get_str(obj, key)?).ok_or(CodecError::MalformedJson)
}

fn get_pager(obj: &Value, key: &str) -> Result<Pager, CodecError> {
    let pager_obj = obj.get(key).ok_or(CodecError::MalformedJson)?;
    let tx_hash_str = get_str(pager_obj, "tx_hash")?;
    let tx_hash = decode_hex::<HASH_LEN>(tx_hash_str)
        .map(Hash256)
        .unwrap_or(Hash256::ZERO);
    let limit = get_u64(pager_obj, "limit")? as u32;
    Ok(Pager { tx_hash, limit })
}

fn get_assets_id(obj: &Value, key: &str) -> Result<Vec<AssetId>, CodecError> {
    let arr = obj
        .get(key)
        .and_then(Value::as_array)
        .ok_or(CodecError::MalformedJson)?;
    let mut out = Vec::with_capacity(arr.len());
    for v in arr {
        let s = v.as_str().ok_or(CodecError::MalformedJson)?;
        out.push(AssetId::new(s).ok_or(CodecError::MalformedJson)?);
    }
    Ok(out)
}

/// Encodes a query to its JSON text form.
pub fn encode_json(query: &Query) -> String {
    let mut obj = json!({
        "creator_account_id": query.creator_account_id,
        "created_ts": query.created_ts,
        "query_counter": query.query_counter,
        "signature": {
            "pubkey": encode_hex(query.signature.pubkey.as_bytes()),
            "signature": encode_hex(query.signature.signature.as_bytes()),
        },
    });

    let payload_obj = obj.as_object_mut().expect("json! produces an object");
    payload_obj.insert(
        "query_type".to_string(),
        Value::String(query.payload.variant_name().to_string()),
    );

    match &query.payload {
        QueryPayload::GetAccount { account_id } => {
            payload_obj.insert("account_id".into(), json!(account_id.as_str()));
        }
        QueryPayload::GetAccountAssets {
            account_id,
            asset_id,
        } => {
            payload_obj.insert("account_id".into(), json!(account_id.as_str()));
            payload_obj.insert("asset_id".into(), json!(asset_id.as_str()));
        }
        QueryPayload::GetSignatories { account_id } => {
            payload_obj.insert("account_id".into(), json!(account_id.as_str()));
        }
        QueryPayload::GetAccountTransactions { account_id, pager } => {
            payload_obj.insert("account_id".into(), json!(account_id.as_str()));
            payload_obj.insert(
                "pager".into(),
                json!({"tx_hash": pager.tx_hash.to_hex(), "limit": pager.limit}),
            );
        }
        QueryPayload::GetAccountAssetTransactions {
            account_id,
            assets_id,
            pager,
        } => {
            payload_obj.insert("account_id".into(), json!(account_id.as_str()));
            payload_obj.insert(
                "assets_id".into(),
                Value::Array(
                    assets_id
                        .iter()
                        .map(|a| Value::String(a.as_str().to_string()))
                        .collect(),
                ),
            );
            payload_obj.insert(
                "pager".into(),
                json!({"tx_hash": pager.tx_hash.to_hex(), "limit": pager.limit}),
            );
        }
        QueryPayload::GetRoles => {}
        QueryPayload::GetRolePermissions { role_id } => {
            payload_obj.insert("role_id".into(), json!(role_id.as_str()));
        }
        QueryPayload::GetAssetInfo { asset_id } => {
            payload_obj.insert("asset_id".into(), json!(asset_id.as_str()));
        }
    }

    obj.to_string()
}

/// Decodes a query from its JSON text form.
///
/// Fails with [`CodecError::MalformedJson`] when `query_type` is absent,
/// a required field for that variant is missing or mistyped, or the
/// `signature` object is absent (presence, not validity, is what is
/// checked here). Fails with [`CodecError::UnknownQueryType`] when
/// `query_type` is a string outside the closed set of variant names.
pub fn decode_json(s: &str) -> Result<Query, CodecError> {
    let v: Value = serde_json::from_str(s).map_err(|_| CodecError::MalformedJson)?;
    let obj = v.as_object().ok_or(CodecError::MalformedJson)?;
    let root = Value::Object(obj.clone());

    let sig_obj = obj.get("signature").ok_or(CodecError::MalformedJson)?;
    let pubkey = decode_hex::<PUBKEY_LEN>(get_str(sig_obj, "pubkey")?)
        .map(PubKey)
        .ok_or(CodecError::MalformedJson)?;
    let signature = decode_hex::<SIGNATURE_LEN>(get_str(sig_obj, "signature")?)
        .map(SigBytes)
        .ok_or(CodecError::MalformedJson)?;

    let creator_account_id = get_str(&root, "creator_account_id")?.to_string();
    if !crate::model::ids::is_valid_identifier(&creator_account_id) {
        return Err(CodecError::MalformedJson);
    }
    let created_ts = get_u64(&root, "created_ts")?;
    let query_counter = get_u64(&root, "query_counter")?;

    let query_type = get_str(&root, "query_type")?;

    let mut payload = match query_type {
        "GetAccount" => QueryPayload::GetAccount {
            account_id: get_account_id(&root, "account_id")?,
        },
        "GetAccountAssets" => QueryPayload::GetAccountAssets {
            account_id: get_account_id(&root, "account_id")?,
            asset_id: get_asset_id(&root, "asset_id")?,
        },
        "GetSignatories" => QueryPayload::GetSignatories {
            account_id: get_account_id(&root, "account_id")?,
        },
        "GetAccountTransactions" => QueryPayload::GetAccountTransactions {
            account_id: get_account_id(&root, "account_id")?,
            pager: get_pager(&root, "pager")?,
        },
        "GetAccountAssetTransactions" => QueryPayload::GetAccountAssetTransactions {
            account_id: get_account_id(&root, "account_id")?,
            assets_id: get_assets_id(&root, "assets_id")?,
            pager: get_pager(&root, "pager")?,
        },
        "GetRoles" => QueryPayload::GetRoles,
        "GetRolePermissions" => QueryPayload::GetRolePermissions {
            role_id: get_role_id(&root, "role_id")?,
        },
        "GetAssetInfo" => QueryPayload::GetAssetInfo {
            asset_id: get_asset_id(&root, "asset_id")?,
        },
        _ => return Err(CodecError::UnknownQueryType),
    };
    payload.dedup_assets_id();

    Ok(Query {
        creator_account_id,
        created_ts,
        query_counter,
        payload,
        signature: QuerySignature { pubkey, signature },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = r#"{"signature":{"pubkey":"2323232323232323232323232323232323232323232323232323232323232323","signature":"23232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323"},
 "created_ts":0,"creator_account_id":"123","query_counter":0,
 "query_type":"GetAccount","account_id":"test@test"}"#;

    #[test]
    fn scenario_a_round_trip_of_get_account() {
        let q = decode_json(SCENARIO_A).unwrap();
        assert_eq!(q.creator_account_id.as_str(), "123");
        match &q.payload {
            QueryPayload::GetAccount { account_id } => {
                assert_eq!(account_id.as_str(), "test@test");
            }
            _ => panic!("wrong variant"),
        }
        let re_encoded = encode_json(&q);
        let re_decoded = decode_json(&re_encoded).unwrap();
        assert_eq!(re_decoded.hash(), q.hash());
    }

    #[test]
    fn scenario_b_missing_signature_is_rejected() {
        let json = r#"{"created_ts":0,"creator_account_id":"123","query_counter":0,
 "query_type":"GetAccount","account_id":"test@test"}"#;
        assert_eq!(decode_json(json).unwrap_err(), CodecError::MalformedJson);
    }

    #[test]
    fn scenario_c_unknown_type_is_rejected() {
        let json = SCENARIO_A.replace("GetAccount", "GetSomething");
        assert_eq!(decode_json(&json).unwrap_err(), CodecError::UnknownQueryType);
    }

    #[test]
    fn round_trip_every_variant_preserves_hash() {
        let sig = QuerySignature {
            pubkey: PubKey([3u8; 32]),
            signature: SigBytes([4u8; 64]),
        };
        let variants = vec![
            QueryPayload::GetAccount {
                account_id: AccountId::new("a@d").unwrap(),
            },
            QueryPayload::GetAccountAssets {
                account_id: AccountId::new("a@d").unwrap(),
                asset_id: AssetId::new("c#d").unwrap(),
            },
            QueryPayload::GetSignatories {
                account_id: AccountId::new("a@d").unwrap(),
            },
            QueryPayload::GetAccountTransactions {
                account_id: AccountId::new("a@d").unwrap(),
                pager: Pager::from_newest(5),
            },
            QueryPayload::GetAccountAssetTransactions {
                account_id: AccountId::new("a@d").unwrap(),
                assets_id: vec![AssetId::new("c#d").unwrap(), AssetId::new("e#d").unwrap()],
                pager: Pager::from_newest(5),
            },
            QueryPayload::GetRoles,
            QueryPayload::GetRolePermissions {
                role_id: RoleId::new("admin").unwrap(),
            },
            QueryPayload::GetAssetInfo {
                asset_id: AssetId::new("c#d").unwrap(),
            },
        ];
        for payload in variants {
            let q = Query {
                creator_account_id: "alice@ex".to_string(),
                created_ts: 1,
                query_counter: 2,
                payload,
                signature: sig.clone(),
            };
            let encoded = encode_json(&q);
            let decoded = decode_json(&encoded).unwrap();
            assert_eq!(decoded.hash(), q.hash());
            assert_eq!(decoded.signature.signature, q.signature.signature);
        }
    }

    #[test]
    fn pager_with_empty_tx_hash_means_from_newest() {
        let json = r#"{"signature":{"pubkey":"2323232323232323232323232323232323232323232323232323232323232323","signature":"23232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323232323"},
 "created_ts":0,"creator_account_id":"123","query_counter":0,
 "query_type":"GetAccountTransactions","account_id":"test@test",
 "pager":{"tx_hash":"","limit":3}}"#;
        let q = decode_json(json).unwrap();
        match q.payload {
            QueryPayload::GetAccountTransactions { pager, .. } => {
                assert!(pager.starts_from_newest());
            }
            _ => panic!("wrong variant"),
        }
    }
}
