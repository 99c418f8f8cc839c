//! The query model: a closed, tagged enumeration of read requests plus the
//! envelope and signature carried with every one of them.

use serde::{Deserialize, Serialize};

use super::hash::{Hash256, PubKey, SigBytes};
use super::ids::{AccountId, AssetId, RoleId};
use super::pager::Pager;

/// `{pubkey, signature}` attached to a query; verified by the transport
/// layer, never by the evaluator (see [`Query::hash`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuerySignature {
    pub pubkey: PubKey,
    pub signature: SigBytes,
}

/// The closed set of read requests. Adding a variant requires coordinated
/// updates to this enum, both codecs, and the evaluator's dispatch match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryPayload {
    GetAccount {
        account_id: AccountId,
    },
    GetAccountAssets {
        account_id: AccountId,
        asset_id: AssetId,
    },
    GetSignatories {
        account_id: AccountId,
    },
    GetAccountTransactions {
        account_id: AccountId,
        pager: Pager,
    },
    GetAccountAssetTransactions {
        account_id: AccountId,
        assets_id: Vec<AssetId>,
        pager: Pager,
    },
    GetRoles,
    GetRolePermissions {
        role_id: RoleId,
    },
    GetAssetInfo {
        asset_id: AssetId,
    },
}

impl QueryPayload {
    /// The `query_type` discriminator used by the JSON codec; also doubles
    /// as the binary codec's human-readable variant name in logs.
    pub fn variant_name(&self) -> &'static str {
        match self {
            QueryPayload::GetAccount { .. } => "GetAccount",
            QueryPayload::GetAccountAssets { .. } => "GetAccountAssets",
            QueryPayload::GetSignatories { .. } => "GetSignatories",
            QueryPayload::GetAccountTransactions { .. } => "GetAccountTransactions",
            QueryPayload::GetAccountAssetTransactions { .. } => "GetAccountAssetTransactions",
            QueryPayload::GetRoles => "GetRoles",
            QueryPayload::GetRolePermissions { .. } => "GetRolePermissions",
            QueryPayload::GetAssetInfo { .. } => "GetAssetInfo",
        }
    }

    /// Deduplicates `assets_id` on `GetAccountAssetTransactions`; a no-op
    /// on every other variant. Both codecs call this right after decode so
    /// the evaluator never has to consider duplicate entries.
    pub fn dedup_assets_id(&mut self) {
        if let QueryPayload::GetAccountAssetTransactions { assets_id, .. } = self {
            let mut seen = Vec::with_capacity(assets_id.len());
            for id in assets_id.drain(..) {
                if !seen.contains(&id) {
                    seen.push(id);
                }
            }
            *assets_id = seen;
        }
    }
}

/// The subset of `Query` hashed for identity: everything but `signature`.
#[derive(Serialize)]
struct IdentityProjection<'a> {
    creator_account_id: &'a str,
    created_ts: u64,
    query_counter: u64,
    payload: &'a QueryPayload,
}

/// A signed client read request.
///
/// `creator_account_id` is carried as an opaque, printable, bounded-length
/// string rather than the structured [`AccountId`] used elsewhere in the
/// model: the query envelope never required `name@domain` shape on this
/// field, only the payload's own `account_id` fields do.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Query {
    pub creator_account_id: String,
    pub created_ts: u64,
    pub query_counter: u64,
    pub payload: QueryPayload,
    pub signature: QuerySignature,
}

impl Query {
    /// BLAKE3-256 hash over the identity projection: variant tag, payload
    /// fields in declaration order, then the envelope fields. `signature`
    /// is excluded, so re-signing (or re-encoding across codecs) a query
    /// never changes its identity.
    pub fn hash(&self) -> Hash256 {
        let projection = IdentityProjection {
            creator_account_id: &self.creator_account_id,
            created_ts: self.created_ts,
            query_counter: self.query_counter,
            payload: &self.payload,
        };
        let bytes = bincode::serde::encode_to_vec(&projection, bincode::config::standard())
            .expect("query identity projection serialization cannot fail");
        Hash256::compute(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(signature: QuerySignature) -> Query {
        Query {
            creator_account_id: "alice@ex".to_string(),
            created_ts: 0,
            query_counter: 0,
            payload: QueryPayload::GetAccount {
                account_id: AccountId::new("bob@ex").unwrap(),
            },
            signature,
        }
    }

    #[test]
    fn hash_excludes_signature() {
        let q1 = sample(QuerySignature {
            pubkey: PubKey([1u8; 32]),
            signature: SigBytes([2u8; 64]),
        });
        let q2 = sample(QuerySignature {
            pubkey: PubKey([9u8; 32]),
            signature: SigBytes([8u8; 64]),
        });
        assert_eq!(q1.hash(), q2.hash());
    }

    #[test]
    fn hash_sensitive_to_payload() {
        let sig = QuerySignature {
            pubkey: PubKey([1u8; 32]),
            signature: SigBytes([2u8; 64]),
        };
        let mut q1 = sample(sig.clone());
        let mut q2 = sample(sig);
        q2.payload = QueryPayload::GetAccount {
            account_id: AccountId::new("carol@ex").unwrap(),
        };
        assert_ne!(q1.hash(), q2.hash());
        q1.query_counter = 1;
        assert_ne!(q1.hash(), sample_hash_of_counter_zero());
    }

    fn sample_hash_of_counter_zero() -> Hash256 {
        sample(QuerySignature {
            pubkey: PubKey([1u8; 32]),
            signature: SigBytes([2u8; 64]),
        })
        .hash()
    }

    #[test]
    fn variant_name_matches_json_discriminators() {
        assert_eq!(QueryPayload::GetRoles.variant_name(), "GetRoles");
        assert_eq!(
            QueryPayload::GetAssetInfo {
                asset_id: AssetId::new("coin#ex").unwrap()
            }
            .variant_name(),
            "GetAssetInfo"
        );
    }

    #[test]
    fn dedup_assets_id_removes_duplicates_preserving_order() {
        let a = AssetId::new("a#ex").unwrap();
        let b = AssetId::new("b#ex").unwrap();
        let mut payload = QueryPayload::GetAccountAssetTransactions {
            account_id: AccountId::new("alice@ex").unwrap(),
            assets_id: vec![a.clone(), b.clone(), a.clone()],
            pager: Pager::from_newest(10),
        };
        payload.dedup_assets_id();
        if let QueryPayload::GetAccountAssetTransactions { assets_id, .. } = payload {
            assert_eq!(assets_id, vec![a, b]);
        } else {
            panic!("variant changed");
        }
    }

    #[test]
    fn dedup_assets_id_is_noop_on_other_variants() {
        let mut payload = QueryPayload::GetRoles;
        payload.dedup_assets_id();
        assert!(matches!(payload, QueryPayload::GetRoles));
    }
}
