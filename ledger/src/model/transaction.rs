//! Transactions: a creator-signed bundle of commands.

use serde::{Deserialize, Serialize};

use super::command::Command;
use super::hash::{Hash256, PubKey, SigBytes};
use super::ids::AccountId;

/// One signature over a transaction's canonical bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxSignature {
    pub pubkey: PubKey,
    pub signature: SigBytes,
}

/// A creator-signed bundle of commands.
///
/// `compute_hash` is the transaction's identity throughout the rest of the
/// crate (pagination anchors, fork-choice-free block inclusion, query
/// results); it is computed over everything except `signatures`, so a
/// transaction's hash is stable regardless of how many signatures have
/// been collected for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub creator_account_id: AccountId,
    pub created_ts: u64,
    pub commands: Vec<Command>,
    pub signatures: Vec<TxSignature>,
}

/// The subset of `Transaction` that is hashed and signed; `signatures` is
/// deliberately excluded.
#[derive(Serialize)]
struct SignedPayload<'a> {
    creator_account_id: &'a AccountId,
    created_ts: u64,
    commands: &'a [Command],
}

impl Transaction {
    /// Serializes the signed payload deterministically via `bincode`'s
    /// standard configuration.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let payload = SignedPayload {
            creator_account_id: &self.creator_account_id,
            created_ts: self.created_ts,
            commands: &self.commands,
        };
        bincode::serde::encode_to_vec(&payload, bincode::config::standard())
            .expect("transaction payload serialization cannot fail")
    }

    /// BLAKE3-256 hash of [`Transaction::canonical_bytes`].
    pub fn compute_hash(&self) -> Hash256 {
        Hash256::compute(&self.canonical_bytes())
    }

    /// `true` if `account_id` created this transaction or appears as a
    /// participant in any of its commands.
    pub fn involves_account(&self, account_id: &AccountId) -> bool {
        if self.creator_account_id == *account_id {
            return true;
        }
        self.commands
            .iter()
            .any(|cmd| cmd.participant_accounts().contains(&account_id))
    }

    /// `true` if any command in this transaction is asset-related for
    /// `account_id` against one of `assets_id`.
    pub fn is_asset_related(&self, account_id: &AccountId, assets_id: &[super::ids::AssetId]) -> bool {
        self.commands
            .iter()
            .any(|cmd| cmd.is_asset_related(account_id, assets_id))
    }
}
