//! Blocks: an ordered, hash-chained batch of transactions.

use serde::{Deserialize, Serialize};

use super::hash::Hash256;
use super::transaction::Transaction;

/// One entry in the append-only chain.
///
/// `height` is 1-indexed and contiguous; `prev_hash` is `Hash256::ZERO` for
/// the genesis block (height 1) and the previous block's `compute_hash`
/// otherwise. Grounded on the teacher's `Block` (same height/prev_hash/txs
/// shape and the same canonical-bytes-then-hash pattern), generalized to
/// this model's transaction type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub height: u32,
    pub prev_hash: Hash256,
    pub txs: Vec<Transaction>,
}

impl Block {
    /// Serializes the block deterministically via `bincode`'s standard
    /// configuration.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .expect("block serialization cannot fail")
    }

    /// BLAKE3-256 hash of [`Block::canonical_bytes`].
    pub fn compute_hash(&self) -> Hash256 {
        Hash256::compute(&self.canonical_bytes())
    }

    /// `true` if this block is a valid direct successor of `prev`: its
    /// height is exactly one greater and its `prev_hash` matches `prev`'s
    /// computed hash.
    pub fn follows(&self, prev: &Block) -> bool {
        self.height == prev.height + 1 && self.prev_hash == prev.compute_hash()
    }

    /// `true` if this is a genesis block: height 1 with an all-zero
    /// `prev_hash`.
    pub fn is_genesis(&self) -> bool {
        self.height == 1 && self.prev_hash.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::AccountId;

    fn genesis() -> Block {
        Block {
            height: 1,
            prev_hash: Hash256::ZERO,
            txs: vec![],
        }
    }

    fn tx(ts: u64) -> Transaction {
        Transaction {
            creator_account_id: AccountId::new("alice@ex").unwrap(),
            created_ts: ts,
            commands: vec![],
            signatures: vec![],
        }
    }

    #[test]
    fn genesis_block_is_identified() {
        assert!(genesis().is_genesis());
    }

    #[test]
    fn hash_is_deterministic_and_sensitive_to_contents() {
        let b1 = genesis();
        let mut b2 = genesis();
        b2.txs.push(tx(1));
        assert_ne!(b1.compute_hash(), b2.compute_hash());
        assert_eq!(b1.compute_hash(), genesis().compute_hash());
    }

    #[test]
    fn follows_checks_height_and_prev_hash() {
        let g = genesis();
        let next = Block {
            height: 2,
            prev_hash: g.compute_hash(),
            txs: vec![tx(1)],
        };
        assert!(next.follows(&g));

        let wrong_height = Block {
            height: 3,
            prev_hash: g.compute_hash(),
            txs: vec![],
        };
        assert!(!wrong_height.follows(&g));

        let wrong_prev = Block {
            height: 2,
            prev_hash: Hash256::compute(b"wrong"),
            txs: vec![],
        };
        assert!(!wrong_prev.follows(&g));
    }
}
