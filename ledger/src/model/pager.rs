//! Pager: anchor and cap for a newest-first transaction stream.

use serde::{Deserialize, Serialize};

use super::hash::Hash256;

/// `{tx_hash, limit}` — the cursor for `GetAccountTransactions` and
/// `GetAccountAssetTransactions`.
///
/// An all-zero `tx_hash` means "start from the newest transaction";
/// otherwise the stream resumes strictly after the transaction with that
/// hash. `limit` caps the emitted count; `limit == 0` yields an empty
/// stream without consulting the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    pub tx_hash: Hash256,
    pub limit: u32,
}

impl Pager {
    /// A pager that starts from the newest transaction.
    pub fn from_newest(limit: u32) -> Self {
        Pager {
            tx_hash: Hash256::ZERO,
            limit,
        }
    }

    /// `true` if this pager should start at the newest matching transaction
    /// rather than resuming after an anchor.
    pub fn starts_from_newest(&self) -> bool {
        self.tx_hash.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hash_means_from_newest() {
        let p = Pager::from_newest(10);
        assert!(p.starts_from_newest());
    }

    #[test]
    fn nonzero_hash_is_not_from_newest() {
        let p = Pager {
            tx_hash: Hash256::compute(b"anchor"),
            limit: 10,
        };
        assert!(!p.starts_from_newest());
    }
}
