//! The query evaluator: dispatches by variant, and for the two
//! transaction-history variants, walks the block store newest-first under
//! pager control.

use crate::model::{AccountId, AssetId, Hash256, Pager, Query, QueryPayload, Transaction};
use crate::store::{BlockSeq, BlockStore, StoreError};

use super::state_view::{AccountInfo, AssetInfo, StateView};

/// Everything a dispatched query can resolve to.
#[derive(Debug, Clone)]
pub enum QueryResult {
    Account(AccountInfo),
    AccountAssetBalance(u64),
    Signatories(Vec<crate::model::PubKey>),
    Roles(Vec<crate::model::RoleId>),
    RolePermissions(Vec<String>),
    AssetInfo(AssetInfo),
    /// Result of `GetAccountTransactions`/`GetAccountAssetTransactions`:
    /// already-collected rather than lazy, since it crosses the evaluator
    /// boundary back to a transport caller who wants the whole page.
    Transactions(Vec<Transaction>),
    /// The state-view projection had no entry for the requested key.
    NotFound,
}

/// Failure surfaced while evaluating a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    StoreRead(StoreError),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::StoreRead(e) => write!(f, "store read failed: {e}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Walks `store` newest-first (descending height, descending intra-block
/// index), emitting transactions for which `matches` holds, honoring
/// `pager`'s anchor/limit semantics.
///
/// `limit == 0` short-circuits without touching the store. If `pager`'s
/// anchor hash never matches a transaction that also satisfies `matches`,
/// the stream is empty.
fn matching_transactions<'a>(
    store: &'a dyn BlockStore,
    pager: Pager,
    matches: impl Fn(&Transaction) -> bool + 'a,
) -> BlockSeqTx<'a> {
    if pager.limit == 0 {
        return BlockSeqTx {
            blocks: Box::new(std::iter::empty()),
            pending: Vec::new().into_iter(),
            matches: Box::new(matches),
            anchor: pager.tx_hash,
            armed: true,
            remaining: 0,
            done: true,
        };
    }

    let tip = store.tip_height().unwrap_or(0);
    BlockSeqTx {
        blocks: store.top_blocks(tip),
        pending: Vec::new().into_iter(),
        matches: Box::new(matches),
        anchor: pager.tx_hash,
        armed: pager.starts_from_newest(),
        remaining: pager.limit as usize,
        done: false,
    }
}

struct BlockSeqTx<'a> {
    blocks: BlockSeq<'a>,
    pending: std::vec::IntoIter<Transaction>,
    matches: Box<dyn Fn(&Transaction) -> bool + 'a>,
    anchor: Hash256,
    armed: bool,
    remaining: usize,
    done: bool,
}

impl Iterator for BlockSeqTx<'_> {
    type Item = Result<Transaction, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done || self.remaining == 0 {
                return None;
            }
            if let Some(tx) = self.pending.next() {
                if !(self.matches)(&tx) {
                    continue;
                }
                if !self.armed {
                    if tx.compute_hash() == self.anchor {
                        self.armed = true;
                    }
                    continue;
                }
                self.remaining -= 1;
                return Some(Ok(tx));
            }
            match self.blocks.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(block)) => {
                    let mut txs = block.txs;
                    txs.reverse();
                    self.pending = txs.into_iter();
                }
            }
        }
    }
}

/// `GetAccountTransactions(account_id, pager)`: every transaction in
/// which `account_id` is the creator or a command participant.
pub fn get_account_transactions<'a>(
    store: &'a dyn BlockStore,
    account_id: AccountId,
    pager: Pager,
) -> impl Iterator<Item = Result<Transaction, StoreError>> + 'a {
    matching_transactions(store, pager, move |tx| tx.involves_account(&account_id))
}

/// `GetAccountAssetTransactions(account_id, assets_id, pager)`: every
/// transaction containing at least one command asset-related for
/// `account_id` against one of `assets_id`.
pub fn get_account_asset_transactions<'a>(
    store: &'a dyn BlockStore,
    account_id: AccountId,
    assets_id: Vec<AssetId>,
    pager: Pager,
) -> impl Iterator<Item = Result<Transaction, StoreError>> + 'a {
    matching_transactions(store, pager, move |tx| {
        tx.is_asset_related(&account_id, &assets_id)
    })
}

/// Dispatches `query` against `store` (for the two history variants) and
/// `state` (for everything else), collecting any lazy result into a
/// single `QueryResult`.
pub fn evaluate(
    query: &Query,
    store: &dyn BlockStore,
    state: &dyn StateView,
) -> Result<QueryResult, EvalError> {
    match &query.payload {
        QueryPayload::GetAccount { account_id } => Ok(state
            .get_account(account_id)
            .map(QueryResult::Account)
            .unwrap_or(QueryResult::NotFound)),
        QueryPayload::GetAccountAssets {
            account_id,
            asset_id,
        } => Ok(state
            .get_account_asset_balance(account_id, asset_id)
            .map(QueryResult::AccountAssetBalance)
            .unwrap_or(QueryResult::NotFound)),
        QueryPayload::GetSignatories { account_id } => Ok(state
            .get_signatories(account_id)
            .map(QueryResult::Signatories)
            .unwrap_or(QueryResult::NotFound)),
        QueryPayload::GetAccountTransactions { account_id, pager } => {
            let mut txs = Vec::new();
            for item in get_account_transactions(store, account_id.clone(), *pager) {
                txs.push(item.map_err(EvalError::StoreRead)?);
            }
            Ok(QueryResult::Transactions(txs))
        }
        QueryPayload::GetAccountAssetTransactions {
            account_id,
            assets_id,
            pager,
        } => {
            let mut txs = Vec::new();
            for item in
                get_account_asset_transactions(store, account_id.clone(), assets_id.clone(), *pager)
            {
                txs.push(item.map_err(EvalError::StoreRead)?);
            }
            Ok(QueryResult::Transactions(txs))
        }
        QueryPayload::GetRoles => Ok(QueryResult::Roles(state.get_roles())),
        QueryPayload::GetRolePermissions { role_id } => Ok(state
            .get_role_permissions(role_id)
            .map(QueryResult::RolePermissions)
            .unwrap_or(QueryResult::NotFound)),
        QueryPayload::GetAssetInfo { asset_id } => Ok(state
            .get_asset_info(asset_id)
            .map(QueryResult::AssetInfo)
            .unwrap_or(QueryResult::NotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command::TransferAsset;
    use crate::model::{AssetId, Command, Hash256};
    use crate::store::InMemoryBlockStore;

    fn tx(creator: &str, commands: Vec<Command>, ts: u64) -> Transaction {
        Transaction {
            creator_account_id: AccountId::new(creator).unwrap(),
            created_ts: ts,
            commands,
            signatures: vec![],
        }
    }

    fn transfer(src: &str, dst: &str, asset: &str, amount: u64) -> Command {
        Command::TransferAsset(TransferAsset {
            src: AccountId::new(src).unwrap(),
            dst: AccountId::new(dst).unwrap(),
            asset_id: AssetId::new(asset).unwrap(),
            amount,
        })
    }

    /// Three transactions, `t1 < t2 < t3` by creation order, block 1 holds
    /// `t1, t2` and block 2 holds `t3`; all involve `alice@ex`.
    fn scenario_store() -> (InMemoryBlockStore, Vec<Hash256>) {
        let t1 = tx("alice@ex", vec![], 1);
        let t2 = tx("bob@ex", vec![transfer("bob@ex", "alice@ex", "coin#ex", 1)], 2);
        let block1 = crate::model::Block {
            height: 1,
            prev_hash: Hash256::ZERO,
            txs: vec![t1.clone(), t2.clone()],
        };
        let t3 = tx("alice@ex", vec![], 3);
        let block2 = crate::model::Block {
            height: 2,
            prev_hash: block1.compute_hash(),
            txs: vec![t3.clone()],
        };
        let mut store = InMemoryBlockStore::new();
        let hashes = vec![t1.compute_hash(), t2.compute_hash(), t3.compute_hash()];
        store.push(block1);
        store.push(block2);
        (store, hashes)
    }

    #[test]
    fn scenario_d_pager_from_newest_emits_newest_first() {
        let (store, hashes) = scenario_store();
        let account_id = AccountId::new("alice@ex").unwrap();
        let pager = Pager::from_newest(2);
        let out: Vec<Hash256> = get_account_transactions(&store, account_id, pager)
            .map(|r| r.unwrap().compute_hash())
            .collect();
        assert_eq!(out, vec![hashes[2], hashes[1]]);
    }

    #[test]
    fn scenario_e_pager_anchored_resumes_strictly_after() {
        let (store, hashes) = scenario_store();
        let account_id = AccountId::new("alice@ex").unwrap();
        let pager = Pager {
            tx_hash: hashes[2],
            limit: 5,
        };
        let out: Vec<Hash256> = get_account_transactions(&store, account_id, pager)
            .map(|r| r.unwrap().compute_hash())
            .collect();
        assert_eq!(out, vec![hashes[1], hashes[0]]);
    }

    #[test]
    fn scenario_f_asset_filter_matches_only_related_transaction() {
        let t_x = tx(
            "alice@ex",
            vec![transfer("alice@ex", "bob@ex", "coin#d", 1)],
            1,
        );
        let t_y = tx(
            "carol@ex",
            vec![transfer("carol@ex", "dave@ex", "coin#d", 1)],
            2,
        );
        let block = crate::model::Block {
            height: 1,
            prev_hash: Hash256::ZERO,
            txs: vec![t_x.clone(), t_y],
        };
        let mut store = InMemoryBlockStore::new();
        store.push(block);

        let account_id = AccountId::new("alice@ex").unwrap();
        let assets_id = vec![AssetId::new("coin#d").unwrap()];
        let out: Vec<Hash256> =
            get_account_asset_transactions(&store, account_id, assets_id, Pager::from_newest(10))
                .map(|r| r.unwrap().compute_hash())
                .collect();
        assert_eq!(out, vec![t_x.compute_hash()]);
    }

    #[test]
    fn limit_zero_yields_empty_stream_without_consulting_store() {
        let (store, _) = scenario_store();
        let account_id = AccountId::new("alice@ex").unwrap();
        let out: Vec<_> =
            get_account_transactions(&store, account_id, Pager::from_newest(0)).collect();
        assert!(out.is_empty());
    }

    #[test]
    fn anchor_never_found_yields_empty_stream() {
        let (store, _) = scenario_store();
        let account_id = AccountId::new("alice@ex").unwrap();
        let pager = Pager {
            tx_hash: Hash256::compute(b"nonexistent"),
            limit: 10,
        };
        let out: Vec<_> = get_account_transactions(&store, account_id, pager).collect();
        assert!(out.is_empty());
    }

    #[test]
    fn empty_assets_id_matches_nothing() {
        let (store, _) = scenario_store();
        let account_id = AccountId::new("alice@ex").unwrap();
        let out: Vec<_> = get_account_asset_transactions(
            &store,
            account_id,
            vec![],
            Pager::from_newest(10),
        )
        .collect();
        assert!(out.is_empty());
    }
}
