//! `StateView`: a synchronous read of current account/asset/role state.
//!
//! The evaluator's only responsibility for the non-history query variants
//! is dispatch and envelope handling; the actual projection is an opaque
//! read capability supplied by this collaborator. [`InMemoryStateView`] is
//! a concrete implementation that replays the block log's commands to
//! build that projection — a reasonable default for a single-node
//! deployment, and useful for tests.

use std::collections::HashMap;

use crate::model::{AccountId, AssetId, Block, Command, PubKey, RoleId};

/// Snapshot of one account: its roles and known signatories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub roles: Vec<RoleId>,
    pub signatories: Vec<PubKey>,
}

/// Snapshot of one registered asset type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetInfo {
    pub asset_id: AssetId,
    pub precision: u8,
}

/// Read-only projection of current ledger state, as consulted by every
/// query variant except the two transaction-history ones.
pub trait StateView {
    fn get_account(&self, account_id: &AccountId) -> Option<AccountInfo>;
    fn get_account_asset_balance(&self, account_id: &AccountId, asset_id: &AssetId) -> Option<u64>;
    fn get_signatories(&self, account_id: &AccountId) -> Option<Vec<PubKey>>;
    fn get_roles(&self) -> Vec<RoleId>;
    fn get_role_permissions(&self, role_id: &RoleId) -> Option<Vec<String>>;
    fn get_asset_info(&self, asset_id: &AssetId) -> Option<AssetInfo>;
}

/// Builds and holds a state projection by replaying every command in a
/// sequence of blocks, in ascending height order.
#[derive(Default)]
pub struct InMemoryStateView {
    accounts: HashMap<AccountId, AccountInfo>,
    assets: HashMap<AssetId, AssetInfo>,
    balances: HashMap<(AccountId, AssetId), u64>,
    role_permissions: HashMap<RoleId, Vec<String>>,
    roles: Vec<RoleId>,
}

impl InMemoryStateView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays every transaction in `blocks` (already in ascending height
    /// order) against a fresh, empty projection.
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        let mut view = Self::new();
        for block in blocks {
            for tx in &block.txs {
                for cmd in &tx.commands {
                    view.apply(cmd);
                }
            }
        }
        view
    }

    fn account_entry(&mut self, account_id: &AccountId) -> &mut AccountInfo {
        self.accounts
            .entry(account_id.clone())
            .or_insert_with(|| AccountInfo {
                account_id: account_id.clone(),
                roles: Vec::new(),
                signatories: Vec::new(),
            })
    }

    fn apply(&mut self, cmd: &Command) {
        match cmd {
            Command::CreateAccount(c) => {
                let entry = self.account_entry(&c.account_id);
                if !entry.signatories.contains(&c.pubkey) {
                    entry.signatories.push(c.pubkey);
                }
            }
            Command::AppendRole(c) => {
                let entry = self.account_entry(&c.account_id);
                if !entry.roles.contains(&c.role_id) {
                    entry.roles.push(c.role_id.clone());
                }
                if !self.roles.contains(&c.role_id) {
                    self.roles.push(c.role_id.clone());
                }
            }
            Command::DetachRole(c) => {
                if let Some(entry) = self.accounts.get_mut(&c.account_id) {
                    entry.roles.retain(|r| *r != c.role_id);
                }
            }
            Command::CreateAsset(c) => {
                self.assets.entry(c.asset_id.clone()).or_insert_with(|| AssetInfo {
                    asset_id: c.asset_id.clone(),
                    precision: c.precision,
                });
            }
            Command::AddAssetQuantity(c) => {
                *self
                    .balances
                    .entry((c.account_id.clone(), c.asset_id.clone()))
                    .or_insert(0) += c.amount;
            }
            Command::SubtractAssetQuantity(c) => {
                let balance = self
                    .balances
                    .entry((c.account_id.clone(), c.asset_id.clone()))
                    .or_insert(0);
                *balance = balance.saturating_sub(c.amount);
            }
            Command::TransferAsset(c) => {
                let src_balance = self
                    .balances
                    .entry((c.src.clone(), c.asset_id.clone()))
                    .or_insert(0);
                *src_balance = src_balance.saturating_sub(c.amount);
                *self
                    .balances
                    .entry((c.dst.clone(), c.asset_id.clone()))
                    .or_insert(0) += c.amount;
            }
            Command::SetAccountDetail(_) | Command::GrantPermission(_) => {}
        }
    }
}

impl StateView for InMemoryStateView {
    fn get_account(&self, account_id: &AccountId) -> Option<AccountInfo> {
        self.accounts.get(account_id).cloned()
    }

    fn get_account_asset_balance(&self, account_id: &AccountId, asset_id: &AssetId) -> Option<u64> {
        self.balances.get(&(account_id.clone(), asset_id.clone())).copied()
    }

    fn get_signatories(&self, account_id: &AccountId) -> Option<Vec<PubKey>> {
        self.accounts.get(account_id).map(|a| a.signatories.clone())
    }

    fn get_roles(&self) -> Vec<RoleId> {
        self.roles.clone()
    }

    fn get_role_permissions(&self, role_id: &RoleId) -> Option<Vec<String>> {
        self.role_permissions.get(role_id).cloned()
    }

    fn get_asset_info(&self, asset_id: &AssetId) -> Option<AssetInfo> {
        self.assets.get(asset_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command::{AddAssetQuantity, AppendRole, CreateAccount, TransferAsset};
    use crate::model::Transaction;

    fn tx(commands: Vec<Command>) -> Transaction {
        Transaction {
            creator_account_id: AccountId::new("alice@ex").unwrap(),
            created_ts: 0,
            commands,
            signatures: vec![],
        }
    }

    #[test]
    fn create_account_and_append_role_are_visible() {
        let block = Block {
            height: 1,
            prev_hash: crate::model::Hash256::ZERO,
            txs: vec![tx(vec![
                Command::CreateAccount(CreateAccount {
                    account_id: AccountId::new("alice@ex").unwrap(),
                    pubkey: PubKey([1u8; 32]),
                }),
                Command::AppendRole(AppendRole {
                    account_id: AccountId::new("alice@ex").unwrap(),
                    role_id: RoleId::new("admin").unwrap(),
                }),
            ])],
        };
        let view = InMemoryStateView::from_blocks(&[block]);
        let info = view.get_account(&AccountId::new("alice@ex").unwrap()).unwrap();
        assert_eq!(info.roles, vec![RoleId::new("admin").unwrap()]);
        assert_eq!(view.get_roles(), vec![RoleId::new("admin").unwrap()]);
    }

    #[test]
    fn asset_quantity_and_transfer_update_balances() {
        let alice = AccountId::new("alice@ex").unwrap();
        let bob = AccountId::new("bob@ex").unwrap();
        let coin = AssetId::new("coin#ex").unwrap();
        let block = Block {
            height: 1,
            prev_hash: crate::model::Hash256::ZERO,
            txs: vec![tx(vec![
                Command::AddAssetQuantity(AddAssetQuantity {
                    account_id: alice.clone(),
                    asset_id: coin.clone(),
                    amount: 10,
                }),
                Command::TransferAsset(TransferAsset {
                    src: alice.clone(),
                    dst: bob.clone(),
                    asset_id: coin.clone(),
                    amount: 4,
                }),
            ])],
        };
        let view = InMemoryStateView::from_blocks(&[block]);
        assert_eq!(view.get_account_asset_balance(&alice, &coin), Some(6));
        assert_eq!(view.get_account_asset_balance(&bob, &coin), Some(4));
    }

    #[test]
    fn unknown_account_yields_none() {
        let view = InMemoryStateView::new();
        assert!(view.get_account(&AccountId::new("ghost@ex").unwrap()).is_none());
    }
}
