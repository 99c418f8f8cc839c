//! Commands: the individual operations bundled inside a [`super::transaction::Transaction`].
//!
//! Only `TransferAsset`, `AddAssetQuantity`, and `SubtractAssetQuantity` are
//! "asset-related" for the purposes of `GetAccountAssetTransactions` (see
//! [`Command::is_asset_related`]); the rest exist so `GetAccountTransactions`
//! has non-asset activity to traverse too.

use serde::{Deserialize, Serialize};

use super::ids::{AccountId, AssetId, RoleId};

/// Moves `amount` of `asset_id` from `src` to `dst`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferAsset {
    pub src: AccountId,
    pub dst: AccountId,
    pub asset_id: AssetId,
    pub amount: u64,
}

/// Credits `amount` of `asset_id` to `account_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddAssetQuantity {
    pub account_id: AccountId,
    pub asset_id: AssetId,
    pub amount: u64,
}

/// Debits `amount` of `asset_id` from `account_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubtractAssetQuantity {
    pub account_id: AccountId,
    pub asset_id: AssetId,
    pub amount: u64,
}

/// Registers a new account under a domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAccount {
    pub account_id: AccountId,
    pub pubkey: super::hash::PubKey,
}

/// Grants a role to an account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppendRole {
    pub account_id: AccountId,
    pub role_id: RoleId,
}

/// Revokes a role from an account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetachRole {
    pub account_id: AccountId,
    pub role_id: RoleId,
}

/// Registers a new asset under a domain, with a fixed precision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAsset {
    pub asset_id: AssetId,
    pub precision: u8,
}

/// Sets a single key/value detail on an account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetAccountDetail {
    pub account_id: AccountId,
    pub key: String,
    pub value: String,
}

/// Grants a permission string to an account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantPermission {
    pub account_id: AccountId,
    pub permission: String,
}

/// Closed set of commands a transaction can bundle.
///
/// New variants require coordinated updates to every `match` over
/// `Command` in this crate; there is no open-ended runtime registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    TransferAsset(TransferAsset),
    AddAssetQuantity(AddAssetQuantity),
    SubtractAssetQuantity(SubtractAssetQuantity),
    CreateAccount(CreateAccount),
    AppendRole(AppendRole),
    DetachRole(DetachRole),
    CreateAsset(CreateAsset),
    SetAccountDetail(SetAccountDetail),
    GrantPermission(GrantPermission),
}

impl Command {
    /// Returns `true` if this command is asset-related for `account_id`
    /// against any asset in `assets_id`. Only `TransferAsset` (as `src` or
    /// `dst`) and `AddAssetQuantity`/`SubtractAssetQuantity` count. Role
    /// grants and other commands that indirectly affect holdings do not.
    pub fn is_asset_related(&self, account_id: &AccountId, assets_id: &[AssetId]) -> bool {
        match self {
            Command::TransferAsset(c) => {
                (c.src == *account_id || c.dst == *account_id) && assets_id.contains(&c.asset_id)
            }
            Command::AddAssetQuantity(c) => {
                c.account_id == *account_id && assets_id.contains(&c.asset_id)
            }
            Command::SubtractAssetQuantity(c) => {
                c.account_id == *account_id && assets_id.contains(&c.asset_id)
            }
            _ => false,
        }
    }

    /// Returns every account this command references as a subject
    /// (source, destination, or target), used by `GetAccountTransactions`'s
    /// "creator or participant" membership test.
    pub fn participant_accounts(&self) -> Vec<&AccountId> {
        match self {
            Command::TransferAsset(c) => vec![&c.src, &c.dst],
            Command::AddAssetQuantity(c) => vec![&c.account_id],
            Command::SubtractAssetQuantity(c) => vec![&c.account_id],
            Command::CreateAccount(c) => vec![&c.account_id],
            Command::AppendRole(c) => vec![&c.account_id],
            Command::DetachRole(c) => vec![&c.account_id],
            Command::CreateAsset(_) => vec![],
            Command::SetAccountDetail(c) => vec![&c.account_id],
            Command::GrantPermission(c) => vec![&c.account_id],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn asset(s: &str) -> AssetId {
        AssetId::new(s).unwrap()
    }

    #[test]
    fn transfer_is_asset_related_for_src_and_dst() {
        let c = Command::TransferAsset(TransferAsset {
            src: acc("alice@ex"),
            dst: acc("bob@ex"),
            asset_id: asset("coin#d"),
            amount: 1,
        });
        let assets = vec![asset("coin#d")];
        assert!(c.is_asset_related(&acc("alice@ex"), &assets));
        assert!(c.is_asset_related(&acc("bob@ex"), &assets));
        assert!(!c.is_asset_related(&acc("carol@ex"), &assets));
    }

    #[test]
    fn transfer_not_asset_related_for_unlisted_asset() {
        let c = Command::TransferAsset(TransferAsset {
            src: acc("alice@ex"),
            dst: acc("bob@ex"),
            asset_id: asset("coin#d"),
            amount: 1,
        });
        let assets = vec![asset("other#d")];
        assert!(!c.is_asset_related(&acc("alice@ex"), &assets));
    }

    #[test]
    fn role_grant_is_never_asset_related() {
        let c = Command::AppendRole(AppendRole {
            account_id: acc("alice@ex"),
            role_id: RoleId::new("admin").unwrap(),
        });
        assert!(!c.is_asset_related(&acc("alice@ex"), &[asset("coin#d")]));
    }

    #[test]
    fn participant_accounts_covers_transfer_endpoints() {
        let c = Command::TransferAsset(TransferAsset {
            src: acc("alice@ex"),
            dst: acc("bob@ex"),
            asset_id: asset("coin#d"),
            amount: 1,
        });
        let participants = c.participant_accounts();
        assert_eq!(participants, vec![&acc("alice@ex"), &acc("bob@ex")]);
    }
}
