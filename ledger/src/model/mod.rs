//! The ledger's data model: identifiers, fixed-size byte types, commands,
//! transactions, blocks, and the query model built on top of them.

pub mod block;
pub mod command;
pub mod hash;
pub mod ids;
pub mod pager;
pub mod query;
pub mod transaction;

pub use block::Block;
pub use command::Command;
pub use hash::{Hash256, PubKey, SigBytes};
pub use ids::{AccountId, AssetId, RoleId};
pub use pager::Pager;
pub use query::{Query, QueryPayload, QuerySignature};
pub use transaction::{Transaction, TxSignature};
