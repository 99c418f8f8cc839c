//! The query evaluator and its state-view collaborator.

pub mod evaluator;
pub mod state_view;

pub use evaluator::{evaluate, get_account_asset_transactions, get_account_transactions, EvalError, QueryResult};
pub use state_view::{AccountInfo, AssetInfo, InMemoryStateView, StateView};
