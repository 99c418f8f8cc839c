//! Node-level configuration.
//!
//! Grounded in the teacher's `ChainConfig`: small sub-configs aggregated
//! into one top-level struct, with hard-coded defaults rather than a
//! config-file loader (the teacher leaves that same gap, deferring it to
//! "later you can load from a file/CLI/env").

use std::path::PathBuf;

/// Flat-file block store location.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: PathBuf::from("./data/blocks"),
        }
    }
}

/// Top-level configuration for a ledger node.
#[derive(Clone, Debug, Default)]
pub struct LedgerConfig {
    pub storage: StorageConfig,
}
