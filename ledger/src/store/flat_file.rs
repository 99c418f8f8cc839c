//! Flat-file block store: one JSON document per block, named by height.
//!
//! The reader does not trust file contents — every read validates that
//! the decoded block's own `height` matches the filename before handing
//! it back.

use std::fs;
use std::path::{Path, PathBuf};

use super::{BlockSeq, BlockStore, StoreError};
use crate::model::Block;

/// A directory of `<height>.json` files, one per block.
pub struct FlatFileBlockStore {
    root: PathBuf,
}

impl FlatFileBlockStore {
    /// Opens a flat-file store rooted at `root`. Does not require `root`
    /// to exist yet; an absent or empty directory behaves as an empty
    /// store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FlatFileBlockStore { root: root.into() }
    }

    fn block_path(&self, height: u32) -> PathBuf {
        self.root.join(format!("{height}.json"))
    }

    fn read_block(&self, height: u32) -> Result<Block, StoreError> {
        let path = self.block_path(height);
        let contents = fs::read_to_string(&path).map_err(|_| StoreError::Missing(height))?;
        let block: Block = serde_json::from_str(&contents).map_err(|_| StoreError::Corrupt(height))?;
        if block.height != height {
            return Err(StoreError::Corrupt(height));
        }
        Ok(block)
    }
}

fn height_from_file_name(name: &str) -> Option<u32> {
    name.strip_suffix(".json")?.parse().ok()
}

impl BlockStore for FlatFileBlockStore {
    fn tip_height(&self) -> Option<u32> {
        let entries = fs::read_dir(&self.root).ok()?;
        let mut heights: Vec<u32> = entries
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .filter_map(|name| height_from_file_name(&name))
            .collect();
        heights.sort_unstable();

        let mut tip = None;
        for (idx, height) in heights.iter().enumerate() {
            if *height == idx as u32 + 1 {
                tip = Some(*height);
            } else {
                break;
            }
        }
        tip
    }

    fn blocks(&self, from_height: u32, count: u32) -> BlockSeq<'_> {
        let tip = self.tip_height().unwrap_or(0);
        let end = (from_height.saturating_add(count)).min(tip + 1);
        Box::new(Ascending {
            store: self,
            next: from_height,
            end,
            done: false,
        })
    }

    fn blocks_from(&self, height: u32) -> BlockSeq<'_> {
        let tip = self.tip_height().unwrap_or(0);
        Box::new(Ascending {
            store: self,
            next: height,
            end: tip + 1,
            done: false,
        })
    }

    fn top_blocks(&self, count: u32) -> BlockSeq<'_> {
        let tip = self.tip_height().unwrap_or(0);
        Box::new(Descending {
            store: self,
            next: tip,
            remaining: count,
            done: false,
        })
    }
}

struct Ascending<'a> {
    store: &'a FlatFileBlockStore,
    next: u32,
    end: u32,
    done: bool,
}

impl Iterator for Ascending<'_> {
    type Item = Result<Block, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.end {
            return None;
        }
        let height = self.next;
        self.next += 1;
        match self.store.read_block(height) {
            Ok(block) => Some(Ok(block)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

struct Descending<'a> {
    store: &'a FlatFileBlockStore,
    next: u32,
    remaining: u32,
    done: bool,
}

impl Iterator for Descending<'_> {
    type Item = Result<Block, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == 0 || self.next == 0 {
            return None;
        }
        let height = self.next;
        self.next -= 1;
        self.remaining -= 1;
        match self.store.read_block(height) {
            Ok(block) => Some(Ok(block)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Writes `block` to its canonical path, overwriting any existing file at
/// that height. Used by test setup and by the bootstrap CLI; the core
/// evaluator never writes.
pub fn write_block(root: &Path, block: &Block) -> std::io::Result<()> {
    fs::create_dir_all(root)?;
    let path = root.join(format!("{}.json", block.height));
    let json = serde_json::to_string_pretty(block).expect("block serializes to JSON");
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountId, Hash256, Transaction};
    use tempfile::tempdir;

    fn tx(ts: u64) -> Transaction {
        Transaction {
            creator_account_id: AccountId::new("alice@ex").unwrap(),
            created_ts: ts,
            commands: vec![],
            signatures: vec![],
        }
    }

    fn chain(n: u32) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut prev_hash = Hash256::ZERO;
        for height in 1..=n {
            let block = Block {
                height,
                prev_hash,
                txs: vec![tx(height as u64)],
            };
            prev_hash = block.compute_hash();
            blocks.push(block);
        }
        blocks
    }

    #[test]
    fn empty_store_has_no_tip_and_empty_sequences() {
        let dir = tempdir().unwrap();
        let store = FlatFileBlockStore::new(dir.path());
        assert_eq!(store.tip_height(), None);
        assert_eq!(store.blocks(1, 10).count(), 0);
        assert_eq!(store.top_blocks(10).count(), 0);
    }

    #[test]
    fn tip_height_is_the_longest_contiguous_run_from_one() {
        let dir = tempdir().unwrap();
        for block in chain(3) {
            write_block(dir.path(), &block).unwrap();
        }
        let store = FlatFileBlockStore::new(dir.path());
        assert_eq!(store.tip_height(), Some(3));
    }

    #[test]
    fn blocks_from_height_emits_ascending_to_tip() {
        let dir = tempdir().unwrap();
        for block in chain(5) {
            write_block(dir.path(), &block).unwrap();
        }
        let store = FlatFileBlockStore::new(dir.path());
        let heights: Vec<u32> = store
            .blocks_from(3)
            .map(|r| r.unwrap().height)
            .collect();
        assert_eq!(heights, vec![3, 4, 5]);
    }

    #[test]
    fn blocks_range_truncates_at_end_of_log() {
        let dir = tempdir().unwrap();
        for block in chain(2) {
            write_block(dir.path(), &block).unwrap();
        }
        let store = FlatFileBlockStore::new(dir.path());
        let heights: Vec<u32> = store.blocks(1, 100).map(|r| r.unwrap().height).collect();
        assert_eq!(heights, vec![1, 2]);
    }

    #[test]
    fn top_blocks_emits_descending_newest_first() {
        let dir = tempdir().unwrap();
        for block in chain(4) {
            write_block(dir.path(), &block).unwrap();
        }
        let store = FlatFileBlockStore::new(dir.path());
        let heights: Vec<u32> = store.top_blocks(2).map(|r| r.unwrap().height).collect();
        assert_eq!(heights, vec![4, 3]);
    }

    #[test]
    fn missing_block_terminates_sequence_after_already_emitted_items() {
        let dir = tempdir().unwrap();
        let blocks = chain(3);
        write_block(dir.path(), &blocks[0]).unwrap();
        write_block(dir.path(), &blocks[2]).unwrap();
        let store = FlatFileBlockStore::new(dir.path());
        assert_eq!(store.tip_height(), Some(1));

        let results: Vec<_> = store.blocks(1, 3).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn corrupt_block_file_is_reported_and_halts_stream() {
        let dir = tempdir().unwrap();
        write_block(dir.path(), &chain(1)[0]).unwrap();
        fs::write(dir.path().join("2.json"), "not json").unwrap();
        let store = FlatFileBlockStore::new(dir.path());
        let results: Vec<_> = store.blocks_from(1).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(StoreError::Corrupt(2)));
    }
}
