//! In-memory block store, used by evaluator tests and small demos.

use std::collections::HashMap;

use super::{BlockSeq, BlockStore, StoreError};
use crate::model::Block;

/// Keeps every block in memory, keyed by height. Useful for unit tests
/// and benchmarks where spinning up a flat-file directory is overkill.
#[derive(Default)]
pub struct InMemoryBlockStore {
    blocks: HashMap<u32, Block>,
    tip: Option<u32>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `block`, advancing the tip to its height.
    pub fn push(&mut self, block: Block) {
        let height = block.height;
        self.blocks.insert(height, block);
        self.tip = Some(self.tip.map_or(height, |t| t.max(height)));
    }
}

impl BlockStore for InMemoryBlockStore {
    fn tip_height(&self) -> Option<u32> {
        self.tip
    }

    fn blocks(&self, from_height: u32, count: u32) -> BlockSeq<'_> {
        let tip = self.tip.unwrap_or(0);
        let end = from_height.saturating_add(count).min(tip + 1);
        Box::new((from_height..end).map(move |h| {
            self.blocks
                .get(&h)
                .cloned()
                .ok_or(StoreError::Missing(h))
        }))
    }

    fn blocks_from(&self, height: u32) -> BlockSeq<'_> {
        let tip = self.tip.unwrap_or(0);
        self.blocks(height, tip.saturating_sub(height).saturating_add(1))
    }

    fn top_blocks(&self, count: u32) -> BlockSeq<'_> {
        let tip = self.tip.unwrap_or(0);
        let from = tip.saturating_sub(count.saturating_sub(1)).max(1);
        let heights: Vec<u32> = if tip == 0 { vec![] } else { (from..=tip).rev().collect() };
        Box::new(heights.into_iter().map(move |h| {
            self.blocks
                .get(&h)
                .cloned()
                .ok_or(StoreError::Missing(h))
        }))
    }
}
