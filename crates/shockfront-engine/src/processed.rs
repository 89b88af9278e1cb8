//! The at-most-once coordinate gate shared across all rings of one
//! explosion.

use std::collections::HashSet;
use std::sync::Mutex;

use shockfront_core::BlockPos;

/// Shard count. Power of two; the shard index is taken from the top
/// bits of a mixed hash so neighboring coordinates spread out.
const SHARDS: usize = 16;

/// A concurrent set of already-decided voxel coordinates.
///
/// Scoped to one explosion instance; its lifetime is the lifetime of
/// that explosion. The only operation that matters is the atomic
/// test-and-insert: the first ring to reach a coordinate wins, every
/// later ring skips it. Sharded mutexes keep the processor pool from
/// serializing on a single lock.
#[derive(Debug)]
pub struct ProcessedSet {
    shards: Vec<Mutex<HashSet<u64>>>,
}

impl ProcessedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            shards: (0..SHARDS).map(|_| Mutex::new(HashSet::new())).collect(),
        }
    }

    /// Insert `pos`, reporting whether it was new.
    ///
    /// `true` means the caller owns the decision for this coordinate;
    /// `false` means an earlier (smaller-radius) ring already decided it.
    pub fn insert(&self, pos: BlockPos) -> bool {
        let key = pos.pack();
        let shard = &self.shards[Self::shard_of(key)];
        shard
            .lock()
            .expect("processed-set shard poisoned")
            .insert(key)
    }

    /// Whether `pos` has been decided.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let key = pos.pack();
        self.shards[Self::shard_of(key)]
            .lock()
            .expect("processed-set shard poisoned")
            .contains(&key)
    }

    /// Total decided coordinates.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().expect("processed-set shard poisoned").len())
            .sum()
    }

    /// Whether nothing has been decided yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shard_of(key: u64) -> usize {
        // Fibonacci mix so packed coordinates that differ only in low
        // bits still land on different shards.
        (key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 60) as usize % SHARDS
    }
}

impl Default for ProcessedSet {
    fn default() -> Self {
        Self::new()
    }
}
