//! Transposition table for caching search results
//!
//! One table per search task; nothing is shared between threads.

use rustc_hash::FxHashMap;

use crate::game::Move;

/// How a stored score relates to the true value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Search completed inside the window
    Exact,
    /// Failed high: true value >= score
    Lower,
    /// Failed low: true value <= score
    Upper,
}

/// Stored search result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

/// Fingerprint -> deepest known result. No eviction.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store unless an entry from a deeper search is already there
    pub fn save(&mut self, hash: u64, entry: TtEntry) {
        match self.entries.get(&hash) {
            Some(existing) if existing.depth > entry.depth => {}
            _ => {
                self.entries.insert(hash, entry);
            }
        }
    }

    /// Entry searched to at least `depth`; shallower entries are a miss
    pub fn lookup(&self, hash: u64, depth: u32) -> Option<&TtEntry> {
        self.entries.get(&hash).filter(|entry| entry.depth >= depth)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
