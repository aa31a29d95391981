//! Zobrist hashing for position identification
//!
//! A position key XORs together one random value per occupied cell for the
//! top piece colour, one per cell for the stack height, and a side-to-move
//! toggle when Black is to move. The keys are drawn once and never change;
//! share one `ZobristKeys` (behind an `Arc`) between every search that needs
//! comparable hashes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, NUM_CELLS, TOTAL_PIECES};
use crate::pieces::Player;

/// Random keys for hashing boards
#[derive(Clone, Debug)]
pub struct ZobristKeys {
    /// [top piece colour][cell]
    top: [[u64; NUM_CELLS]; 3],
    /// [stack height][cell], heights 1..=49
    height: Vec<[u64; NUM_CELLS]>,
    black_to_move: u64,
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Keys drawn from the operating system's secure random source
    pub fn new() -> Self {
        Self::from_rng(&mut rand::rngs::OsRng)
    }

    /// Reproducible keys for tests and benchmarks
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut top = [[0u64; NUM_CELLS]; 3];
        for row in top.iter_mut() {
            rng.fill(&mut row[..]);
        }
        let height = (0..=TOTAL_PIECES)
            .map(|_| {
                let mut row = [0u64; NUM_CELLS];
                rng.fill(&mut row[..]);
                row
            })
            .collect();
        Self {
            top,
            height,
            black_to_move: rng.gen(),
        }
    }

    /// Fingerprint of (board, side to move)
    pub fn hash(&self, board: &Board, to_move: Player) -> u64 {
        let mut h = 0u64;
        for (hex, stack) in board.stacks() {
            let Some(idx) = hex.index() else { continue };
            h ^= self.top[stack.top().index()][idx];
            h ^= self.height[stack.height().min(TOTAL_PIECES)][idx];
        }
        if to_move == Player::Black {
            h ^= self.black_to_move;
        }
        h
    }
}
