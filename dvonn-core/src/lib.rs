//! DVONN Core - Rules engine and AI
//!
//! This crate provides the core game logic for DVONN:
//! - Board geometry (49-cell hex board with axial coordinates)
//! - Stack connectivity and removal of stacks cut off from the Sources
//! - Placement and jump rules, turn flow
//! - Position evaluation, Zobrist hashing, transposition table
//! - Parallel fixed-depth alpha-beta AI

pub mod board;
pub mod pieces;
pub mod connectivity;
pub mod game;
pub mod notation;
pub mod eval;
pub mod zobrist;
pub mod tt;
pub mod ai;
pub mod config;

// Re-exports for convenient access
pub use board::{Board, Hex, CELLS, DIRECTIONS, NUM_CELLS, TOTAL_PIECES};
pub use pieces::{Piece, Player, Stack};
pub use game::{
    check_move, has_legal_moves, moves_for, next_turn, possible_moves, start_state, valid_move,
    GameError, GamePhase, GameState, Move, Rejection, TurnState, PLACEMENT_ORDER,
};
pub use notation::parse_jump;
pub use eval::{evaluate, EvalWeights};
pub use zobrist::ZobristKeys;
pub use tt::{Bound, TranspositionTable, TtEntry};
pub use ai::{search_best_move, AlphaBetaAI, SearchResult};
pub use config::AiConfig;
