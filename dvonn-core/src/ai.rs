//! Alpha-beta search, parallel at the root
//!
//! Each legal root move is searched in its own rayon task with a private
//! copy of the position and a private transposition table, so the tasks
//! share nothing mutable. Only the random Zobrist keys are shared, read-only.

use std::cmp::Reverse;
use std::sync::Arc;

use rayon::prelude::*;

use crate::board::Board;
use crate::config::AiConfig;
use crate::eval::{evaluate, EvalWeights};
use crate::game::{moves_for, GameState, Move};
use crate::pieces::Player;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use crate::zobrist::ZobristKeys;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Bound larger than any evaluation
pub const SCORE_INF: i32 = 1_000_000;

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Outcome of one search call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Score of `best_move` from the mover's point of view
    pub score: i32,
    /// Nodes visited across all root tasks
    pub nodes: u64,
    pub root_moves: usize,
}

impl SearchResult {
    fn no_move() -> Self {
        Self {
            best_move: None,
            score: 0,
            nodes: 0,
            root_moves: 0,
        }
    }
}

/// Fixed-depth alpha-beta player
#[derive(Clone, Debug)]
pub struct AlphaBetaAI {
    pub depth: u32,
    pub weights: EvalWeights,
    /// Worker threads for the root fan-out (None = rayon's global pool)
    pub threads: Option<usize>,
    keys: Arc<ZobristKeys>,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, weights: EvalWeights) -> Self {
        Self {
            depth,
            weights,
            threads: None,
            keys: Arc::new(ZobristKeys::new()),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            threads: config.threads,
            ..Self::new(config.depth, config.weights.clone())
        }
    }

    /// Use an existing key set (e.g. one shared by several players)
    pub fn with_keys(mut self, keys: Arc<ZobristKeys>) -> Self {
        self.keys = keys;
        self
    }

    /// Get best move for current position
    pub fn best_move(&self, state: &GameState) -> Option<Move> {
        self.search(state).best_move
    }

    /// Search the current position. Returns no move outside Phase 2 or when
    /// the player to move has no legal jump.
    pub fn search(&self, state: &GameState) -> SearchResult {
        let Some(me) = state.current_player() else {
            return SearchResult::no_move();
        };
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return SearchResult::no_move();
        }
        order_moves(&state.board, &mut moves);

        let child_depth = self.depth.max(1) - 1;
        let run = || {
            moves
                .par_iter()
                .map(|&mv| self.search_root_move(state, me, mv, child_depth))
                .collect::<Vec<_>>()
        };
        let results = match self.threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    tracing::warn!("Could not build a {}-thread pool, using the global pool: {}", n, e);
                    run()
                }
            },
            None => run(),
        };

        // First maximum in move order wins ties
        let mut best_move = None;
        let mut best_score = -SCORE_INF;
        let mut nodes = 0;
        for (&mv, &(score, task_nodes)) in moves.iter().zip(results.iter()) {
            nodes += task_nodes;
            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        tracing::debug!(
            "Searched {} root moves at depth {}: best={:?} score={} nodes={}",
            moves.len(),
            self.depth,
            best_move,
            best_score,
            nodes
        );

        SearchResult {
            best_move,
            score: best_score,
            nodes,
            root_moves: moves.len(),
        }
    }

    fn search_root_move(&self, state: &GameState, me: Player, mv: Move, depth: u32) -> (i32, u64) {
        let Move::Jump { player, from, to } = mv else {
            return (-SCORE_INF, 0);
        };
        let mut child = state.clone();
        child.play_jump(player, from, to);

        let next = child.current_player().unwrap_or(me);
        let mut search = Search::new(&self.keys, &self.weights);
        let value = search.negamax(&child, next, depth, -SCORE_INF, SCORE_INF);
        let score = if next == me { value } else { -value };

        tracing::trace!("Root move {}: score={} nodes={}", mv, score, search.nodes);
        (score, search.nodes)
    }

    /// Play out Phase 2 with this AI moving for both sides
    pub fn play_game(&self, initial: GameState) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut history = Vec::new();

        while !state.is_game_over() {
            let Some(mv) = self.best_move(&state) else { break };
            let Move::Jump { from, to, .. } = mv else { break };
            if let Err(e) = state.run_movement_phase(from, to) {
                tracing::warn!("Search returned a rejected move {}: {}", mv, e);
                break;
            }
            history.push(mv);
        }

        (state, history)
    }
}

/// Best move for `state` searched to `depth` with default weights.
/// None when there is nothing to move.
pub fn search_best_move(state: &GameState, depth: u32) -> Option<Move> {
    AlphaBetaAI::new(depth, EvalWeights::default()).best_move(state)
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Taller destination stacks first; stable, so ties keep generation order
fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|mv| match mv {
        Move::Jump { to, .. } => Reverse(board.height(*to)),
        Move::Place { .. } => Reverse(0),
    });
}

// ============================================================================
// NEGAMAX WITH ALPHA-BETA
// ============================================================================

/// State private to one root task
struct Search<'a> {
    keys: &'a ZobristKeys,
    weights: &'a EvalWeights,
    tt: TranspositionTable,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(keys: &'a ZobristKeys, weights: &'a EvalWeights) -> Self {
        Self {
            keys,
            weights,
            tt: TranspositionTable::new(),
            nodes: 0,
        }
    }

    /// Value of `state` for `to_move`. When a jump leaves the same player to
    /// move again the child is searched with the same window and sign.
    fn negamax(
        &mut self,
        state: &GameState,
        to_move: Player,
        depth: u32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;
        let hash = self.keys.hash(&state.board, to_move);
        let alpha_orig = alpha;

        if let Some(entry) = self.tt.lookup(hash, depth) {
            match entry.bound {
                Bound::Exact => return entry.score,
                Bound::Lower if entry.score >= beta => return entry.score,
                Bound::Upper if entry.score <= alpha => return entry.score,
                _ => {}
            }
        }

        let mut moves = if depth == 0 || state.is_game_over() {
            Vec::new()
        } else {
            moves_for(&state.board, to_move)
        };
        if moves.is_empty() {
            let score = evaluate(&state.board, to_move, self.weights);
            self.tt.save(hash, TtEntry { depth, score, bound: Bound::Exact, best_move: None });
            return score;
        }
        order_moves(&state.board, &mut moves);

        let mut best = -SCORE_INF;
        let mut best_move = None;

        for mv in moves {
            let Move::Jump { player, from, to } = mv else { continue };
            let mut child = state.clone();
            child.play_jump(player, from, to);

            let next = child.current_player().unwrap_or(to_move);
            let score = if next == to_move {
                self.negamax(&child, next, depth - 1, alpha, beta)
            } else {
                -self.negamax(&child, next, depth - 1, -beta, -alpha)
            };

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.save(hash, TtEntry { depth, score: best, bound, best_move });
        best
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::game::{start_state, GamePhase};
    use crate::pieces::Piece;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn placed_game(seed: u64) -> GameState {
        let mut game = start_state();
        game.fill_placement_random(&mut ChaCha8Rng::seed_from_u64(seed));
        game
    }

    /// Plain minimax without pruning or caching
    fn reference(state: &GameState, to_move: Player, depth: u32, w: &EvalWeights) -> i32 {
        let moves = if depth == 0 || state.is_game_over() {
            Vec::new()
        } else {
            moves_for(&state.board, to_move)
        };
        if moves.is_empty() {
            return evaluate(&state.board, to_move, w);
        }
        moves
            .into_iter()
            .map(|mv| {
                let Move::Jump { player, from, to } = mv else { unreachable!() };
                let mut child = state.clone();
                child.play_jump(player, from, to);
                let next = child.current_player().unwrap_or(to_move);
                let v = reference(&child, next, depth - 1, w);
                if next == to_move { v } else { -v }
            })
            .max()
            .unwrap()
    }

    #[test]
    fn test_ai_returns_move() {
        let game = placed_game(1);
        let ai = AlphaBetaAI::new(2, EvalWeights::default());
        let mv = ai.best_move(&game).expect("a move");
        assert!(game.apply_move(mv).is_ok());
    }

    #[test]
    fn test_no_move_outside_phase2() {
        let game = start_state();
        assert_eq!(game.phase, GamePhase::Phase1);
        assert_eq!(search_best_move(&game, 2), None);

        let board = Board::from_stacks(&[(Hex::new(0, 0), vec![Piece::White, Piece::Source])]).unwrap();
        let over = GameState::from_position(board, Player::White);
        assert!(over.is_game_over());
        assert_eq!(search_best_move(&over, 3), None);
    }

    #[test]
    fn test_depth_one_picks_best_evaluation() {
        let game = placed_game(2);
        let w = EvalWeights::default();
        let ai = AlphaBetaAI::new(1, w.clone());
        let result = ai.search(&game);
        let me = game.current_player().unwrap();

        let best = game
            .legal_moves()
            .into_iter()
            .map(|mv| evaluate(&game.apply_move(mv).unwrap().board, me, &w))
            .max()
            .unwrap();
        assert_eq!(result.score, best);
    }

    #[test]
    fn test_matches_plain_minimax() {
        let w = EvalWeights::default();
        let mut game = placed_game(4);
        // Thin the board out a little so depth 3 stays quick
        let opener = AlphaBetaAI::new(1, w.clone());
        for _ in 0..6 {
            let Some(Move::Jump { from, to, .. }) = opener.best_move(&game) else { break };
            game.run_movement_phase(from, to).unwrap();
        }

        for depth in 1..=3 {
            let ai = AlphaBetaAI::new(depth, w.clone());
            let result = ai.search(&game);
            let me = game.current_player().unwrap();
            assert_eq!(result.score, reference(&game, me, depth, &w), "depth {depth}");
        }
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let game = placed_game(8);
        let keys = Arc::new(ZobristKeys::with_seed(5));
        let mut single = AlphaBetaAI::new(2, EvalWeights::default()).with_keys(keys.clone());
        single.threads = Some(1);
        let pooled = AlphaBetaAI::new(2, EvalWeights::default()).with_keys(keys);
        assert_eq!(single.search(&game).best_move, pooled.search(&game).best_move);
    }

    #[test]
    fn test_move_ordering() {
        let board = Board::from_stacks(&[
            (Hex::new(0, 0), vec![Piece::White]),
            (Hex::new(1, 0), vec![Piece::Black]),
            (Hex::new(-1, 0), vec![Piece::Black, Piece::Black, Piece::Source]),
        ])
        .unwrap();
        let mut moves = moves_for(&board, Player::White);
        order_moves(&board, &mut moves);
        assert!(matches!(moves[0], Move::Jump { to, .. } if to == Hex::new(-1, 0)));
    }

    #[test]
    fn test_play_game_finishes() {
        let game = placed_game(6);
        let ai = AlphaBetaAI::new(1, EvalWeights::default());
        let (final_state, history) = ai.play_game(game);
        assert!(final_state.is_game_over());
        assert!(!history.is_empty());
        assert_eq!(final_state.board.total_pieces(), crate::board::TOTAL_PIECES);
    }
}
