//! Position evaluation

use crate::board::{Board, BOARD_DIAMETER, NUM_CELLS};
use crate::pieces::{Piece, Player};
use serde::{Deserialize, Serialize};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Per Source piece inside a stack we control
    pub source_control: i32,
    /// Per opponent piece buried under our top piece
    pub enemy_capture: i32,
    /// Per step closer to the nearest Source, for each stack we control
    pub proximity: i32,
    /// Per piece of controlled-material difference once most cells are empty
    pub control_diff: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            source_control: 8,
            enemy_capture: 3,
            proximity: 4,
            control_diff: 10,
        }
    }
}

/// Evaluate a board from `perspective`'s point of view (higher is better).
///
/// Antisymmetric: `evaluate(b, White, w) == -evaluate(b, Black, w)`.
pub fn evaluate(board: &Board, perspective: Player, weights: &EvalWeights) -> i32 {
    let mine = perspective.piece();
    let theirs = perspective.opponent().piece();
    let sources = board.source_coordinates();

    let mut score = 0i32;
    let mut my_control = 0i32;
    let mut their_control = 0i32;

    for (hex, stack) in board.stacks() {
        let sign = match stack.owner() {
            Some(p) if p == perspective => 1,
            Some(_) => -1,
            None => continue,
        };
        let owner = stack.top();
        let height = stack.height() as i32;
        if sign > 0 {
            my_control += height;
        } else {
            their_control += height;
        }

        for &piece in stack.pieces() {
            if piece == Piece::Source {
                score += sign * weights.source_control;
            } else if piece != owner && (piece == mine || piece == theirs) {
                score += sign * weights.enemy_capture;
            }
        }

        if let Some(nearest) = sources.iter().map(|&src| hex.distance_to(src)).min() {
            score += sign * (BOARD_DIAMETER - nearest) * weights.proximity;
        }
    }

    if board.empty_count() * 2 > NUM_CELLS {
        score += (my_control - their_control) * weights.control_diff;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::game::start_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn board_of(stacks: &[(i8, i8, Vec<Piece>)]) -> Board {
        let stacks: Vec<_> = stacks
            .iter()
            .map(|(q, r, pieces)| (Hex::new(*q, *r), pieces.clone()))
            .collect();
        Board::from_stacks(&stacks).unwrap()
    }

    #[test]
    fn test_evaluate_antisymmetric() {
        let mut game = start_state();
        game.fill_placement_random(&mut ChaCha8Rng::seed_from_u64(9));
        let w = EvalWeights::default();
        let white = evaluate(&game.board, Player::White, &w);
        let black = evaluate(&game.board, Player::Black, &w);
        assert_eq!(white, -black);
    }

    #[test]
    fn test_controlling_a_source_scores() {
        let w = EvalWeights::default();
        let with_source = board_of(&[(0, 0, vec![Piece::White, Piece::Source]), (3, 0, vec![Piece::Source])]);
        let without = board_of(&[(0, 0, vec![Piece::White]), (3, 0, vec![Piece::Source])]);
        assert!(
            evaluate(&with_source, Player::White, &w) > evaluate(&without, Player::White, &w)
        );
    }

    #[test]
    fn test_capture_and_control_terms() {
        let w = EvalWeights {
            source_control: 0,
            enemy_capture: 3,
            proximity: 0,
            control_diff: 10,
        };
        // One black piece under white; white controls 2 pieces, black 1.
        let board = board_of(&[
            (0, 0, vec![Piece::White, Piece::Black]),
            (2, 0, vec![Piece::Black]),
            (1, 0, vec![Piece::Source]),
        ]);
        assert_eq!(evaluate(&board, Player::White, &w), 3 + 10);
        assert_eq!(evaluate(&board, Player::Black, &w), -13);
    }

    #[test]
    fn test_proximity_prefers_near_sources() {
        let w = EvalWeights {
            source_control: 0,
            enemy_capture: 0,
            proximity: 1,
            control_diff: 0,
        };
        let near = board_of(&[(0, 0, vec![Piece::Source]), (1, 0, vec![Piece::White])]);
        let far = board_of(&[(0, 0, vec![Piece::Source]), (5, 0, vec![Piece::White])]);
        assert_eq!(evaluate(&near, Player::White, &w), BOARD_DIAMETER - 1);
        assert_eq!(evaluate(&far, Player::White, &w), BOARD_DIAMETER - 5);
    }
}
