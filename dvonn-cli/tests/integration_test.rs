//! Integration tests for the DVONN engine
//!
//! Tests the full stack: placement, jumps, cleanup, turn flow and the AI

use dvonn_core::{
    check_move, has_legal_moves, parse_jump, possible_moves, search_best_move, start_state, AiConfig,
    AlphaBetaAI, Board, GameError, GamePhase, GameState, Hex, Move, Piece, Player, Rejection, TurnState,
    CELLS, TOTAL_PIECES,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Seeded opening position with every piece placed
fn seeded_opening(seed: u64) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = start_state();
    state.fill_placement_random(&mut rng);
    state
}

/// Every remaining stack can reach a Source through occupied cells
fn all_stacks_connected(board: &Board) -> bool {
    board.stacks().all(|(hex, _)| {
        board
            .component(hex)
            .iter()
            .any(|&cell| board.get(cell).is_some_and(|s| s.contains_source()))
    })
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_placement_by_hand_follows_script() {
    let mut state = start_state();
    let mut expected = vec![Piece::Source; 3];
    for i in 0..46 {
        expected.push(if i % 2 == 0 { Piece::White } else { Piece::Black });
    }

    for (step, &cell) in CELLS.iter().enumerate() {
        assert_eq!(state.next_piece(), Some(expected[step]));
        state.run_placement_phase(cell).unwrap();
        assert_eq!(state.board.get(cell).map(|s| s.top()), Some(expected[step]));
    }

    assert_eq!(state.phase, GamePhase::Phase2);
    assert_eq!(state.turn, TurnState::MoveBlack);
    assert_eq!(state.board.empty_count(), 0);
}

#[test]
fn test_seeded_placement_is_reproducible() {
    let a = seeded_opening(99);
    let b = seeded_opening(99);
    assert_eq!(a, b);
    assert_eq!(a.phase, GamePhase::Phase2);
    assert_eq!(a.turn, TurnState::MoveBlack);
    assert_eq!(a.board.source_coordinates().len(), 3);
    assert_eq!(a.board.controlled_pieces(Player::White), 23);
    assert_eq!(a.board.controlled_pieces(Player::Black), 23);
}

#[test]
fn test_placement_after_completion_rejected() {
    let mut state = seeded_opening(1);
    let before = state.clone();
    let err = state.run_placement_phase(Hex::new(0, 0)).unwrap_err();
    assert_eq!(err, GameError::InvalidMove(Rejection::WrongPhase));
    assert_eq!(state, before);
}

// ============================================================================
// MOVEMENT
// ============================================================================

#[test]
fn test_first_moves_are_black_and_legal() {
    let state = seeded_opening(5);
    let moves = state.legal_moves();
    assert!(!moves.is_empty());
    assert!(has_legal_moves(&state.board, Player::Black));

    for mv in &moves {
        let Move::Jump { player, from, to } = *mv else {
            panic!("placement move offered in Phase 2");
        };
        assert_eq!(player, Player::Black);
        assert_eq!(from.distance_to(to), 1);
        assert!(check_move(&state.board, *mv).is_ok());
    }

    // Every Phase 2 move for either side is listed by the board-level enumerator
    let both = possible_moves(&state.board);
    assert!(moves.iter().all(|mv| both.contains(mv)));
}

#[test]
fn test_rejected_jump_leaves_state_untouched() {
    let mut state = seeded_opening(8);
    let before = state.clone();

    // A full board: nothing can land two cells away from a single piece
    let Some(Move::Jump { from, .. }) = state.legal_moves().first().copied() else {
        panic!("no opening move");
    };
    let far = CELLS
        .iter()
        .copied()
        .find(|&c| from.distance_to(c) == 2)
        .unwrap();

    assert!(state.run_movement_phase(from, far).is_err());
    assert_eq!(state, before);
}

#[test]
fn test_parsed_move_is_playable() {
    let mut state = seeded_opening(12);
    let Some(Move::Jump { from, to, .. }) = state.legal_moves().first().copied() else {
        panic!("no opening move");
    };

    let text = format!("{} -> {}", from, to);
    let mv = parse_jump(&text, Player::Black).unwrap();
    assert_eq!(mv, Move::Jump { player: Player::Black, from, to });

    state.run_movement_phase(from, to).unwrap();
    assert_eq!(state.board.height(to), 2);
    assert!(!state.board.is_occupied(from));
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_full_game_conserves_pieces_and_cleans_up() {
    for seed in 0..3 {
        let mut state = seeded_opening(seed);
        let mut plies = 0;

        while let Some(mv) = search_best_move(&state, 1) {
            let Move::Jump { player, from, to } = mv else {
                panic!("search returned a placement");
            };
            assert_eq!(state.current_player(), Some(player));
            state.run_movement_phase(from, to).unwrap();
            plies += 1;

            assert_eq!(state.board.total_pieces(), TOTAL_PIECES);
            assert!(all_stacks_connected(&state.board));
            assert!(plies < 200, "game did not terminate");
        }

        assert!(state.is_game_over());
        assert!(!has_legal_moves(&state.board, Player::White));
        assert!(!has_legal_moves(&state.board, Player::Black));
    }
}

#[test]
fn test_play_game_with_config_reaches_end() {
    let ai = AlphaBetaAI::from_config(&AiConfig::alpha_beta(2).with_threads(2));
    let (final_state, moves) = ai.play_game(seeded_opening(21));

    assert!(final_state.is_game_over());
    assert!(!moves.is_empty());
    assert_eq!(final_state.board.total_pieces(), TOTAL_PIECES);

    let white = final_state.board.controlled_pieces(Player::White);
    let black = final_state.board.controlled_pieces(Player::Black);
    match final_state.winner() {
        Some(Player::White) => assert!(white > black),
        Some(Player::Black) => assert!(black > white),
        None => assert_eq!(white, black),
    }
}

#[test]
fn test_search_is_deterministic_across_thread_counts() {
    let state = seeded_opening(33);
    let single = AlphaBetaAI::from_config(&AiConfig::alpha_beta(2).with_threads(1)).search(&state);
    let multi = AlphaBetaAI::from_config(&AiConfig::alpha_beta(2).with_threads(4)).search(&state);

    assert_eq!(single.best_move, multi.best_move);
    assert_eq!(single.score, multi.score);
}
